// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open, inspect, and rewrite the page list of existing PDF
// documents using the `lopdf` crate.
//
// Every operation works on a clone of the loaded document and returns the
// serialised result, so one reader can serve several operations.

use folio_core::{PageSelection, PaperSize};
use folio_core::error::{FolioError, Result};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use tracing::{debug, info, instrument, warn};

use super::forms;
use super::page_tree::{self, number, resolve};

/// Size and rotation of a single page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageInfo {
    /// 1-based page number.
    pub number: u32,
    pub width_pt: f32,
    pub height_pt: f32,
    /// Effective /Rotate in degrees, normalised to 0, 90, 180, or 270.
    pub rotation: i64,
    pub paper: PaperSize,
}

/// Reads and manipulates existing PDF files.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            FolioError::Pdf(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Size, rotation, and paper name of every page.
    pub fn pages(&self) -> Vec<PageInfo> {
        self.document
            .get_pages()
            .into_iter()
            .map(|(number, page_id)| {
                let (width_pt, height_pt) = self.page_size(page_id);
                PageInfo {
                    number,
                    width_pt,
                    height_pt,
                    rotation: self.rotation(page_id),
                    paper: PaperSize::identify(width_pt, height_pt),
                }
            })
            .collect()
    }

    // -- Page list rewrites ---------------------------------------------------

    /// New document holding the pages at `indices` (zero-based), in the order
    /// given. Indices may repeat.
    #[instrument(skip_all, fields(pages = indices.len()))]
    pub fn reorder(&self, indices: &[usize]) -> Result<Vec<u8>> {
        if indices.is_empty() {
            return Err(FolioError::NothingSelected);
        }

        let page_ids = self.page_ids_at(indices)?;
        let mut doc = self.document.clone();
        page_tree::rebuild(&mut doc, &page_ids)?;

        info!(pages = page_ids.len(), "Pages reordered");
        save(doc, "reordered document")
    }

    /// New document holding only the pages at `indices`, in document order.
    pub fn select(&self, indices: &[usize]) -> Result<Vec<u8>> {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        self.reorder(&sorted)
    }

    /// New document without the selected pages.
    #[instrument(skip_all, fields(remove = selection.len()))]
    pub fn remove(&self, selection: &PageSelection) -> Result<Vec<u8>> {
        let total = self.page_count();
        self.check_indices(selection.indices())?;

        let keep = selection.complement(total);
        if keep.is_empty() {
            return Err(FolioError::EmptyDocument);
        }

        info!(total, removed = total - keep.len(), "Removing pages");
        self.reorder(&keep)
    }

    /// One single-page document per index.
    #[instrument(skip_all, fields(pages = indices.len()))]
    pub fn extract_each(&self, indices: &[usize]) -> Result<Vec<Vec<u8>>> {
        indices.iter().map(|&index| self.reorder(&[index])).collect()
    }

    /// Add `degrees` (a multiple of 90) to the rotation of the pages at
    /// `indices`. Other pages are untouched.
    #[instrument(skip(self, indices), fields(pages = indices.len()))]
    pub fn rotate(&self, indices: &[usize], degrees: i32) -> Result<Vec<u8>> {
        if degrees % 90 != 0 {
            return Err(FolioError::InvalidOption(format!(
                "rotation must be a multiple of 90, got {}",
                degrees
            )));
        }

        let page_ids = self.page_ids_at(indices)?;
        let mut doc = self.document.clone();

        for page_id in page_ids {
            let existing_rotation = self.rotation(page_id);
            let new_rotation = (existing_rotation + degrees as i64).rem_euclid(360);

            let page = doc
                .get_dictionary_mut(page_id)
                .map_err(|err| FolioError::Pdf(format!("page {:?} unreadable: {}", page_id, err)))?;
            page.set("Rotate", Object::Integer(new_rotation));

            debug!(?page_id, existing_rotation, new_rotation, "Page rotated");
        }

        save(doc, "rotated PDF")
    }

    /// Insert `count` blank pages after 1-based page `after` (0 inserts at the
    /// front). Blank pages take the size and rotation of the page they follow,
    /// or of the first page when inserted at the front.
    #[instrument(skip(self, fallback))]
    pub fn insert_blank_pages(
        &self,
        after: usize,
        count: usize,
        fallback: PaperSize,
    ) -> Result<Vec<u8>> {
        let total = self.page_count();
        if after > total {
            return Err(FolioError::InvalidOption(format!(
                "cannot insert after page {} of a {} page document",
                after, total
            )));
        }
        if count == 0 {
            return Err(FolioError::InvalidOption(
                "number of blank pages must be at least 1".into(),
            ));
        }

        let mut doc = self.document.clone();
        let mut page_ids = page_tree::page_ids(&doc);

        let neighbour = page_ids.get(after.saturating_sub(1)).copied();
        let rotation = neighbour.map_or(0, |id| self.rotation(id));
        let media_box = neighbour
            .and_then(|id| page_tree::inherited_value(&doc, id, b"MediaBox"))
            .unwrap_or_else(|| {
                let (width, height) = fallback.dimensions_pt();
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(width.into()),
                    Object::Real(height.into()),
                ])
            });

        let pages_id = page_tree::pages_root(&doc)?;
        let blanks: Vec<ObjectId> = (0..count)
            .map(|_| {
                let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => media_box.clone(),
                    "Rotate" => rotation,
                    "Resources" => dictionary! {},
                    "Contents" => content_id,
                })
            })
            .collect();

        page_ids.splice(after..after, blanks);
        page_tree::rebuild(&mut doc, &page_ids)?;

        info!(after, count, "Blank pages inserted");
        save(doc, "document with blank pages")
    }

    /// Remove document-level metadata: the /Info dictionary, the trailer /ID,
    /// and the catalog's XMP /Metadata and /PieceInfo.
    #[instrument(skip(self))]
    pub fn strip_metadata(&self) -> Result<Vec<u8>> {
        let mut doc = self.document.clone();

        doc.trailer.remove(b"Info");
        doc.trailer.remove(b"ID");

        match page_tree::catalog_id(&doc).and_then(|id| {
            doc.get_dictionary_mut(id)
                .map_err(|err| FolioError::Pdf(format!("catalog unreadable: {}", err)))
        }) {
            Ok(catalog) => {
                catalog.remove(b"Metadata");
                catalog.remove(b"PieceInfo");
            }
            Err(err) => warn!(%err, "Could not remove catalog metadata"),
        }

        doc.prune_objects();
        info!("Metadata removed");
        save(doc, "document without metadata")
    }

    /// Burn every form field's current appearance into its page and remove the
    /// interactive form, so the values can no longer be edited.
    #[instrument(skip(self))]
    pub fn flatten_forms(&self) -> Result<Vec<u8>> {
        let mut doc = self.document.clone();
        let flattened = forms::flatten(&mut doc)?;
        info!(
            widgets = flattened.widgets,
            drawn = flattened.drawn,
            "Form flattened"
        );
        save(doc, "flattened PDF")
    }

    // -- Multi-document -------------------------------------------------------

    /// Merge this document with one or more other PDF byte-slices, producing a
    /// combined PDF. Pages appear in the order: self, then each supplied
    /// document in order.
    #[instrument(skip_all, fields(additional_count = others.len()))]
    pub fn merge(&self, others: &[&[u8]]) -> Result<Vec<u8>> {
        info!(
            base_pages = self.page_count(),
            additional_documents = others.len(),
            "Merging PDFs"
        );

        let (mut merged, sequences) = self.absorb_all(others)?;
        let order: Vec<ObjectId> = sequences.into_iter().flatten().collect();
        page_tree::rebuild(&mut merged, &order)?;

        save(merged, "merged PDF")
    }

    /// Alternate-merge: take one page from each document in turn (self first),
    /// repeating until every document is exhausted. Shorter documents simply
    /// drop out of the rotation.
    #[instrument(skip_all, fields(additional_count = others.len()))]
    pub fn alternate(&self, others: &[&[u8]]) -> Result<Vec<u8>> {
        let (mut merged, sequences) = self.absorb_all(others)?;

        let longest = sequences.iter().map(Vec::len).max().unwrap_or(0);
        let order: Vec<ObjectId> = (0..longest)
            .flat_map(|round| sequences.iter().filter_map(move |pages| pages.get(round).copied()))
            .collect();

        info!(documents = sequences.len(), pages = order.len(), "Alternating pages");
        page_tree::rebuild(&mut merged, &order)?;

        save(merged, "alternated PDF")
    }

    // -- Helpers --------------------------------------------------------------

    /// Clone self and move every other document's objects into the clone.
    /// Returns each document's page IDs in the combined numbering.
    fn absorb_all(&self, others: &[&[u8]]) -> Result<(Document, Vec<Vec<ObjectId>>)> {
        let mut merged = self.document.clone();
        let mut sequences = vec![page_tree::page_ids(&merged)];

        for (index, other_bytes) in others.iter().enumerate() {
            let other_doc = Document::load_mem(other_bytes).map_err(|err| {
                FolioError::Pdf(format!(
                    "failed to load additional PDF #{}: {}",
                    index + 1,
                    err
                ))
            })?;
            sequences.push(page_tree::absorb(&mut merged, other_doc));
        }

        Ok((merged, sequences))
    }

    fn check_indices(&self, indices: &[usize]) -> Result<()> {
        let total = self.page_count();
        match indices.iter().find(|&&index| index >= total) {
            Some(index) => Err(FolioError::Pdf(format!(
                "page {} out of range (document has {} pages)",
                index + 1,
                total
            ))),
            None => Ok(()),
        }
    }

    fn page_ids_at(&self, indices: &[usize]) -> Result<Vec<ObjectId>> {
        self.check_indices(indices)?;
        let all = page_tree::page_ids(&self.document);
        Ok(indices.iter().map(|&index| all[index]).collect())
    }

    fn rotation(&self, page_id: ObjectId) -> i64 {
        page_tree::inherited_value(&self.document, page_id, b"Rotate")
            .and_then(|value| resolve(&self.document, &value).as_i64().ok())
            .unwrap_or(0)
            .rem_euclid(360)
    }

    fn page_size(&self, page_id: ObjectId) -> (f32, f32) {
        let media_box = page_tree::inherited_value(&self.document, page_id, b"MediaBox");
        let corners: Option<Vec<f32>> = media_box.and_then(|value| {
            resolve(&self.document, &value)
                .as_array()
                .ok()
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| number(resolve(&self.document, item)))
                        .collect()
                })
        });

        match corners.as_deref() {
            Some([x1, y1, x2, y2]) => ((x2 - x1).abs(), (y2 - y1).abs()),
            _ => {
                warn!(?page_id, "page has no usable /MediaBox, assuming Letter");
                PaperSize::Letter.dimensions_pt()
            }
        }
    }
}

fn save(mut doc: Document, what: &str) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|err| FolioError::Pdf(format!("failed to serialise {}: {}", what, err)))?;
    debug!(output_bytes = output.len(), "{} serialised", what);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::{numbered_pdf, page_numbers};

    fn reader(pages: usize) -> PdfReader {
        PdfReader::from_bytes(&numbered_pdf(pages)).unwrap()
    }

    #[test]
    fn counts_pages() {
        assert_eq!(reader(7).page_count(), 7);
    }

    #[test]
    fn select_keeps_document_order() {
        let out = reader(6).select(&[4, 0, 2, 2]).unwrap();
        assert_eq!(page_numbers(&out), vec![1, 3, 5]);
    }

    #[test]
    fn reorder_allows_repeats() {
        let out = reader(3).reorder(&[2, 0, 0]).unwrap();
        assert_eq!(page_numbers(&out), vec![3, 1, 1]);
    }

    #[test]
    fn reorder_rejects_out_of_range_index() {
        assert!(matches!(reader(3).reorder(&[3]), Err(FolioError::Pdf(_))));
    }

    #[test]
    fn remove_keeps_the_rest() {
        let out = reader(5)
            .remove(&PageSelection::parse("2, 4", 5))
            .unwrap();
        assert_eq!(page_numbers(&out), vec![1, 3, 5]);
    }

    #[test]
    fn removing_every_page_is_refused() {
        assert!(matches!(
            reader(2).remove(&PageSelection::all(2)),
            Err(FolioError::EmptyDocument)
        ));
    }

    #[test]
    fn rebuilt_pages_keep_inherited_resources() {
        let out = reader(3).select(&[1]).unwrap();
        let doc = Document::load_mem(&out).unwrap();
        let page_id = *doc.get_pages().values().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        assert!(page.has(b"Resources"));
    }

    #[test]
    fn rotation_accumulates_and_wraps() {
        let once = reader(2).rotate(&[0], 270).unwrap();
        let twice = PdfReader::from_bytes(&once).unwrap().rotate(&[0], 180).unwrap();
        let pages = PdfReader::from_bytes(&twice).unwrap().pages();
        assert_eq!(pages[0].rotation, 90);
        assert_eq!(pages[1].rotation, 0);
    }

    #[test]
    fn rotation_must_be_quarter_turns() {
        assert!(matches!(
            reader(1).rotate(&[0], 45),
            Err(FolioError::InvalidOption(_))
        ));
    }

    #[test]
    fn blank_pages_follow_the_given_page() {
        let out = reader(3)
            .insert_blank_pages(2, 2, PaperSize::A4)
            .unwrap();
        // Blank pages copy the MediaBox of page 2.
        assert_eq!(page_numbers(&out), vec![1, 2, 2, 2, 3]);
    }

    #[test]
    fn blank_pages_take_the_neighbours_rotation() {
        let rotated = reader(3).rotate(&[1], 90).unwrap();
        let out = PdfReader::from_bytes(&rotated)
            .unwrap()
            .insert_blank_pages(2, 1, PaperSize::A4)
            .unwrap();

        let pages = PdfReader::from_bytes(&out).unwrap().pages();
        let rotations: Vec<i64> = pages.iter().map(|page| page.rotation).collect();
        assert_eq!(rotations, vec![0, 90, 90, 0]);
        assert_eq!(pages[2].width_pt, pages[1].width_pt);
    }

    #[test]
    fn blank_pages_at_the_front() {
        let out = reader(2).insert_blank_pages(0, 1, PaperSize::A4).unwrap();
        assert_eq!(PdfReader::from_bytes(&out).unwrap().page_count(), 3);
        assert_eq!(page_numbers(&out), vec![1, 1, 2]);
    }

    #[test]
    fn blank_pages_past_the_end_are_refused() {
        assert!(reader(2).insert_blank_pages(3, 1, PaperSize::A4).is_err());
        assert!(reader(2).insert_blank_pages(1, 0, PaperSize::A4).is_err());
    }

    #[test]
    fn merge_appends_in_order() {
        let second = numbered_pdf(2);
        let out = reader(3).merge(&[&second]).unwrap();
        assert_eq!(page_numbers(&out), vec![1, 2, 3, 1, 2]);
    }

    #[test]
    fn alternate_skips_exhausted_documents() {
        let second = numbered_pdf(1);
        let third = numbered_pdf(3);
        let out = reader(2).alternate(&[&second, &third]).unwrap();
        assert_eq!(page_numbers(&out), vec![1, 1, 1, 2, 2, 3]);
    }

    #[test]
    fn strip_metadata_drops_info() {
        let out = reader(1).strip_metadata().unwrap();
        let doc = Document::load_mem(&out).unwrap();
        assert!(doc.trailer.get(b"Info").is_err());
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn flattened_form_round_trips_without_acroform() {
        let reader = PdfReader::from_bytes(&crate::pdf::fixtures::form_pdf()).unwrap();
        let out = reader.flatten_forms().unwrap();

        let doc = Document::load_mem(&out).unwrap();
        assert!(!doc.catalog().unwrap().has(b"AcroForm"));
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn pages_report_size_and_name() {
        let pages = reader(2).pages();
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[0].width_pt, 101.0);
        assert_eq!(pages[0].height_pt, 200.0);
        assert_eq!(pages[0].paper.name(), "Custom");
    }

    #[test]
    fn garbage_is_a_pdf_error() {
        assert!(matches!(
            PdfReader::from_bytes(b"not a pdf"),
            Err(FolioError::Pdf(_))
        ));
    }
}
