// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Form flattening. Each widget's normal appearance stream is drawn into its
// page as a Form XObject placed over the widget rectangle; the widgets and the
// catalog /AcroForm are then removed so the document has no interactive form.

use folio_core::error::{FolioError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use tracing::debug;

use super::page_tree::{self, number, resolve};

/// Annotation flag bit 2 (PDF 32000 §12.5.3).
const FLAG_HIDDEN: i64 = 1 << 1;

const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// What a flatten pass did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Flattened {
    /// Widget annotations removed.
    pub widgets: usize,
    /// Widgets whose appearance was drawn into the page.
    pub drawn: usize,
}

/// An appearance stream and the matrix that maps it onto its widget rectangle.
struct Placement {
    xobject: ObjectId,
    matrix: [f32; 6],
}

/// Flatten every form field of `doc` in place.
///
/// Fails with `NoFormFields` when the document has neither an /AcroForm nor
/// any widget annotation.
pub(crate) fn flatten(doc: &mut Document) -> Result<Flattened> {
    let catalog_id = page_tree::catalog_id(doc)?;
    let has_acroform = doc
        .get_dictionary(catalog_id)
        .is_ok_and(|catalog| catalog.has(b"AcroForm"));

    let mut total = Flattened::default();
    for page_id in page_tree::page_ids(doc) {
        let page = flatten_page(doc, page_id)?;
        total.widgets += page.widgets;
        total.drawn += page.drawn;
    }

    if !has_acroform && total.widgets == 0 {
        return Err(FolioError::NoFormFields);
    }

    if let Ok(catalog) = doc.get_dictionary_mut(catalog_id) {
        catalog.remove(b"AcroForm");
    }
    doc.prune_objects();

    Ok(total)
}

fn flatten_page(doc: &mut Document, page_id: ObjectId) -> Result<Flattened> {
    let annots: Vec<Object> = match page_tree::page_dictionary(doc, page_id)?.get(b"Annots") {
        Ok(value) => resolve(doc, value)
            .as_array()
            .map(|items| items.to_vec())
            .unwrap_or_default(),
        Err(_) => return Ok(Flattened::default()),
    };

    let mut kept = Vec::with_capacity(annots.len());
    let mut placements = Vec::new();
    let mut widgets = 0;

    for annot in annots {
        let widget = resolve(doc, &annot).as_dict().ok().filter(|dict| is_widget(dict));
        let Some(dict) = widget else {
            kept.push(annot);
            continue;
        };

        widgets += 1;
        if is_hidden(doc, dict) {
            continue;
        }
        match normal_appearance(doc, dict).and_then(|xobject| placement(doc, dict, xobject)) {
            Some(placement) => placements.push(placement),
            None => debug!(?page_id, "widget without a usable appearance dropped"),
        }
    }

    if widgets == 0 {
        return Ok(Flattened::default());
    }

    let drawn = placements.len();
    if drawn > 0 {
        draw_placements(doc, page_id, &placements)?;
    }

    let page = doc
        .get_dictionary_mut(page_id)
        .map_err(|err| FolioError::Pdf(format!("page {:?} unreadable: {}", page_id, err)))?;
    if kept.is_empty() {
        page.remove(b"Annots");
    } else {
        page.set("Annots", Object::Array(kept));
    }

    debug!(?page_id, widgets, drawn, "page flattened");
    Ok(Flattened { widgets, drawn })
}

/// Register each appearance as a page XObject and append a content stream
/// that paints them. Existing content is wrapped in q/Q so its graphics state
/// cannot leak into the appended drawing.
fn draw_placements(doc: &mut Document, page_id: ObjectId, placements: &[Placement]) -> Result<()> {
    let mut resources = page_tree::inherited_value(doc, page_id, b"Resources")
        .and_then(|value| resolve(doc, &value).as_dict().ok().cloned())
        .unwrap_or_default();
    let mut xobjects = resources
        .get(b"XObject")
        .ok()
        .and_then(|value| resolve(doc, value).as_dict().ok().cloned())
        .unwrap_or_default();

    let mut operations = String::new();
    let mut next_name = 1;
    for placement in placements {
        let name = loop {
            let candidate = format!("FlatField{next_name}");
            next_name += 1;
            if !xobjects.has(candidate.as_bytes()) {
                break candidate;
            }
        };
        xobjects.set(name.as_bytes().to_vec(), Object::Reference(placement.xobject));

        let [a, b, c, d, e, f] = placement.matrix;
        operations.push_str(&format!("q {a} {b} {c} {d} {e} {f} cm /{name} Do Q\n"));

        if let Ok(Object::Stream(stream)) = doc.get_object_mut(placement.xobject) {
            stream.dict.set("Type", "XObject");
            stream.dict.set("Subtype", "Form");
        }
    }
    resources.set("XObject", Object::Dictionary(xobjects));

    let existing: Vec<Object> = match page_tree::page_dictionary(doc, page_id)?.get(b"Contents") {
        Ok(value) => match resolve(doc, value) {
            Object::Array(items) => items.clone(),
            _ => vec![value.clone()],
        },
        Err(_) => Vec::new(),
    };

    let save_state = doc.add_object(Stream::new(dictionary! {}, b"q\n".to_vec()));
    let appended = doc.add_object(Stream::new(
        dictionary! {},
        format!("\nQ\n{operations}").into_bytes(),
    ));

    let mut contents = Vec::with_capacity(existing.len() + 2);
    contents.push(Object::Reference(save_state));
    contents.extend(existing);
    contents.push(Object::Reference(appended));

    let page = doc
        .get_dictionary_mut(page_id)
        .map_err(|err| FolioError::Pdf(format!("page {:?} unreadable: {}", page_id, err)))?;
    page.set("Resources", Object::Dictionary(resources));
    page.set("Contents", Object::Array(contents));
    Ok(())
}

fn is_widget(annot: &Dictionary) -> bool {
    annot
        .get(b"Subtype")
        .and_then(Object::as_name)
        .is_ok_and(|subtype| subtype == b"Widget")
}

fn is_hidden(doc: &Document, annot: &Dictionary) -> bool {
    annot
        .get(b"F")
        .ok()
        .and_then(|flags| resolve(doc, flags).as_i64().ok())
        .is_some_and(|flags| flags & FLAG_HIDDEN != 0)
}

/// The widget's /AP /N stream, choosing the /AS state for checkboxes and
/// radio buttons whose /N is a dictionary of states.
fn normal_appearance(doc: &Document, annot: &Dictionary) -> Option<ObjectId> {
    let appearances = resolve(doc, annot.get(b"AP").ok()?).as_dict().ok()?;
    let normal = appearances.get(b"N").ok()?;

    let states = match normal {
        Object::Reference(id) => match doc.get_object(*id).ok()? {
            Object::Stream(_) => return Some(*id),
            Object::Dictionary(states) => states,
            _ => return None,
        },
        Object::Dictionary(states) => states,
        _ => return None,
    };

    let state = annot.get(b"AS").and_then(Object::as_name).ok()?;
    states.get(state).and_then(Object::as_reference).ok()
}

/// Matrix mapping the appearance's transformed bounding box onto the widget
/// rectangle (PDF 32000 §12.5.5).
fn placement(doc: &Document, annot: &Dictionary, xobject: ObjectId) -> Option<Placement> {
    let [rx0, ry0, rx1, ry1] = rectangle(doc, annot.get(b"Rect").ok()?)?;
    let stream = doc.get_object(xobject).ok()?.as_stream().ok()?;
    let bbox = rectangle(doc, stream.dict.get(b"BBox").ok()?)?;
    let form_matrix = stream
        .dict
        .get(b"Matrix")
        .ok()
        .and_then(|value| numbers(doc, value))
        .and_then(|values| <[f32; 6]>::try_from(values).ok())
        .unwrap_or(IDENTITY);

    let [tx0, ty0, tx1, ty1] = transform_box(bbox, form_matrix);
    let scale = |target: f32, source: f32| {
        if source.abs() > f32::EPSILON {
            target / source
        } else {
            1.0
        }
    };
    let sx = scale(rx1 - rx0, tx1 - tx0);
    let sy = scale(ry1 - ry0, ty1 - ty0);

    Some(Placement {
        xobject,
        matrix: [sx, 0.0, 0.0, sy, rx0 - tx0 * sx, ry0 - ty0 * sy],
    })
}

/// A rectangle array normalised to lower-left / upper-right order.
fn rectangle(doc: &Document, value: &Object) -> Option<[f32; 4]> {
    let [x0, y0, x1, y1] = <[f32; 4]>::try_from(numbers(doc, value)?).ok()?;
    Some([x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)])
}

fn numbers(doc: &Document, value: &Object) -> Option<Vec<f32>> {
    resolve(doc, value)
        .as_array()
        .ok()?
        .iter()
        .map(|item| number(resolve(doc, item)))
        .collect()
}

/// Axis-aligned bounds of `rect` after applying `matrix`.
fn transform_box(rect: [f32; 4], matrix: [f32; 6]) -> [f32; 4] {
    let [a, b, c, d, e, f] = matrix;
    let [x0, y0, x1, y1] = rect;
    let corners = [(x0, y0), (x0, y1), (x1, y0), (x1, y1)].map(|(x, y)| (a * x + c * y + e, b * x + d * y + f));

    corners.iter().fold(
        [f32::MAX, f32::MAX, f32::MIN, f32::MIN],
        |[min_x, min_y, max_x, max_y], &(x, y)| [min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y)],
    )
}
