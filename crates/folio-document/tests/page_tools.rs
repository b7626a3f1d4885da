// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end tests for the page tools: expression in, document out.

mod common;

use common::{numbered_pdf, page_numbers, zip_entries};
use folio_core::{FolioError, InputFile, PaperSize, SplitMode, ToolConfig};
use folio_document::{PdfReader, Toolbox};

#[test]
fn delete_keeps_the_unselected_pages() {
    let toolbox = Toolbox::new(ToolConfig::default());
    let out = toolbox
        .delete_pages(&numbered_pdf("doc.pdf", 10), "2, 4-6, 9")
        .unwrap();

    assert_eq!(out.file_name, "pages-deleted.pdf");
    assert_eq!(page_numbers(&out.bytes), vec![1, 3, 7, 8, 10]);
}

#[test]
fn invalid_terms_are_skipped_not_fatal() {
    let toolbox = Toolbox::new(ToolConfig::default());
    let out = toolbox
        .split(
            &numbered_pdf("doc.pdf", 10),
            &SplitMode::Range("abc, 0, 3, 8-4, 10-12, 5".into()),
        )
        .unwrap();

    assert_eq!(page_numbers(&out.bytes), vec![3, 5]);
}

#[test]
fn organize_then_split_composes() {
    let toolbox = Toolbox::default();
    let reversed = toolbox.organize(&numbered_pdf("doc.pdf", 5), "5-1");
    assert!(matches!(reversed, Err(FolioError::NothingSelected)));

    let organized = toolbox
        .organize(&numbered_pdf("doc.pdf", 5), "5, 4, 3, 2, 1")
        .unwrap();
    let again = InputFile::new("organized.pdf", organized.bytes);
    let odd = toolbox.split(&again, &SplitMode::Odd).unwrap();

    assert_eq!(page_numbers(&odd.bytes), vec![5, 3, 1]);
}

#[test]
fn extract_archive_holds_single_page_documents() {
    let out = Toolbox::default()
        .extract_pages(&numbered_pdf("scan.pdf", 6), "2-3")
        .unwrap();

    let entries = zip_entries(&out.bytes);
    assert_eq!(out.file_name, "extracted-pages.zip");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].0, "scan-page-2.pdf");
    assert_eq!(page_numbers(&entries[0].1), vec![2]);
    assert_eq!(page_numbers(&entries[1].1), vec![3]);
}

#[test]
fn merge_concatenates_in_input_order() {
    let out = Toolbox::default()
        .merge(&[numbered_pdf("a.pdf", 2), numbered_pdf("b.pdf", 3)])
        .unwrap();
    assert_eq!(page_numbers(&out.bytes), vec![1, 2, 1, 2, 3]);
}

#[test]
fn alternate_appends_leftover_pages() {
    let out = Toolbox::default()
        .alternate(&[numbered_pdf("a.pdf", 3), numbered_pdf("b.pdf", 1)])
        .unwrap();
    assert_eq!(page_numbers(&out.bytes), vec![1, 1, 2, 3]);
}

#[test]
fn blank_pages_take_the_neighbouring_size() {
    let out = Toolbox::default()
        .add_blank_pages(&numbered_pdf("doc.pdf", 3), "2", 2)
        .unwrap();

    let pages = PdfReader::from_bytes(&out.bytes).unwrap().pages();
    let widths: Vec<f32> = pages.iter().map(|page| page.width_pt).collect();
    assert_eq!(widths, vec![101.0, 102.0, 102.0, 102.0, 103.0]);
}

#[test]
fn blank_page_position_past_the_end_is_refused() {
    let result = Toolbox::default().add_blank_pages(&numbered_pdf("doc.pdf", 3), "4", 1);
    assert!(matches!(result, Err(FolioError::InvalidOption(_))));
}

#[test]
fn info_names_custom_sizes() {
    let pages = Toolbox::default().info(&numbered_pdf("doc.pdf", 2)).unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].number, 1);
    assert!(matches!(pages[0].paper, PaperSize::Custom { .. }));
}

#[test]
fn garbage_input_is_a_pdf_error() {
    let input = InputFile::new("broken.pdf", b"not a pdf".to_vec());
    let result = Toolbox::default().strip_metadata(&input);
    assert!(matches!(result, Err(FolioError::Pdf(_))));
}
