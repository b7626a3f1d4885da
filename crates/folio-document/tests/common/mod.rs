// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared fixtures for the integration tests.
//
// Page N of a numbered document is 100 + N points wide, so the original
// page number survives any reordering.

#![allow(dead_code)]

use std::io::{Cursor, Read};

use folio_core::InputFile;
use lopdf::{Document, Object, Stream, dictionary};

pub fn numbered_pdf(name: &str, page_count: usize) -> InputFile {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = (1..=page_count)
        .map(|number| {
            let content = format!("BT /F1 12 Tf 10 10 Td (Page {number}) Tj ET");
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(100 + number as i64),
                    Object::Integer(300),
                ],
            });
            Object::Reference(page_id)
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("fixture serialises");
    InputFile::new(name, bytes)
}

/// Original page numbers of a numbered document, in document order.
pub fn page_numbers(bytes: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(bytes).expect("output parses");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let page = doc.get_dictionary(page_id).expect("page dictionary");
            let media_box = page
                .get(b"MediaBox")
                .and_then(Object::as_array)
                .expect("MediaBox");
            media_box[2].as_i64().expect("integer width") - 100
        })
        .collect()
}

/// Name and contents of every entry, in archive order.
pub fn zip_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).expect("zip parses");
    (0..archive.len())
        .map(|index| {
            let mut entry = archive.by_index(index).expect("zip entry");
            let mut contents = Vec::new();
            entry.read_to_end(&mut contents).expect("entry reads");
            (entry.name().to_string(), contents)
        })
        .collect()
}
