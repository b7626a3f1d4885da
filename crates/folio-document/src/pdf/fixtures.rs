// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synthetic PDFs for unit tests.
//
// Page N (1-based) has a MediaBox width of 100 + N, so a page can be
// identified after any reordering by its width alone. Resources live on the
// /Pages node and are inherited, which exercises re-parenting.

use lopdf::{Document, Object, Stream, dictionary};

pub(crate) fn numbered_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::with_capacity(page_count);
    for number in 1..=page_count {
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
                Object::Integer(200),
            ],
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "Resources" => resources_id,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("Fixture"),
        "Producer" => Object::string_literal("folio tests"),
    });
    doc.trailer.set("Info", info_id);

    let mut output = Vec::new();
    doc.save_to(&mut output).expect("fixture serialises");
    output
}

/// Original 1-based page numbers of `bytes`, in document order.
pub(crate) fn page_numbers(bytes: &[u8]) -> Vec<i64> {
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

/// Minimal PNG of the given size.
pub(crate) fn png(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
    let mut buffer = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, image::ImageFormat::Png)
        .expect("png encodes");
    buffer.into_inner()
}

/// One 200 x 200 page carrying an /AcroForm with a visible text widget at
/// (50, 100) whose appearance is 100 x 20, a hidden widget, and a link.
pub(crate) fn form_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        b"BT /F1 12 Tf 10 10 Td (Form) Tj ET".to_vec(),
    ));
    let appearance_id = doc.add_object(Stream::new(
        dictionary! {
            "BBox" => rect([0, 0, 100, 20]),
        },
        b"0 0 1 rg 0 0 100 20 re f".to_vec(),
    ));

    let visible_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Tx",
        "T" => Object::string_literal("name"),
        "Rect" => rect([50, 100, 150, 120]),
        "AP" => dictionary! { "N" => appearance_id },
        "P" => page_id,
    });
    let hidden_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Tx",
        "T" => Object::string_literal("secret"),
        "F" => Object::Integer(2),
        "Rect" => rect([0, 0, 10, 10]),
        "AP" => dictionary! { "N" => appearance_id },
        "P" => page_id,
    });
    let link_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => rect([0, 180, 50, 200]),
    });

    doc.objects.insert(
        page_id,
        Object::Dictionary(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => rect([0, 0, 200, 200]),
            "Annots" => vec![
                Object::Reference(visible_id),
                Object::Reference(hidden_id),
                Object::Reference(link_id),
            ],
        }),
    );
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
        "AcroForm" => dictionary! {
            "Fields" => vec![Object::Reference(visible_id), Object::Reference(hidden_id)],
        },
    });
    doc.trailer.set("Root", catalog_id);

    let mut output = Vec::new();
    doc.save_to(&mut output).expect("fixture serialises");
    output
}

fn rect(values: [i64; 4]) -> Vec<Object> {
    values.into_iter().map(Object::Integer).collect()
}
