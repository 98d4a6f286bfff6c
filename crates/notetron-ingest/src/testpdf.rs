// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test-only helpers that assemble small PDFs in memory.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Builds a single-page PDF whose content stream is exactly `ops`.
pub(crate) fn pdf_with_ops(ops: Vec<Operation>) -> Vec<u8> {
    pdf_with_pages(vec![ops])
}

/// Builds a PDF with one page per operation list.
pub(crate) fn pdf_with_pages(pages: Vec<Vec<Operation>>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    let count = pages.len() as i64;
    for ops in pages {
        let content = Content { operations: ops };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// A page showing `text` as one fragment on one baseline.
pub(crate) fn text_page(text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        tm(700.0),
        tj(text),
        Operation::new("ET", vec![]),
    ]
}

pub(crate) fn tj(text: &str) -> Operation {
    Operation::new("Tj", vec![Object::string_literal(text)])
}

pub(crate) fn tm(y: f64) -> Operation {
    Operation::new(
        "Tm",
        vec![
            1.into(),
            0.into(),
            0.into(),
            1.into(),
            72.into(),
            Object::Real(y as f32),
        ],
    )
}
