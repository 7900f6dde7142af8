//! Shared helpers for building PDF fixtures on the fly

#![allow(dead_code)]

use lopdf::{dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};

/// Write a PDF with one page per `(width, height)` entry
pub fn write_pdf(path: &Path, sizes: &[(f64, f64)]) -> PathBuf {
    let count = Object::Integer(sizes.len() as i64);
    write_pdf_with_count(path, sizes, count)
}

/// Write a PDF whose Pages node carries `count` as its Count entry
pub fn write_pdf_with_count(path: &Path, sizes: &[(f64, f64)], count: Object) -> PathBuf {
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

    let mut kids = Vec::new();
    for (i, (width, height)) in sizes.iter().enumerate() {
        let content = format!("BT /F1 24 Tf 72 72 Td (Page {}) Tj ET", i + 1);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(*width as f32),
                Object::Real(*height as f32),
            ],
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.save(path).expect("Failed to write fixture PDF");
    path.to_path_buf()
}

/// Write a file with a .pdf name that is not a PDF
pub fn write_corrupt_pdf(path: &Path) -> PathBuf {
    std::fs::write(path, b"this is not a pdf document").expect("Failed to write corrupt fixture");
    path.to_path_buf()
}

/// Load a PDF and return the raw MediaBox array of each page
pub fn media_boxes(path: &Path) -> Vec<Vec<f32>> {
    let doc = Document::load(path).expect("Failed to load output PDF");
    doc.get_pages()
        .values()
        .map(|&id| {
            let page = doc.get_dictionary(id).expect("page dictionary");
            page.get(b"MediaBox")
                .and_then(|mb| mb.as_array())
                .expect("page has its own MediaBox")
                .iter()
                .map(|n| n.as_float().expect("numeric MediaBox"))
                .collect()
        })
        .collect()
}
