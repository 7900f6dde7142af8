//! PDF page inspection

use std::path::Path;
use lopdf::{Document, Object};
use crate::error::{Error, Result};
use crate::pdf::page::media_box;

/// Count pages by reading the Count field from the Pages dictionary
/// This is more reliable than get_pages() which doesn't handle nested page trees
fn count_pages_from_catalog(doc: &Document) -> Result<usize> {
    let catalog = doc.catalog()?;

    let pages_id = match catalog.get(b"Pages")? {
        Object::Reference(id) => *id,
        _ => return Err(Error::MalformedPdf("Pages is not a reference".to_string())),
    };

    match doc.get_dictionary(pages_id)?.get(b"Count")? {
        Object::Integer(n) if *n >= 0 => Ok(*n as usize),
        _ => Err(Error::MalformedPdf("Count is not a page count".to_string())),
    }
}

fn load(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    Ok(Document::load(path)?)
}

/// Count the number of pages in a PDF file
///
/// This is a quick operation that reads the Count field from the Pages dictionary.
pub fn count_pages(path: &Path) -> Result<usize> {
    let doc = load(path)?;
    let page_count = count_pages_from_catalog(&doc)?;

    if page_count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    Ok(page_count)
}

/// Width and height in points of every page's media box, in page order
pub fn page_sizes(path: &Path) -> Result<Vec<(f64, f64)>> {
    let doc = load(path)?;

    doc.get_pages()
        .values()
        .map(|&page_id| media_box(&doc, page_id).map(|rect| rect.size()))
        .collect()
}
