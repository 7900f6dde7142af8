//! Output document assembly using lopdf
//!
//! Pages are collected in order and written under a fresh, flat page tree,
//! the same way lopdf's merge example rebuilds a catalog.

use std::fs;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::Result;

/// Collects pages of a loaded document and writes them out as a new document
pub struct OutputDocument {
    doc: Document,
    page_ids: Vec<ObjectId>,
}

impl OutputDocument {
    /// Start from a loaded document; its objects are reused as-is
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            page_ids: Vec::new(),
        }
    }

    /// Access the underlying document to transform pages before adding them
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Append a page; pages are written in the order they are added
    pub fn add_page(&mut self, page_id: ObjectId) {
        self.page_ids.push(page_id);
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Build the page tree and catalog, then save to `path`.
    ///
    /// Parent directories are created when missing.
    pub fn save(mut self, path: &Path) -> Result<()> {
        let pages_id = self.doc.new_object_id();

        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|&id| Object::Reference(id))
            .collect();

        let mut pages_object = Dictionary::new();
        pages_object.set("Type", Object::Name(b"Pages".to_vec()));
        pages_object.set("Count", Object::Integer(self.page_ids.len() as i64));
        pages_object.set("Kids", Object::Array(kids));

        let catalog_id = self.doc.new_object_id();
        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));

        self.doc.objects.insert(pages_id, Object::Dictionary(pages_object));
        self.doc.objects.insert(catalog_id, Object::Dictionary(catalog));
        self.doc.trailer.set("Root", Object::Reference(catalog_id));

        for &page_id in &self.page_ids {
            if let Ok(Object::Dictionary(dict)) = self.doc.get_object_mut(page_id) {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }

        // The old catalog and page tree nodes are no longer reachable
        self.doc.prune_objects();
        self.doc.compress();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Dropping the returned handle closes the file before we return
        let _file = self.doc.save(path)?;

        Ok(())
    }
}
