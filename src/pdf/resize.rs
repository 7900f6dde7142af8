//! Page resizing using lopdf

use std::path::Path;

use lopdf::{Document, ObjectId};
use tracing::debug;

use crate::error::{Error, Result};
use crate::layout::{Placement, TargetDimensions};
use crate::pdf::builder::OutputDocument;
use crate::pdf::page::{flatten_inherited, media_box, reset_media_box, transform_page};

/// Options for resizing a document
#[derive(Debug, Clone, Copy)]
pub struct ResizeOptions {
    /// Size every output page is set to
    pub target: TargetDimensions,
    /// Scale page content along with the page boxes
    pub scale_content: bool,
    /// Keep the aspect ratio: one factor for both axes, content centred
    pub fit: bool,
}

/// Result of a successful resize
#[derive(Debug, Clone, PartialEq)]
pub struct ResizedDocument {
    pub page_count: usize,
    /// Placement computed for each page, in page order
    pub placements: Vec<Placement>,
}

/// Resize every page of `input` to the target size and write it to `output`
///
/// # Example
///
/// ```no_run
/// use pdf_resize::layout::PaperFormat;
/// use pdf_resize::pdf::{resize_one, ResizeOptions};
/// use std::path::Path;
///
/// let options = ResizeOptions {
///     target: PaperFormat::A4.target_dimensions(),
///     scale_content: true,
///     fit: false,
/// };
///
/// resize_one(Path::new("letter.pdf"), Path::new("out/letter.pdf"), &options)
///     .expect("Failed to resize");
/// ```
pub fn resize_one(
    input: &Path,
    output: &Path,
    options: &ResizeOptions,
) -> Result<ResizedDocument> {
    if !input.exists() {
        return Err(Error::FileNotFound(input.to_path_buf()));
    }

    let doc = Document::load(input)?;

    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
    if page_ids.is_empty() {
        return Err(Error::EmptyPdf(input.to_path_buf()));
    }

    let mut builder = OutputDocument::new(doc);
    let mut placements = Vec::with_capacity(page_ids.len());

    for (index, page_id) in page_ids.into_iter().enumerate() {
        let placement = resize_page(builder.document_mut(), page_id, options)?;
        debug!(
            "{} page {}: scale {:.4} x {:.4}, offset {:.2}, {:.2}",
            input.display(),
            index + 1,
            placement.scale.x,
            placement.scale.y,
            placement.offset_x,
            placement.offset_y
        );
        placements.push(placement);
        builder.add_page(page_id);
    }

    let page_count = builder.page_count();
    builder.save(output)?;

    Ok(ResizedDocument { page_count, placements })
}

fn resize_page(
    doc: &mut Document,
    page_id: ObjectId,
    options: &ResizeOptions,
) -> Result<Placement> {
    let original = media_box(doc, page_id)?.size();
    let placement = if options.fit {
        Placement::fit(original, options.target)?
    } else {
        Placement::stretch(original, options.target)?
    };

    // Inherited boxes must live on the page before they can be scaled
    flatten_inherited(doc, page_id)?;

    if options.scale_content && !placement.is_identity() {
        transform_page(doc, page_id, placement)?;
    }

    reset_media_box(doc, page_id, options.target)?;

    Ok(placement)
}
