//! Page geometry access and transforms on lopdf page dictionaries

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::error::{Error, Result};
use crate::layout::{Placement, TargetDimensions};

/// Attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Boxes other than MediaBox that follow the content when it is scaled
const SECONDARY_BOXES: [&[u8]; 4] = [b"CropBox", b"BleedBox", b"TrimBox", b"ArtBox"];

/// A page box rectangle in points, normalized so that lower-left <= upper-right
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            llx: x0.min(x1),
            lly: y0.min(y1),
            urx: x0.max(x1),
            ury: y0.max(y1),
        }
    }

    pub fn width(&self) -> f64 {
        self.urx - self.llx
    }

    pub fn height(&self) -> f64 {
        self.ury - self.lly
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width(), self.height())
    }

    pub fn transformed(&self, placement: Placement) -> Self {
        let (x0, y0) = placement.apply(self.llx, self.lly);
        let (x1, y1) = placement.apply(self.urx, self.ury);
        Self::new(x0, y0, x1, y1)
    }

    pub fn to_object(&self) -> Object {
        Object::Array(vec![number(self.llx), number(self.lly), number(self.urx), number(self.ury)])
    }
}

/// Integers stay integers in the output; everything else becomes a real
fn number(value: f64) -> Object {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Object::Integer(value as i64)
    } else {
        Object::Real(value as f32)
    }
}

/// Follow an indirect reference, if any
fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Result<&'a Object> {
    match object {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

/// Parse a four-number rectangle array
pub fn read_rect(doc: &Document, object: &Object) -> Result<Rect> {
    let array = resolve(doc, object)?
        .as_array()
        .map_err(|_| Error::InvalidGeometry("page box is not an array".to_string()))?;

    if array.len() != 4 {
        return Err(Error::InvalidGeometry(format!(
            "page box has {} elements instead of 4",
            array.len()
        )));
    }

    let mut values = [0f64; 4];
    for (value, element) in values.iter_mut().zip(array) {
        *value = resolve(doc, element)?
            .as_float()
            .map_err(|_| {
                Error::InvalidGeometry(format!("page box element is not a number: {:?}", element))
            })? as f64;
    }

    Ok(Rect::new(values[0], values[1], values[2], values[3]))
}

/// Look up a page attribute, walking up through `/Parent` when the page
/// does not carry it itself
pub fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = Some(page_id);
    // Guard against cyclic parent chains
    let mut depth = 0;

    while let Some(id) = current {
        let dict = doc.get_dictionary(id).ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }

        current = match dict.get(b"Parent") {
            Ok(Object::Reference(parent)) => Some(*parent),
            _ => None,
        };

        depth += 1;
        if depth > 64 {
            return None;
        }
    }

    None
}

/// The page's media box, inherited or not
pub fn media_box(doc: &Document, page_id: ObjectId) -> Result<Rect> {
    let object = inherited_attribute(doc, page_id, b"MediaBox")
        .ok_or_else(|| Error::InvalidGeometry(format!("page {:?} has no MediaBox", page_id)))?;
    read_rect(doc, &object)
}

/// Copy inherited attributes onto the page so it can stand alone in a flat page tree
pub fn flatten_inherited(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let inherited: Vec<(&[u8], Object)> = INHERITABLE
        .iter()
        .filter_map(|key| inherited_attribute(doc, page_id, key).map(|value| (*key, value)))
        .collect();

    let page = doc.get_dictionary_mut(page_id)?;
    for (key, value) in inherited {
        if !page.has(key) {
            page.set(key, value);
        }
    }

    Ok(())
}

/// Collect the references of a page's content streams
fn content_refs(doc: &Document, page: &Dictionary) -> Vec<Object> {
    match page.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            // Contents may point at an array of streams
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

/// Move page content, its secondary boxes and annotation rects onto the target page
pub fn transform_page(doc: &mut Document, page_id: ObjectId, placement: Placement) -> Result<()> {
    let (contents, boxes, annots) = {
        let page = doc.get_dictionary(page_id)?;
        let contents = content_refs(doc, page);

        let mut boxes = Vec::new();
        for key in SECONDARY_BOXES {
            if let Ok(object) = page.get(key) {
                boxes.push((key, read_rect(doc, object)?.transformed(placement)));
            }
        }

        let annots = match page.get(b"Annots").ok().map(|a| resolve(doc, a)) {
            Some(Ok(Object::Array(items))) => items.clone(),
            _ => Vec::new(),
        };

        (contents, boxes, annots)
    };

    if !contents.is_empty() {
        let prefix = format!(
            "q\n{:.6} 0 0 {:.6} {:.6} {:.6} cm\n",
            placement.scale.x, placement.scale.y, placement.offset_x, placement.offset_y
        );
        let prefix_id = doc.add_object(Stream::new(Dictionary::new(), prefix.into_bytes()));
        let suffix_id = doc.add_object(Stream::new(Dictionary::new(), b"\nQ\n".to_vec()));

        let mut wrapped = Vec::with_capacity(contents.len() + 2);
        wrapped.push(Object::Reference(prefix_id));
        wrapped.extend(contents);
        wrapped.push(Object::Reference(suffix_id));

        doc.get_dictionary_mut(page_id)?.set("Contents", Object::Array(wrapped));
    }

    let page = doc.get_dictionary_mut(page_id)?;
    for (key, rect) in boxes {
        page.set(key, rect.to_object());
    }

    let mut direct_annots = Vec::with_capacity(annots.len());
    for annot in annots {
        match annot {
            Object::Reference(id) => {
                transform_annotation(doc, id, placement)?;
                direct_annots.push(Object::Reference(id));
            }
            Object::Dictionary(mut dict) => {
                let rect = dict.get(b"Rect").and_then(|r| r.as_array()).map(|r| r.to_vec());
                if let Ok(rect) = rect {
                    let rect = read_rect(doc, &Object::Array(rect))?;
                    dict.set("Rect", rect.transformed(placement).to_object());
                }
                direct_annots.push(Object::Dictionary(dict));
            }
            other => direct_annots.push(other),
        }
    }
    if !direct_annots.is_empty() {
        doc.get_dictionary_mut(page_id)?.set("Annots", Object::Array(direct_annots));
    }

    Ok(())
}

fn transform_annotation(
    doc: &mut Document,
    annot_id: ObjectId,
    placement: Placement,
) -> Result<()> {
    let rect = match doc.get_dictionary(annot_id).ok().and_then(|d| d.get(b"Rect").ok()) {
        Some(object) => read_rect(doc, object)?,
        None => return Ok(()),
    };

    doc.get_dictionary_mut(annot_id)?
        .set("Rect", rect.transformed(placement).to_object());
    Ok(())
}

/// Force the page's media box to `[0 0 width height]`
pub fn reset_media_box(
    doc: &mut Document,
    page_id: ObjectId,
    target: TargetDimensions,
) -> Result<()> {
    let rect = Rect::new(0.0, 0.0, target.width_pt, target.height_pt);
    doc.get_dictionary_mut(page_id)?.set("MediaBox", rect.to_object());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ScaleFactor;
    use lopdf::dictionary;

    fn doc_with_page(page: Dictionary) -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut page = page;
        page.set("Parent", Object::Reference(pages_id));
        let page_id = doc.add_object(page);
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Rotate" => 90,
            }),
        );
        (doc, page_id)
    }

    #[test]
    fn test_rect_normalizes_corners() {
        let rect = Rect::new(100.0, 200.0, 0.0, 0.0);
        assert_eq!(rect, Rect::new(0.0, 0.0, 100.0, 200.0));
        assert_eq!(rect.size(), (100.0, 200.0));
    }

    #[test]
    fn test_media_box_is_inherited() {
        let (doc, page_id) = doc_with_page(dictionary! { "Type" => "Page" });
        let rect = media_box(&doc, page_id).unwrap();
        assert_eq!(rect.size(), (612.0, 792.0));
    }

    #[test]
    fn test_media_box_reads_reals_and_offsets() {
        let (doc, page_id) = doc_with_page(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![Object::Real(10.0), 20.into(), Object::Real(110.5), 220.into()],
        });
        let rect = media_box(&doc, page_id).unwrap();
        assert_eq!(rect.llx, 10.0);
        assert_eq!(rect.size(), (100.5, 200.0));
    }

    #[test]
    fn test_malformed_media_box() {
        let (doc, page_id) = doc_with_page(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into()],
        });
        assert!(matches!(media_box(&doc, page_id), Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn test_flatten_inherited_copies_missing_attributes() {
        let (mut doc, page_id) = doc_with_page(dictionary! { "Type" => "Page", "Rotate" => 0 });
        flatten_inherited(&mut doc, page_id).unwrap();

        let page = doc.get_dictionary(page_id).unwrap();
        assert!(page.has(b"MediaBox"));
        // The page's own value wins over the parent's
        assert_eq!(page.get(b"Rotate").unwrap().as_i64().unwrap(), 0);
    }

    /// A 100x100 page with one content stream, a CropBox and one annotation
    fn square_page() -> (Document, ObjectId, ObjectId, ObjectId) {
        let mut doc = Document::with_version("1.5");
        let content = Stream::new(Dictionary::new(), b"0 0 m 10 10 l S".to_vec());
        let content_id = doc.add_object(content);
        let annot_id = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Rect" => vec![10.into(), 10.into(), 20.into(), 20.into()],
        });
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 100.into(), 100.into()],
            "CropBox" => vec![0.into(), 0.into(), 100.into(), 100.into()],
            "Contents" => Object::Reference(content_id),
            "Annots" => vec![Object::Reference(annot_id)],
        });
        (doc, page_id, content_id, annot_id)
    }

    fn prefix_content(doc: &Document, page_id: ObjectId) -> Vec<u8> {
        let page = doc.get_dictionary(page_id).unwrap();
        let contents = page.get(b"Contents").unwrap().as_array().unwrap();
        let prefix_id = contents[0].as_reference().unwrap();
        doc.get_object(prefix_id).unwrap().as_stream().unwrap().content.clone()
    }

    #[test]
    fn test_transform_page_wraps_content_and_scales_boxes() {
        let (mut doc, page_id, content_id, annot_id) = square_page();
        let placement = Placement {
            scale: ScaleFactor { x: 2.0, y: 0.5 },
            offset_x: 0.0,
            offset_y: 0.0,
        };

        transform_page(&mut doc, page_id, placement).unwrap();

        let page = doc.get_dictionary(page_id).unwrap();
        let contents = page.get(b"Contents").unwrap().as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[1], Object::Reference(content_id));
        assert_eq!(
            prefix_content(&doc, page_id),
            b"q\n2.000000 0 0 0.500000 0.000000 0.000000 cm\n".to_vec()
        );

        let crop = read_rect(&doc, page.get(b"CropBox").unwrap()).unwrap();
        assert_eq!(crop.size(), (200.0, 50.0));

        let annot = doc.get_dictionary(annot_id).unwrap();
        let rect = read_rect(&doc, annot.get(b"Rect").unwrap()).unwrap();
        assert_eq!(rect, Rect::new(20.0, 5.0, 40.0, 10.0));
    }

    #[test]
    fn test_transform_page_with_offset_moves_boxes() {
        let (mut doc, page_id, _, annot_id) = square_page();
        let target = TargetDimensions { width_pt: 100.0, height_pt: 50.0 };
        let placement = Placement::fit((100.0, 100.0), target).unwrap();

        transform_page(&mut doc, page_id, placement).unwrap();

        assert_eq!(
            prefix_content(&doc, page_id),
            b"q\n0.500000 0 0 0.500000 25.000000 0.000000 cm\n".to_vec()
        );

        let page = doc.get_dictionary(page_id).unwrap();
        let crop = read_rect(&doc, page.get(b"CropBox").unwrap()).unwrap();
        assert_eq!(crop, Rect::new(25.0, 0.0, 75.0, 50.0));

        let annot = doc.get_dictionary(annot_id).unwrap();
        let rect = read_rect(&doc, annot.get(b"Rect").unwrap()).unwrap();
        assert_eq!(rect, Rect::new(30.0, 5.0, 35.0, 10.0));
    }

    #[test]
    fn test_reset_media_box() {
        let (mut doc, page_id) = doc_with_page(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![50.into(), 50.into(), 300.into(), 400.into()],
        });
        let target = TargetDimensions { width_pt: 595.0, height_pt: 842.0 };

        reset_media_box(&mut doc, page_id, target).unwrap();
        reset_media_box(&mut doc, page_id, target).unwrap();

        let rect = media_box(&doc, page_id).unwrap();
        assert_eq!(rect, Rect::new(0.0, 0.0, 595.0, 842.0));
        assert_eq!(
            doc.get_dictionary(page_id).unwrap().get(b"MediaBox").unwrap(),
            &Object::Array(vec![0.into(), 0.into(), 595.into(), 842.into()])
        );
    }
}
