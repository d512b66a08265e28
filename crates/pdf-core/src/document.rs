//! PDF Document wrapper

use crate::page_size::{A4_HEIGHT, A4_WIDTH};
use crate::text::{encode_literal, generate_text_operators, TextRenderContext};
use crate::{PdfError, Result};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::{BTreeMap, BTreeSet};

/// Resource name of the standard font on every page that shows text
const STANDARD_FONT_RESOURCE: &str = "F1";

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// Mid gray
    pub fn gray() -> Self {
        Self::rgb(0.5, 0.5, 0.5)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// PDF Document wrapper providing high-level operations
#[derive(Debug)]
pub struct PdfDocument {
    /// The underlying lopdf document
    pub(crate) inner: Document,
    /// Current font size
    current_font_size: f32,
    /// Current text color
    current_text_color: Color,
    /// Helvetica font object, created on first text insertion
    standard_font: Option<ObjectId>,
    /// Pages whose Resources already reference the standard font
    pages_with_font: BTreeSet<usize>,
    /// Buffered content operators per page (page number -> operators)
    page_content_buffer: BTreeMap<usize, Vec<u8>>,
}

impl PdfDocument {
    /// Create an empty document with no pages
    pub fn new() -> Self {
        let mut inner = Document::with_version("1.7");
        let pages_id = inner.new_object_id();
        inner.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0,
            }),
        );
        let catalog_id = inner.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        inner.trailer.set("Root", catalog_id);

        Self::from_document(inner)
    }

    /// Open a PDF document from bytes
    ///
    /// # Arguments
    /// * `data` - PDF file bytes
    pub fn open_from_bytes(data: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(data).map_err(|e| PdfError::OpenError(e.to_string()))?;
        Ok(Self::from_document(inner))
    }

    pub(crate) fn from_document(inner: Document) -> Self {
        Self {
            inner,
            current_font_size: 12.0,
            current_text_color: Color::default(),
            standard_font: None,
            pages_with_font: BTreeSet::new(),
            page_content_buffer: BTreeMap::new(),
        }
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }

    /// Set the font size used by subsequent text insertions
    pub fn set_font_size(&mut self, size: f32) {
        self.current_font_size = size;
    }

    /// Set the text color used by subsequent text insertions
    pub fn set_text_color(&mut self, color: Color) {
        self.current_text_color = color;
    }

    /// Insert text at a specific position using the standard Helvetica font
    ///
    /// # Arguments
    /// * `text` - Text to insert
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate in points
    /// * `y` - Y coordinate in points (from top)
    pub fn insert_text(&mut self, text: &str, page: usize, x: f64, y: f64) -> Result<()> {
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(PdfError::InvalidPage(page, page_count));
        }

        if text.is_empty() {
            return Ok(());
        }

        self.ensure_standard_font(page)?;

        // Convert Y coordinate from top-origin to PDF bottom-origin
        let page_height = self.get_page_height(page)?;
        let pdf_y = page_height - y;

        let ctx = TextRenderContext {
            font_name: STANDARD_FONT_RESOURCE.to_string(),
            font_size: self.current_font_size,
            color: self.current_text_color,
        };
        let ops = generate_text_operators(&encode_literal(text), x, pdf_y, &ctx);
        self.buffer_content(page, &ops);

        Ok(())
    }

    /// Save the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.flush_content_buffers()?;

        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    /// Get a reference to the underlying lopdf document
    pub fn inner(&self) -> &Document {
        &self.inner
    }

    /// Consume the wrapper, returning the lopdf document
    pub fn into_inner(mut self) -> Result<Document> {
        self.flush_content_buffers()?;
        Ok(self.inner)
    }

    /// Get all page object IDs in order
    pub fn get_page_ids(&self) -> Vec<ObjectId> {
        self.inner.get_pages().values().copied().collect()
    }

    /// Object ID of the document catalog
    pub(crate) fn catalog_id(&self) -> Result<ObjectId> {
        catalog_id(&self.inner)
    }

    /// Object ID of the root Pages node
    fn pages_root_id(&self) -> Result<ObjectId> {
        let catalog_id = self.catalog_id()?;
        let catalog_dict = self.inner.get_dictionary(catalog_id)?;
        catalog_dict
            .get(b"Pages")
            .map_err(|_| PdfError::ParseError("Catalog missing Pages entry".to_string()))?
            .as_reference()
            .map_err(|_| PdfError::ParseError("Pages is not a reference".to_string()))
    }

    /// Add a blank A4 page at the end of the document
    ///
    /// # Returns
    /// New page number (1-indexed)
    ///
    /// # Example
    /// ```ignore
    /// let mut doc = PdfDocument::new();
    /// let page = doc.add_blank_page()?;
    /// assert_eq!(page, 1);
    /// ```
    pub fn add_blank_page(&mut self) -> Result<usize> {
        let pages_id = self.pages_root_id()?;

        let contents_id = self
            .inner
            .add_object(Object::Stream(Stream::new(Dictionary::new(), vec![])));

        let page_count = self.page_count();

        let mut page_dict = Dictionary::new();
        page_dict.set(b"Type", Object::Name(b"Page".to_vec()));
        page_dict.set(b"Parent", Object::Reference(pages_id));
        page_dict.set(
            b"MediaBox",
            Object::Array(vec![
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(A4_WIDTH as f32),
                Object::Real(A4_HEIGHT as f32),
            ]),
        );
        page_dict.set(b"Resources", Object::Dictionary(Dictionary::new()));
        page_dict.set(b"Contents", Object::Reference(contents_id));

        let new_page_id = self.inner.add_object(Object::Dictionary(page_dict));

        let pages_dict = self.inner.get_dictionary(pages_id)?;
        let mut kids_array = pages_dict
            .get(b"Kids")
            .map_err(|_| PdfError::ParseError("Pages object missing Kids array".to_string()))?
            .as_array()
            .map_err(|_| PdfError::ParseError("Kids is not an array".to_string()))?
            .clone();
        kids_array.push(Object::Reference(new_page_id));

        let current_count = pages_dict
            .get(b"Count")
            .map_err(|_| PdfError::ParseError("Pages object missing Count".to_string()))?
            .as_i64()
            .map_err(|_| PdfError::ParseError("Count is not an integer".to_string()))?;

        let mut new_pages_dict = pages_dict.clone();
        new_pages_dict.set(b"Kids", Object::Array(kids_array));
        new_pages_dict.set(b"Count", Object::Integer(current_count + 1));
        self.inner.objects.insert(pages_id, new_pages_dict.into());

        Ok(page_count + 1)
    }

    /// Create the Helvetica font object once and reference it from the page
    fn ensure_standard_font(&mut self, page: usize) -> Result<()> {
        let font_id = match self.standard_font {
            Some(id) => id,
            None => {
                let id = self.inner.add_object(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => "Helvetica",
                    "Encoding" => "WinAnsiEncoding",
                });
                self.standard_font = Some(id);
                id
            }
        };

        if self.pages_with_font.contains(&page) {
            return Ok(());
        }
        self.add_font_to_page_resources(page, font_id)?;
        self.pages_with_font.insert(page);
        Ok(())
    }

    /// Add the font reference to a page's Resources dictionary
    fn add_font_to_page_resources(&mut self, page: usize, font_id: ObjectId) -> Result<()> {
        let pages = self.inner.get_pages();
        let page_id = *pages
            .get(&(page as u32))
            .ok_or(PdfError::InvalidPage(page, pages.len()))?;

        let page_dict = self.inner.get_dictionary(page_id)?;

        // Resources may be inline or a reference
        let mut resources_dict = match page_dict.get(b"Resources") {
            Ok(Object::Dictionary(dict)) => dict.clone(),
            Ok(Object::Reference(id)) => self
                .inner
                .get_dictionary(*id)
                .map(|d| d.clone())
                .unwrap_or_default(),
            _ => Dictionary::new(),
        };

        let mut font_dict = match resources_dict.get(b"Font") {
            Ok(Object::Dictionary(dict)) => dict.clone(),
            Ok(Object::Reference(id)) => self
                .inner
                .get_dictionary(*id)
                .map(|d| d.clone())
                .unwrap_or_default(),
            _ => Dictionary::new(),
        };

        font_dict.set(STANDARD_FONT_RESOURCE, Object::Reference(font_id));
        resources_dict.set(b"Font", Object::Dictionary(font_dict));

        let mut new_page_dict = page_dict.clone();
        new_page_dict.set(b"Resources", Object::Dictionary(resources_dict));
        self.inner.objects.insert(page_id, new_page_dict.into());

        Ok(())
    }

    /// Get page height in points
    ///
    /// Extracts the page height from the MediaBox or CropBox.
    /// Handles inherited MediaBox from parent Pages node.
    fn get_page_height(&self, page: usize) -> Result<f64> {
        let pages = self.inner.get_pages();
        let page_id = *pages
            .get(&(page as u32))
            .ok_or(PdfError::InvalidPage(page, pages.len()))?;

        let media_box = inherited_attribute(&self.inner, page_id, &[b"MediaBox", b"CropBox"])?
            .map(|obj| match obj {
                Object::Array(arr) => Ok(arr),
                _ => Err(PdfError::ParseError("MediaBox is not an array".to_string())),
            })
            .transpose()?
            .unwrap_or_else(|| {
                // Fallback: assume A4 page size
                vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(A4_WIDTH as f32),
                    Object::Real(A4_HEIGHT as f32),
                ]
            });

        extract_height_from_media_box(&media_box)
    }

    /// Buffer content operators for a page (written at save time)
    fn buffer_content(&mut self, page: usize, content: &[u8]) {
        self.page_content_buffer
            .entry(page)
            .or_default()
            .extend_from_slice(content);
    }

    /// Flush all buffered content to page streams, in page order
    fn flush_content_buffers(&mut self) -> Result<()> {
        let buffers = std::mem::take(&mut self.page_content_buffer);

        for (page, content) in buffers {
            if !content.is_empty() {
                self.append_to_content_stream(page, &content)?;
            }
        }

        Ok(())
    }

    /// Append content to a page's content stream
    ///
    /// Handles both compressed and uncompressed content streams.
    fn append_to_content_stream(&mut self, page: usize, content: &[u8]) -> Result<()> {
        let pages = self.inner.get_pages();
        let page_id = *pages
            .get(&(page as u32))
            .ok_or(PdfError::InvalidPage(page, pages.len()))?;

        let page_dict = self.inner.get_dictionary(page_id)?.clone();

        let existing_content = match page_dict.get(b"Contents") {
            Ok(Object::Stream(stream)) => stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone()),
            Ok(Object::Reference(ref_id)) => self.stream_content(*ref_id),
            Ok(Object::Array(arr)) => {
                let mut combined = Vec::new();
                for obj in arr {
                    if let Object::Reference(ref_id) = obj {
                        combined.extend_from_slice(&self.stream_content(*ref_id));
                        combined.push(b'\n');
                    }
                }
                combined
            }
            _ => Vec::new(),
        };

        let mut new_content = existing_content;
        new_content.extend_from_slice(content);

        let stream_id = self
            .inner
            .add_object(Stream::new(Dictionary::new(), new_content));

        let mut new_page_dict = page_dict;
        new_page_dict.set(b"Contents", Object::Reference(stream_id));
        self.inner.objects.insert(page_id, new_page_dict.into());

        Ok(())
    }

    /// Decompressed content of a stream object, empty when not a stream
    fn stream_content(&self, id: ObjectId) -> Vec<u8> {
        match self.inner.get_object(id) {
            Ok(Object::Stream(stream)) => stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone()),
            _ => Vec::new(),
        }
    }
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Object ID of a document's catalog
pub(crate) fn catalog_id(doc: &Document) -> Result<ObjectId> {
    doc.trailer
        .get(b"Root")
        .map_err(|_| PdfError::ParseError("Document trailer missing Root entry".to_string()))?
        .as_reference()
        .map_err(|_| PdfError::ParseError("Root is not a reference".to_string()))
}

/// Look up a page attribute, following the Parent chain when it is inherited
///
/// Returns the first key found in the nearest node, dereferenced.
pub(crate) fn inherited_attribute(
    doc: &Document,
    page_id: ObjectId,
    keys: &[&[u8]],
) -> Result<Option<Object>> {
    let mut current_id = page_id;

    // Follow parent chain up to 10 levels (safety limit)
    for _ in 0..10 {
        let dict = doc
            .get_dictionary(current_id)
            .map_err(|_| PdfError::ParseError("Object is not a dictionary".to_string()))?;

        for key in keys {
            if let Ok(value) = dict.get(key) {
                let value = match value {
                    Object::Reference(ref_id) => doc.get_object(*ref_id)?.clone(),
                    other => other.clone(),
                };
                return Ok(Some(value));
            }
        }

        match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => current_id = *parent_id,
            _ => break,
        }
    }

    Ok(None)
}

/// Extract height from MediaBox array
fn extract_height_from_media_box(media_box_array: &[Object]) -> Result<f64> {
    if media_box_array.len() >= 4 {
        let y1 = number(&media_box_array[1])
            .ok_or_else(|| PdfError::ParseError("Invalid MediaBox y1".to_string()))?;
        let y2 = number(&media_box_array[3])
            .ok_or_else(|| PdfError::ParseError("Invalid MediaBox y2".to_string()))?;
        return Ok(y2 - y1);
    }

    Err(PdfError::ParseError("Invalid MediaBox format".to_string()))
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_no_pages() {
        let doc = PdfDocument::new();
        assert_eq!(doc.page_count(), 0);
    }

    #[test]
    fn test_add_blank_page() {
        let mut doc = PdfDocument::new();
        assert_eq!(doc.add_blank_page().unwrap(), 1);
        assert_eq!(doc.add_blank_page().unwrap(), 2);
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn test_insert_text_rejects_invalid_page() {
        let mut doc = PdfDocument::new();
        let err = doc.insert_text("Hello", 1, 50.0, 100.0).unwrap_err();
        assert!(matches!(err, PdfError::InvalidPage(1, 0)));
    }

    #[test]
    fn test_insert_text_round_trips_through_bytes() {
        let mut doc = PdfDocument::new();
        doc.add_blank_page().unwrap();
        doc.set_font_size(20.0);
        doc.insert_text("GC-310 Petition for Conservatorship", 1, 50.0, 100.0)
            .unwrap();
        let bytes = doc.to_bytes().unwrap();

        let reloaded = lopdf::Document::load_mem(&bytes).unwrap();
        let page_id = *reloaded.get_pages().get(&1).unwrap();
        let content = reloaded.get_page_content(page_id).unwrap();
        let content = String::from_utf8_lossy(&content);
        assert!(content.contains("(GC-310 Petition for Conservatorship) Tj"));
        assert!(content.contains("/F1 20 Tf"));
    }

    #[test]
    fn test_text_position_is_measured_from_top() {
        let mut doc = PdfDocument::new();
        doc.add_blank_page().unwrap();
        doc.insert_text("x", 1, 50.0, 100.0).unwrap();
        let bytes = doc.to_bytes().unwrap();
        let content = {
            let reloaded = lopdf::Document::load_mem(&bytes).unwrap();
            let page_id = *reloaded.get_pages().get(&1).unwrap();
            reloaded.get_page_content(page_id).unwrap()
        };
        assert!(String::from_utf8_lossy(&content).contains("50 741.89"));
    }
}
