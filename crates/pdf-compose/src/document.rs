//! Source and output documents
//!
//! A [`SourceDocument`] is what the caller hands in: a parsed PDF, an
//! undecoded raster image, or bytes of a kind the engine can't use. An
//! [`OutputDocument`] is a finished, self-contained PDF plus a record of
//! where each of its pages came from.

use crate::render::get_page_dimensions;
use crate::types::{ComposeError, DocumentId, Result, Rotation};
use image::ImageFormat;
use lopdf::Document;

const PDF_MAGIC: &[u8] = b"%PDF-";
const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Raster formats accepted as source content
const RASTER_FORMATS: [ImageFormat; 5] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::Bmp,
    ImageFormat::WebP,
];

/// The content kinds a source document can hold
#[derive(Debug, Clone)]
pub enum SourceContent {
    /// A vector page document
    Pages(Document),
    /// An encoded raster image, decoded when it is composed
    Raster { bytes: Vec<u8>, format: ImageFormat },
    /// Anything else; composing it fails with `UnsupportedFormat`
    Unsupported { media_type: String },
}

/// A caller-owned input document. The engine never mutates it.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    id: DocumentId,
    content: SourceContent,
}

impl SourceDocument {
    /// Classify raw file bytes by their signature.
    ///
    /// PDF bytes are parsed immediately, so a broken PDF is reported here.
    /// Raster bytes are only sniffed; decoding happens during composition.
    pub fn from_bytes(id: impl Into<DocumentId>, bytes: Vec<u8>) -> Result<Self> {
        let id = id.into();

        if bytes.starts_with(PDF_MAGIC) {
            let document = Document::load_mem(&bytes)?;
            return Ok(Self::from_pdf(id, document));
        }

        let content = match image::guess_format(&bytes) {
            Ok(format) if RASTER_FORMATS.contains(&format) => {
                SourceContent::Raster { bytes, format }
            }
            Ok(format) => SourceContent::Unsupported {
                media_type: format.to_mime_type().to_string(),
            },
            Err(_) => SourceContent::Unsupported {
                media_type: UNKNOWN_MEDIA_TYPE.to_string(),
            },
        };

        log::debug!("Classified {} as {}", id, content.kind());
        Ok(Self { id, content })
    }

    /// Wrap an already parsed PDF
    pub fn from_pdf(id: impl Into<DocumentId>, document: Document) -> Self {
        Self {
            id: id.into(),
            content: SourceContent::Pages(document),
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn content(&self) -> &SourceContent {
        &self.content
    }

    /// Number of pages the document contributes before any adjustment
    pub fn page_count(&self) -> usize {
        match &self.content {
            SourceContent::Pages(document) => document.get_pages().len(),
            SourceContent::Raster { .. } => 1,
            SourceContent::Unsupported { .. } => 0,
        }
    }

    /// Error for content the engine can't compose
    pub(crate) fn unsupported(&self, media_type: &str) -> ComposeError {
        ComposeError::UnsupportedFormat {
            document_id: self.id.clone(),
            media_type: media_type.to_string(),
        }
    }
}

impl SourceContent {
    fn kind(&self) -> &str {
        match self {
            SourceContent::Pages(_) => "application/pdf",
            SourceContent::Raster { format, .. } => format.to_mime_type(),
            SourceContent::Unsupported { media_type } => media_type,
        }
    }
}

/// Where an output page came from.
///
/// `rotation` records the adjustment the page was composed with. It is
/// already baked into the page content and nothing reapplies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOrigin {
    pub document_id: DocumentId,
    /// 0-based copy the page belongs to
    pub copy_index: usize,
    pub rotation: Rotation,
}

/// A finished output document.
///
/// Every page is self-contained; nothing in it refers back to a source.
#[derive(Debug, Clone)]
pub struct OutputDocument {
    document: Document,
    origins: Vec<PageOrigin>,
}

impl OutputDocument {
    pub(crate) fn new(document: Document, origins: Vec<PageOrigin>) -> Self {
        Self { document, origins }
    }

    pub fn page_count(&self) -> usize {
        self.origins.len()
    }

    /// Page sizes (width, height) in points, in page order
    pub fn page_sizes(&self) -> Result<Vec<(f32, f32)>> {
        self.document
            .get_pages()
            .values()
            .map(|&page_id| get_page_dimensions(&self.document, page_id))
            .collect()
    }

    /// Origin of every page, in page order
    pub fn origins(&self) -> &[PageOrigin] {
        &self.origins
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Serialize to PDF bytes.
    ///
    /// Serializing the same output twice gives identical bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut document = self.document.clone();
        let mut bytes = Vec::new();
        document.save_to(&mut bytes)?;
        Ok(bytes)
    }
}
