use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

use crate::constants::{MAX_SCALE_PERCENT, MIN_SCALE_PERCENT};

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Invalid adjustment: {0}")]
    InvalidAdjustment(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Unsupported format for {document_id}: {media_type}")]
    UnsupportedFormat {
        document_id: DocumentId,
        media_type: String,
    },
    #[error("Failed to embed page {} of {document_id}: {source}", .page_index + 1)]
    EmbeddingFailure {
        document_id: DocumentId,
        page_index: usize,
        #[source]
        source: Box<ComposeError>,
    },
}

pub type Result<T> = std::result::Result<T, ComposeError>;

/// Caller-chosen identifier for a source document (usually its file name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Content rotation, clockwise as seen on the printed page
///
/// Vector pages and raster images turn the same way. A positive angle given
/// to a PDF `rotate` operation turns counter-clockwise instead, so an angle
/// taken from such a source maps to `360 - degrees` here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "i32", into = "i32")
)]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    /// True for 90° and 270°, where width and height trade places
    pub fn is_quarter_turn(self) -> bool {
        matches!(self, Rotation::Clockwise90 | Rotation::Clockwise270)
    }

    /// `(sin, cos)` of the rotation in PDF user space (y axis up).
    ///
    /// A clockwise turn on paper is a negative angle in user space. The
    /// values are exact so right angles never pick up float noise.
    pub fn sin_cos(self) -> (f32, f32) {
        match self {
            Rotation::None => (0.0, 1.0),
            Rotation::Clockwise90 => (-1.0, 0.0),
            Rotation::Clockwise180 => (0.0, -1.0),
            Rotation::Clockwise270 => (1.0, 0.0),
        }
    }
}

impl TryFrom<i32> for Rotation {
    type Error = ComposeError;

    fn try_from(degrees: i32) -> Result<Self> {
        match degrees {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::Clockwise90),
            180 => Ok(Rotation::Clockwise180),
            270 => Ok(Rotation::Clockwise270),
            other => Err(ComposeError::InvalidAdjustment(format!(
                "rotation must be one of 0, 90, 180, 270 (got {other})"
            ))),
        }
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// Content scale in percent, always within 10..=200
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "f32", into = "f32")
)]
pub struct Scale(f32);

impl Scale {
    pub const IDENTITY: Scale = Scale(100.0);

    pub fn new(percent: f32) -> Result<Self> {
        if !(MIN_SCALE_PERCENT..=MAX_SCALE_PERCENT).contains(&percent) {
            return Err(ComposeError::InvalidAdjustment(format!(
                "scale must be between {MIN_SCALE_PERCENT} and {MAX_SCALE_PERCENT} percent (got {percent})"
            )));
        }
        Ok(Self(percent))
    }

    pub fn percent(self) -> f32 {
        self.0
    }

    /// Multiplicative factor (100% = 1.0)
    pub fn factor(self) -> f32 {
        self.0 / 100.0
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TryFrom<f32> for Scale {
    type Error = ComposeError;

    fn try_from(percent: f32) -> Result<Self> {
        Scale::new(percent)
    }
}

impl From<Scale> for f32 {
    fn from(scale: Scale) -> Self {
        scale.0
    }
}

/// How selected pages are distributed over the cells of an N-up grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum FillMode {
    /// Consecutive pages fill consecutive cells, sheet after sheet
    #[default]
    Sequential,
    /// Every enabled cell of a sheet shows the same page; one sheet per page
    Replicate,
}

/// Which source pages take part in the composition
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageRange {
    #[default]
    All,
    /// Page-number expression such as `"1,3,5-10"` (1-based)
    Specific(String),
}

/// A named paper size in PDF points (portrait)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperFormat {
    pub name: &'static str,
    pub width_pt: f32,
    pub height_pt: f32,
}

impl PaperFormat {
    pub const A4: PaperFormat = PaperFormat::named("A4", 595.0, 842.0);
    pub const A3: PaperFormat = PaperFormat::named("A3", 842.0, 1191.0);
    pub const LETTER: PaperFormat = PaperFormat::named("Letter", 612.0, 792.0);
    pub const LEGAL: PaperFormat = PaperFormat::named("Legal", 612.0, 1008.0);

    const fn named(name: &'static str, width_pt: f32, height_pt: f32) -> Self {
        Self {
            name,
            width_pt,
            height_pt,
        }
    }

    pub fn dimensions(self) -> (f32, f32) {
        (self.width_pt, self.height_pt)
    }
}

impl Default for PaperFormat {
    fn default() -> Self {
        Self::A4
    }
}

static STANDARD_PAPER: LazyLock<PaperTable> = LazyLock::new(|| {
    PaperTable::new(vec![
        PaperFormat::A4,
        PaperFormat::A3,
        PaperFormat::LETTER,
        PaperFormat::LEGAL,
    ])
});

/// Immutable name → paper size lookup
#[derive(Debug, Clone, PartialEq)]
pub struct PaperTable {
    formats: Vec<PaperFormat>,
}

impl PaperTable {
    pub fn new(formats: Vec<PaperFormat>) -> Self {
        Self { formats }
    }

    /// The built-in table (A4, A3, Letter, Legal), built on first use
    pub fn standard() -> &'static PaperTable {
        &STANDARD_PAPER
    }

    /// Case-insensitive lookup by name
    pub fn get(&self, name: &str) -> Option<PaperFormat> {
        self.formats
            .iter()
            .find(|format| format.name.eq_ignore_ascii_case(name.trim()))
            .copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.formats.iter().map(|format| format.name)
    }
}
