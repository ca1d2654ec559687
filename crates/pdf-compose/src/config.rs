//! Printer configuration and the print transport seam
//!
//! The configuration file is a flat JSON object with upper-case keys.
//! Missing keys and unrecognised values fall back to the default for that
//! key; a bad value never makes the whole file unusable.

use crate::types::*;
use std::future::Future;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_PRINTER_NAME: &str = "default";

/// Raw printer configuration as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE", default)
)]
pub struct PrinterConfig {
    pub default_printer: Option<String>,
    pub print_quality: Option<String>,
    pub paper_size: Option<String>,
    pub color_mode: Option<String>,
    pub duplex: Option<String>,
}

impl PrinterConfig {
    /// Parse configuration from JSON text
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ComposeError::Config(format!("Failed to parse printer config: {}", e)))
    }

    /// Load configuration from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let text = tokio::fs::read_to_string(path).await?;
        Self::from_json(&text)
    }

    /// Resolve the raw values into print settings.
    ///
    /// # Arguments
    /// * `papers` - Table used to resolve `PAPER_SIZE`
    pub fn settings(&self, papers: &PaperTable) -> PrintSettings {
        let printer = self
            .default_printer
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_PRINTER_NAME)
            .to_string();

        let paper = self
            .paper_size
            .as_deref()
            .and_then(|name| lookup_or_warn("PAPER_SIZE", name, |n| papers.get(n)))
            .unwrap_or_default();

        PrintSettings {
            printer,
            paper,
            quality: parse_or_default("PRINT_QUALITY", self.print_quality.as_deref()),
            color_mode: parse_or_default("COLOR_MODE", self.color_mode.as_deref()),
            duplex: parse_or_default("DUPLEX", self.duplex.as_deref()),
        }
    }
}

fn parse_or_default<T: FromStr + Default>(key: &str, value: Option<&str>) -> T {
    value
        .and_then(|v| lookup_or_warn(key, v, |v| v.parse().ok()))
        .unwrap_or_default()
}

fn lookup_or_warn<T>(key: &str, value: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
    let parsed = parse(value.trim());
    if parsed.is_none() {
        log::warn!("Ignoring unrecognised {} value {:?}", key, value);
    }
    parsed
}

// =============================================================================
// Resolved Settings
// =============================================================================

/// Settings handed to the print transport with a finished document
#[derive(Debug, Clone, PartialEq)]
pub struct PrintSettings {
    pub printer: String,
    pub paper: PaperFormat,
    pub quality: Quality,
    pub color_mode: ColorMode,
    pub duplex: DuplexMode,
}

impl Default for PrintSettings {
    fn default() -> Self {
        PrinterConfig::default().settings(PaperTable::standard())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    Draft,
    #[default]
    Normal,
    High,
}

impl FromStr for Quality {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(Quality::Draft),
            "normal" => Ok(Quality::Normal),
            "high" => Ok(Quality::High),
            _ => Err(ComposeError::Config(format!("Unknown print quality: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Color,
    Grayscale,
    Monochrome,
}

impl FromStr for ColorMode {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "color" => Ok(ColorMode::Color),
            "grayscale" => Ok(ColorMode::Grayscale),
            "monochrome" => Ok(ColorMode::Monochrome),
            _ => Err(ComposeError::Config(format!("Unknown color mode: {s}"))),
        }
    }
}

/// Sidedness of the printed job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplexMode {
    #[default]
    OneSided,
    /// Two-sided, flipped on the short edge
    TwoSidedHorizontal,
    /// Two-sided, flipped on the long edge
    TwoSidedVertical,
}

impl DuplexMode {
    /// Flag passed on to the print command; one-sided jobs pass none
    pub fn transport_flag(self) -> Option<&'static str> {
        match self {
            DuplexMode::OneSided => None,
            DuplexMode::TwoSidedHorizontal => Some("duplex-horizontal"),
            DuplexMode::TwoSidedVertical => Some("duplex-vertical"),
        }
    }
}

impl FromStr for DuplexMode {
    type Err = ComposeError;

    /// Accepts the English names and the German ones older config files use
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "one-sided" | "einseitig" => Ok(DuplexMode::OneSided),
            "two-sided-horizontal" | "zweiseitig-horizontal" | "duplex-horizontal" => {
                Ok(DuplexMode::TwoSidedHorizontal)
            }
            "two-sided-vertical" | "zweiseitig-vertikal" | "duplex-vertical" => {
                Ok(DuplexMode::TwoSidedVertical)
            }
            _ => Err(ComposeError::Config(format!("Unknown duplex mode: {s}"))),
        }
    }
}

// =============================================================================
// Transport
// =============================================================================

/// Destination for finished print jobs (a print daemon, a spool directory).
///
/// The engine only produces bytes; dispatch, including any duplex
/// handling, belongs to the transport.
pub trait PrintTransport {
    /// Hand over one finished document. Returns a reference to the
    /// submitted job for logging.
    fn submit(
        &self,
        document: Vec<u8>,
        settings: &PrintSettings,
    ) -> impl Future<Output = Result<String>> + Send;
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let settings = PrinterConfig::from_json("{}")
            .unwrap()
            .settings(PaperTable::standard());

        assert_eq!(settings.printer, "default");
        assert_eq!(settings.paper, PaperFormat::A4);
        assert_eq!(settings.quality, Quality::Normal);
        assert_eq!(settings.color_mode, ColorMode::Color);
        assert_eq!(settings.duplex, DuplexMode::OneSided);
        assert_eq!(settings, PrintSettings::default());
    }

    #[test]
    fn test_full_config() {
        let config = PrinterConfig::from_json(
            r#"{
                "DEFAULT_PRINTER": "Office-Laser",
                "PRINT_QUALITY": "high",
                "PAPER_SIZE": "Letter",
                "COLOR_MODE": "monochrome",
                "DUPLEX": "zweiseitig-vertikal"
            }"#,
        )
        .unwrap();
        let settings = config.settings(PaperTable::standard());

        assert_eq!(settings.printer, "Office-Laser");
        assert_eq!(settings.paper, PaperFormat::LETTER);
        assert_eq!(settings.quality, Quality::High);
        assert_eq!(settings.color_mode, ColorMode::Monochrome);
        assert_eq!(settings.duplex.transport_flag(), Some("duplex-vertical"));
    }

    #[test]
    fn test_invalid_values_fall_back_per_key() {
        let config = PrinterConfig::from_json(
            r#"{ "PRINT_QUALITY": "ultra", "PAPER_SIZE": "B5", "COLOR_MODE": "grayscale" }"#,
        )
        .unwrap();
        let settings = config.settings(PaperTable::standard());

        assert_eq!(settings.quality, Quality::Normal);
        assert_eq!(settings.paper, PaperFormat::A4);
        assert_eq!(settings.color_mode, ColorMode::Grayscale);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        assert!(matches!(
            PrinterConfig::from_json("not json"),
            Err(ComposeError::Config(_))
        ));
    }
}
