use chrono::Local;
use pdf_compose::{PrintSettings, PrintTransport, Result};
use std::path::PathBuf;

/// Print transport that drops finished jobs into a spool directory for an
/// external print daemon to pick up
pub struct SpoolTransport {
    dir: PathBuf,
}

impl SpoolTransport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn job_path(&self, printer: &str) -> PathBuf {
        let printer: String = printer
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        let stamp = Local::now().format("%Y%m%d-%H%M%S%.3f");
        self.dir.join(format!("{stamp}-{printer}.pdf"))
    }
}

impl PrintTransport for SpoolTransport {
    async fn submit(&self, document: Vec<u8>, settings: &PrintSettings) -> Result<String> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.job_path(&settings.printer);
        tokio::fs::write(&path, &document).await?;

        log::info!(
            "Spooled {} bytes for printer '{}' (paper {}, {:?}, {:?}, duplex: {})",
            document.len(),
            settings.printer,
            settings.paper.name,
            settings.quality,
            settings.color_mode,
            settings.duplex.transport_flag().unwrap_or("none"),
        );

        Ok(path.display().to_string())
    }
}
