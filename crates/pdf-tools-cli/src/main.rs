mod job;
mod logger;
mod spool;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pdf_async_runtime::combine_concurrently;
use pdf_compose::{
    AdjustmentSettings, AdjustmentSpec, FillMode, OutputDocument, PageRangeMode, PaperFormat,
    PaperTable, PrintSettings, PrintTransport, PrinterConfig, Rotation, Scale, SourceContent,
    assemble, calculate_statistics, compose_document, load_source, raster_to_document, save_pdf,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pdfprint", about = "Prepare documents for printing", version)]
struct Cli {
    /// More log output on stderr (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply adjustments to one document and write every copy
    Compose {
        /// Input PDF or image
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        adjustments: AdjustmentArgs,

        /// Paper size for image input
        #[arg(long, default_value = "A4")]
        paper: String,
    },

    /// Combine the documents of a job file into one print-ready PDF
    Combine {
        /// Job file listing documents and their adjustments
        #[arg(short, long)]
        job: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Printer configuration file (supplies the paper size)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Paper size; overrides the printer configuration
        #[arg(long)]
        paper: Option<String>,
    },

    /// Show what composing a document would produce
    Stats {
        /// Input PDF or image
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        adjustments: AdjustmentArgs,
    },

    /// Convert one image into a single-page PDF
    Raster {
        /// Input image (PNG, JPEG, GIF, BMP, WebP)
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Clockwise rotation in degrees (0, 90, 180, 270)
        #[arg(long, default_value = "0")]
        rotation: i32,

        /// Resolution scale in percent (10-200)
        #[arg(long, default_value = "100")]
        scale: f32,

        #[arg(long, default_value = "A4")]
        paper: String,
    },

    /// Combine a job file and hand the result to the spool directory
    Print {
        /// Job file listing documents and their adjustments
        #[arg(short, long)]
        job: PathBuf,

        /// Directory the print daemon picks jobs up from
        #[arg(long)]
        spool_dir: PathBuf,

        /// Printer configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Paper size; overrides the printer configuration
        #[arg(long)]
        paper: Option<String>,
    },
}

#[derive(Args)]
struct AdjustmentArgs {
    /// Start from adjustments saved in a JSON file; flags override it
    #[arg(long)]
    adjustments: Option<PathBuf>,

    /// Scale in percent (10-200)
    #[arg(long)]
    scale: Option<f32>,

    /// Clockwise rotation in degrees (0, 90, 180, 270)
    #[arg(long)]
    rotation: Option<i32>,

    #[arg(long)]
    copies: Option<i64>,

    /// Pages to print, e.g. "1,3,5-7"
    #[arg(long)]
    pages: Option<String>,

    /// Grid columns per sheet
    #[arg(long)]
    columns: Option<i64>,

    /// Grid rows per sheet
    #[arg(long)]
    rows: Option<i64>,

    #[arg(long, value_enum)]
    fill: Option<FillArg>,

    /// Leave grid position N blank (1-based, row by row); repeatable
    #[arg(long = "disable-cell")]
    disable_cells: Vec<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FillArg {
    /// Consecutive pages fill the grid
    Sequential,
    /// Each page fills a whole sheet
    Replicate,
}

impl From<FillArg> for FillMode {
    fn from(arg: FillArg) -> Self {
        match arg {
            FillArg::Sequential => Self::Sequential,
            FillArg::Replicate => Self::Replicate,
        }
    }
}

impl AdjustmentArgs {
    async fn resolve(self) -> Result<AdjustmentSpec> {
        let mut settings = match &self.adjustments {
            Some(path) => AdjustmentSettings::from(AdjustmentSpec::load(path).await?),
            None => AdjustmentSettings::default(),
        };

        if let Some(scale) = self.scale {
            settings.scale = scale;
        }
        if let Some(rotation) = self.rotation {
            settings.rotation = rotation;
        }
        if let Some(copies) = self.copies {
            settings.copies = copies;
        }
        if let Some(pages) = self.pages {
            settings.page_range = PageRangeMode::Specific;
            settings.page_numbers = pages;
        }
        if let Some(columns) = self.columns {
            settings.layout_columns = columns;
        }
        if let Some(rows) = self.rows {
            settings.layout_rows = rows;
        }
        if let Some(fill) = self.fill {
            settings.page_mode = fill.into();
        }

        let mut spec = AdjustmentSpec::try_from(settings)?;
        if !self.disable_cells.is_empty() {
            let cells = spec.layout.cell_count();
            if spec.enabled_cells.len() != cells {
                spec.enabled_cells = vec![true; cells];
            }
            for &cell in &self.disable_cells {
                if cell == 0 || cell > cells {
                    bail!("Grid position {} is outside the {}-cell grid", cell, cells);
                }
                spec.enabled_cells[cell - 1] = false;
            }
        }

        Ok(spec)
    }
}

fn resolve_paper(name: &str) -> Result<PaperFormat> {
    let papers = PaperTable::standard();
    papers.get(name).ok_or_else(|| {
        let known: Vec<&str> = papers.names().collect();
        anyhow!("Unknown paper size '{}' (known: {})", name, known.join(", "))
    })
}

async fn print_settings(config: Option<&Path>, paper: Option<&str>) -> Result<PrintSettings> {
    let mut settings = match config {
        Some(path) => PrinterConfig::load(path)
            .await
            .with_context(|| format!("Failed to load printer config {}", path.display()))?
            .settings(PaperTable::standard()),
        None => PrintSettings::default(),
    };
    if let Some(name) = paper {
        settings.paper = resolve_paper(name)?;
    }
    Ok(settings)
}

/// Combine a job file, printing one line per document
async fn combine_job(job_path: &Path, paper: PaperFormat) -> Result<OutputDocument> {
    let batch = job::load_batch(job_path).await?;
    let (output, outcomes) = combine_concurrently(batch.jobs, paper).await?;

    println!("Documents:");
    for outcome in job::merge_outcomes(outcomes, batch.failures) {
        println!("{}", job::describe(&outcome));
    }
    Ok(output)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::CliLogger::new(cli.verbose).init()?;

    match cli.command {
        Commands::Compose {
            input,
            output,
            adjustments,
            paper,
        } => {
            let adjustments = adjustments.resolve().await?;
            let paper = resolve_paper(&paper)?;
            let document = load_source(&input).await?;
            let id = document.id().clone();

            let copies = tokio::task::spawn_blocking(move || {
                compose_document(&document, &adjustments, paper)
            })
            .await??;
            let (composed, _) = assemble([(id, Ok(copies))]);

            let page_count = composed.page_count();
            save_pdf(composed, &output).await?;
            println!("Composed {} pages → {}", page_count, output.display());
        }

        Commands::Combine {
            job,
            output,
            config,
            paper,
        } => {
            let settings = print_settings(config.as_deref(), paper.as_deref()).await?;
            let combined = combine_job(&job, settings.paper).await?;
            if combined.page_count() == 0 {
                bail!("Nothing to write: no document produced any pages");
            }

            let page_count = combined.page_count();
            save_pdf(combined, &output).await?;
            println!("Combined {} pages → {}", page_count, output.display());
        }

        Commands::Stats { input, adjustments } => {
            let adjustments = adjustments.resolve().await?;
            let document = load_source(&input).await?;
            let stats = calculate_statistics(&document, &adjustments)?;

            println!("Composition Statistics:");
            println!("  Source pages: {}", stats.source_pages);
            println!("  Selected pages: {}", stats.selected_pages);
            println!("  Sheets per copy: {}", stats.sheets_per_copy);
            println!("  Copies: {}", stats.copies);
            println!("  Output pages: {}", stats.output_pages);
            println!("  Blank cells per copy: {}", stats.blank_cells);
        }

        Commands::Raster {
            input,
            output,
            rotation,
            scale,
            paper,
        } => {
            let rotation = Rotation::try_from(rotation)?;
            let scale = Scale::new(scale)?;
            let paper = resolve_paper(&paper)?;
            let bytes = tokio::fs::read(&input)
                .await
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let id = input.display().to_string();

            let source = tokio::task::spawn_blocking(move || {
                raster_to_document(id, &bytes, rotation, scale, paper)
            })
            .await??;
            let SourceContent::Pages(document) = source.content() else {
                bail!("Image conversion did not produce a page document");
            };

            let mut document = document.clone();
            let target = output.clone();
            tokio::task::spawn_blocking(move || document.save(&target)).await??;
            println!("Converted {} → {}", input.display(), output.display());
        }

        Commands::Print {
            job,
            spool_dir,
            config,
            paper,
        } => {
            let settings = print_settings(config.as_deref(), paper.as_deref()).await?;
            let combined = combine_job(&job, settings.paper).await?;
            if combined.page_count() == 0 {
                bail!("Nothing to print: no document produced any pages");
            }

            let page_count = combined.page_count();
            let bytes = tokio::task::spawn_blocking(move || combined.to_bytes()).await??;
            let transport = spool::SpoolTransport::new(spool_dir);
            let reference = transport.submit(bytes, &settings).await?;
            println!(
                "Sent {} pages to '{}' → {}",
                page_count, settings.printer, reference
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> AdjustmentArgs {
        AdjustmentArgs {
            adjustments: None,
            scale: None,
            rotation: None,
            copies: None,
            pages: None,
            columns: None,
            rows: None,
            fill: None,
            disable_cells: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_disable_cells_on_grid() {
        let spec = AdjustmentArgs {
            columns: Some(2),
            rows: Some(2),
            disable_cells: vec![3],
            ..args()
        }
        .resolve()
        .await
        .unwrap();
        assert_eq!(spec.enabled_cells, vec![true, true, false, true]);

        let outside = AdjustmentArgs {
            columns: Some(2),
            disable_cells: vec![3],
            ..args()
        };
        assert!(outside.resolve().await.is_err());
    }

    #[tokio::test]
    async fn test_oversized_grid_flags_rejected() {
        let huge = AdjustmentArgs {
            columns: Some(i64::MAX),
            rows: Some(i64::MAX),
            disable_cells: vec![1],
            ..args()
        };
        assert!(huge.resolve().await.is_err());
    }
}
