//! PDF Resize CLI tool
//!
//! A command-line tool for resizing PDF pages to A-series paper formats.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use pdf_resize::layout::{Length, PaperFormat};
use pdf_resize::logging::init_cli_logger;
use pdf_resize::pdf::{count_pages, page_sizes};
use pdf_resize::pipeline::{run, RunConfig};
use pdf_resize::scan::{MetadataSource, SortKey};

/// PDF Resize - Resize PDF pages to A2, A3, A4 or A5
#[derive(Parser)]
#[command(name = "pdf-resize")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Resize one file to A4
    pdf-resize resize essay.pdf -o converted

    # Resize a whole directory to A3, oldest files first
    pdf-resize resize to_convert -o converted --format A3 --order-by creation_date

    # Keep proportions and centre each page on A4
    pdf-resize resize to_convert -o converted --fit

    # Only change the page size, leave content unscaled
    pdf-resize resize to_convert -o converted --no-scale")]
struct Cli {
    /// Show per-page details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resize a PDF file or every PDF in a directory
    Resize {
        /// Input PDF file or directory
        input: PathBuf,

        /// Output directory (created if missing)
        #[arg(short, long)]
        output: PathBuf,

        /// Target paper format: A2, A3, A4 or A5
        #[arg(short, long, default_value = "A4")]
        format: String,

        /// Processing order: name, creation_date or last_modification_date
        /// (any other value keeps the directory listing order)
        #[arg(long, default_value = "name")]
        order_by: String,

        /// Read file timestamps from the previous output instead of the source
        #[arg(long, value_enum, default_value_t = MetadataFrom::Source)]
        metadata_from: MetadataFrom,

        /// Only set the page size; do not scale page content
        #[arg(long, conflicts_with = "fit")]
        no_scale: bool,

        /// Scale both axes by the same factor and centre the content
        #[arg(long)]
        fit: bool,
    },

    /// List supported paper formats
    Formats,

    /// Show page sizes of a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum MetadataFrom {
    Source,
    Output,
}

impl From<MetadataFrom> for MetadataSource {
    fn from(value: MetadataFrom) -> Self {
        match value {
            MetadataFrom::Source => MetadataSource::Source,
            MetadataFrom::Output => MetadataSource::Output,
        }
    }
}

/// How page content follows the new page size
#[derive(Clone, Copy)]
enum Scaling {
    Stretch,
    Fit,
    Off,
}

fn main() {
    let cli = Cli::parse();
    init_cli_logger(cli.verbose);

    let result = match cli.command {
        Commands::Resize {
            input,
            output,
            format,
            order_by,
            metadata_from,
            no_scale,
            fit,
        } => {
            let scaling = if no_scale {
                Scaling::Off
            } else if fit {
                Scaling::Fit
            } else {
                Scaling::Stretch
            };
            cmd_resize(input, output, &format, &order_by, metadata_from, scaling)
        }
        Commands::Formats => {
            cmd_formats();
            Ok(true)
        }
        Commands::Info { input } => cmd_info(input).map(|_| true),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Resize documents; returns whether every file succeeded
fn cmd_resize(
    input: PathBuf,
    output: PathBuf,
    format: &str,
    order_by: &str,
    metadata_from: MetadataFrom,
    scaling: Scaling,
) -> Result<bool> {
    let format: PaperFormat = format.parse()?;

    let config = RunConfig {
        sort_key: SortKey::parse(order_by),
        metadata_source: metadata_from.into(),
        scale_content: !matches!(scaling, Scaling::Off),
        fit: matches!(scaling, Scaling::Fit),
        ..RunConfig::new(input, output, format)
    };

    let result = run(&config, &mut |progress| {
        eprintln!("[{}/{}] {}", progress.index, progress.total, progress.name);
    });

    let report = match result {
        Ok(report) => report,
        // Bad input path or file type: nothing was processed
        Err(e) if e.is_fatal() => {
            eprintln!("{}", e);
            return Ok(false);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Cannot resize {}", config.input.display()))
        }
    };

    if report.is_empty() {
        eprintln!("No documents found in {}", config.input.display());
        return Ok(true);
    }

    for outcome in report.outcomes() {
        match &outcome.result {
            Ok(resized) => println!(
                "ok      {} ({} pages) -> {}",
                outcome.name,
                resized.page_count,
                outcome.destination.display()
            ),
            Err(e) => println!("failed  {}: {}", outcome.name, e),
        }
    }

    let failed = report.failed().count();
    eprintln!(
        "{} resized to {}, {} failed",
        report.len() - failed,
        format,
        failed
    );

    Ok(report.is_success())
}

fn cmd_formats() {
    for format in PaperFormat::ALL {
        let (width_mm, height_mm) = format.dimensions_mm();
        let target = format.target_dimensions();
        println!(
            "{}  {:>4} x {:>4} mm  {:>5} x {:>5} pt",
            format, width_mm, height_mm, target.width_pt, target.height_pt
        );
    }
}

/// Show information about a PDF
fn cmd_info(input: PathBuf) -> Result<()> {
    let page_count = count_pages(&input)
        .with_context(|| format!("Cannot read {}", input.display()))?;
    let sizes = page_sizes(&input)?;

    println!("File: {}", input.display());
    println!("Pages: {}", page_count);

    for (i, (width, height)) in sizes.iter().enumerate() {
        let format = PaperFormat::detect(*width, *height)
            .map(|f| f.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:>3}: {:.1} x {:.1} pt ({:.0} x {:.0} mm) {}",
            i + 1,
            width,
            height,
            Length::from_pt(*width).mm(),
            Length::from_pt(*height).mm(),
            format
        );
    }

    Ok(())
}
