//! Run driver: dispatch a file or a directory to the resize engine

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::layout::PaperFormat;
use crate::pdf::{resize_one, ResizeOptions, ResizedDocument};
use crate::scan::{format_table, scan_directory, DocumentType, MetadataSource, ScanOptions, SortKey};

/// Everything a run needs, validated before any file is touched
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// A single document or a directory of documents
    pub input: PathBuf,
    /// Directory results are written to, created if absent
    pub output_dir: PathBuf,
    pub format: PaperFormat,
    pub sort_key: SortKey,
    pub metadata_source: MetadataSource,
    pub scale_content: bool,
    /// Keep page proportions and centre the content instead of stretching
    pub fit: bool,
}

impl RunConfig {
    pub fn new(
        input: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        format: PaperFormat,
    ) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            format,
            sort_key: SortKey::Name,
            metadata_source: MetadataSource::Source,
            scale_content: true,
            fit: false,
        }
    }
}

/// Progress notification emitted before each file of a batch
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// 1-based position in the batch
    pub index: usize,
    pub total: usize,
    pub name: String,
}

/// One file's work: where it comes from and where it goes
#[derive(Debug, Clone)]
struct FileJob {
    name: String,
    source: PathBuf,
    destination: PathBuf,
}

impl FileJob {
    fn new(source: &Path, output_dir: &Path) -> Self {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            destination: output_dir.join(&name),
            source: source.to_path_buf(),
            name,
        }
    }
}

/// Outcome of one file
#[derive(Debug)]
pub struct FileOutcome {
    pub name: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub result: Result<ResizedDocument>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-file outcomes of a run, in processing order
#[derive(Debug, Default)]
pub struct RunReport {
    outcomes: Vec<FileOutcome>,
}

impl RunReport {
    fn record(&mut self, outcome: FileOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// True when nothing failed (an empty run counts as success)
    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Run the resize over `config.input`.
///
/// Configuration errors (invalid input path, unsupported single file) are
/// returned as `Err`. Failures of individual files are recorded in the
/// report and never stop the batch.
pub fn run(config: &RunConfig, on_progress: &mut dyn FnMut(Progress)) -> Result<RunReport> {
    let options = ResizeOptions {
        target: config.format.target_dimensions(),
        scale_content: config.scale_content,
        fit: config.fit,
    };
    let document_type = DocumentType::Pdf;
    let mut report = RunReport::default();

    if config.input.is_file() {
        if !document_type.matches(&config.input) {
            warn!("The file ({}) is not a supported document", config.input.display());
            return Err(Error::UnsupportedFileType(config.input.clone()));
        }

        fs::create_dir_all(&config.output_dir)?;
        let job = FileJob::new(&config.input, &config.output_dir);
        report.record(process(job, &options));
        return Ok(report);
    }

    if !config.input.is_dir() {
        return Err(Error::InvalidInputPath(config.input.clone()));
    }

    let scan_options = ScanOptions {
        document_type,
        sort_key: config.sort_key,
        metadata_source: config.metadata_source,
    };
    let entries = scan_directory(&config.input, &config.output_dir, &scan_options)?;
    fs::create_dir_all(&config.output_dir)?;

    if entries.is_empty() {
        warn!("No documents found in {}", config.input.display());
        return Ok(report);
    }

    info!("Scan result:\n{}", format_table(&entries));

    if entries.len() == 1 {
        let job = FileJob::new(&entries[0].path, &config.output_dir);
        report.record(process(job, &options));
        return Ok(report);
    }

    let total = entries.len();
    for (i, entry) in entries.iter().enumerate() {
        on_progress(Progress {
            index: i + 1,
            total,
            name: entry.name.clone(),
        });
        let job = FileJob::new(&entry.path, &config.output_dir);
        report.record(process(job, &options));
    }

    info!(
        "Resized {} of {} documents to {}",
        report.succeeded().count(),
        total,
        config.format
    );

    Ok(report)
}

fn process(job: FileJob, options: &ResizeOptions) -> FileOutcome {
    info!("Resizing {}", job.name);

    let result = resize_one(&job.source, &job.destination, options);
    match &result {
        Ok(resized) => info!(
            "The PDF file ({}) has been resized ({} pages)",
            job.name, resized.page_count
        ),
        Err(e) => error!("Failed to resize {}: {}", job.name, e),
    }

    FileOutcome {
        name: job.name,
        source: job.source,
        destination: job.destination,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_config_defaults() {
        let config = RunConfig::new("in", "out", PaperFormat::A4);
        assert_eq!(config.sort_key, SortKey::Name);
        assert_eq!(config.metadata_source, MetadataSource::Source);
        assert!(config.scale_content);
        assert!(!config.fit);
    }

    #[test]
    fn test_file_job_keeps_filename() {
        let job = FileJob::new(Path::new("docs/report.PDF"), Path::new("converted"));
        assert_eq!(job.name, "report.PDF");
        assert_eq!(job.destination, Path::new("converted").join("report.PDF"));
    }

    #[test]
    fn test_report_partitions_outcomes() {
        let mut report = RunReport::default();
        assert!(report.is_success());

        report.record(FileOutcome {
            name: "a.pdf".to_string(),
            source: PathBuf::from("a.pdf"),
            destination: PathBuf::from("out/a.pdf"),
            result: Ok(ResizedDocument {
                page_count: 1,
                placements: vec![],
            }),
        });
        report.record(FileOutcome {
            name: "b.pdf".to_string(),
            source: PathBuf::from("b.pdf"),
            destination: PathBuf::from("out/b.pdf"),
            result: Err(Error::EmptyPdf(PathBuf::from("b.pdf"))),
        });

        assert_eq!(report.len(), 2);
        assert_eq!(report.succeeded().count(), 1);
        assert_eq!(report.failed().next().unwrap().name, "b.pdf");
        assert!(!report.is_success());
    }

    #[test]
    fn test_invalid_input_path() {
        let config = RunConfig::new("does/not/exist", "out", PaperFormat::A4);
        let result = run(&config, &mut |_| {});
        assert!(matches!(result, Err(Error::InvalidInputPath(_))));
    }
}
