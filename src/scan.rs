//! Directory scanning: list documents, attach timestamps, order the result

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use glob::{glob_with, MatchOptions, Pattern};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Document types the scanner accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentType {
    #[default]
    Pdf,
}

impl DocumentType {
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentType::Pdf => "pdf",
        }
    }

    /// Extension check only; the file content is never inspected
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase() == self.extension())
            .unwrap_or(false)
    }
}

/// Ordering applied to scan results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    CreationDate,
    LastModificationDate,
    /// Keep the listing order as-is
    Unsorted,
}

impl SortKey {
    /// Parse an order key. Unknown keys fall back to `Unsorted`.
    pub fn parse(key: &str) -> Self {
        match key.trim() {
            "name" => SortKey::Name,
            "creation_date" => SortKey::CreationDate,
            "last_modification_date" => SortKey::LastModificationDate,
            other => {
                warn!("Unknown order key '{}', keeping listing order", other);
                SortKey::Unsorted
            }
        }
    }
}

/// Where file timestamps are read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetadataSource {
    /// The scanned file itself
    #[default]
    Source,
    /// The same-named file in the output directory, from a previous run
    Output,
}

/// Options for scanning a directory
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub document_type: DocumentType,
    pub sort_key: SortKey,
    pub metadata_source: MetadataSource,
}

/// A document found by the scanner
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub created_at: Option<DateTime<Local>>,
    pub modified_at: Option<DateTime<Local>>,
}

impl FileEntry {
    /// Build an entry, reading timestamps from `metadata_path`.
    ///
    /// Timestamps the platform cannot provide (or a missing file) are `None`.
    pub fn new(path: PathBuf, metadata_path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (created_at, modified_at) = match fs::metadata(metadata_path) {
            Ok(meta) => (
                meta.created().ok().map(to_local),
                meta.modified().ok().map(to_local),
            ),
            Err(_) => (None, None),
        };

        Self {
            name,
            path,
            created_at,
            modified_at,
        }
    }
}

fn to_local(time: SystemTime) -> DateTime<Local> {
    DateTime::<Local>::from(time)
}

/// List the documents in `input_dir`, ordered by `options.sort_key`
pub fn scan_directory(
    input_dir: &Path,
    output_dir: &Path,
    options: &ScanOptions,
) -> Result<Vec<FileEntry>> {
    if !input_dir.is_dir() {
        return Err(Error::InvalidInputPath(input_dir.to_path_buf()));
    }

    let pattern = format!(
        "{}/*.{}",
        Pattern::escape(&input_dir.to_string_lossy()),
        options.document_type.extension()
    );
    let match_options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let paths = glob_with(&pattern, match_options)
        .map_err(|e| Error::InvalidGlob(format!("{}: {}", pattern, e)))?;

    let mut entries = Vec::new();
    for entry in paths {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !path.is_file() || !options.document_type.matches(&path) {
            continue;
        }

        let metadata_path = match options.metadata_source {
            MetadataSource::Source => path.clone(),
            MetadataSource::Output => match path.file_name() {
                Some(name) => output_dir.join(name),
                None => continue,
            },
        };

        entries.push(FileEntry::new(path, &metadata_path));
    }

    debug!("Found {} documents in {}", entries.len(), input_dir.display());

    sort_entries(&mut entries, options.sort_key);
    Ok(entries)
}

/// Order entries in place. Missing timestamps sort first.
pub fn sort_entries(entries: &mut [FileEntry], key: SortKey) {
    match key {
        SortKey::Name => entries.sort_by(|a, b| a.name.cmp(&b.name)),
        SortKey::CreationDate => entries.sort_by_key(|e| e.created_at),
        SortKey::LastModificationDate => entries.sort_by_key(|e| e.modified_at),
        SortKey::Unsorted => {}
    }
}

fn format_timestamp(time: Option<DateTime<Local>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Render scan results as a fixed-width table
pub fn format_table(entries: &[FileEntry]) -> String {
    let rows: Vec<[String; 4]> = entries
        .iter()
        .map(|e| {
            [
                e.name.clone(),
                e.path.display().to_string(),
                format_timestamp(e.created_at),
                format_timestamp(e.modified_at),
            ]
        })
        .collect();

    let headers = ["Name", "Path", "Created", "Modified"];
    let mut widths = headers.map(|h| h.len());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let line = |out: &mut String, cells: [&str; 4]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
    };

    line(&mut out, headers);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in &rows {
        line(&mut out, [&row[0], &row[1], &row[2], &row[3]]);
    }

    out
}
