//! Error types for the PDF resize library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the PDF resize library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Paper format not in the format table
    #[error("Unsupported paper format: {0} (expected one of A2, A3, A4, A5)")]
    UnsupportedFormat(String),

    /// Input is neither a file nor a directory
    #[error("Invalid input path: {}", .0.display())]
    InvalidInputPath(PathBuf),

    /// File extension does not match the document type
    #[error("Not a supported document: {}", .0.display())]
    UnsupportedFileType(PathBuf),

    /// Page geometry that cannot be scaled
    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),

    /// Broken page tree or catalog structure
    #[error("Malformed PDF: {0}")]
    MalformedPdf(String),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),
}

impl Error {
    /// Configuration-level errors end the whole run; everything else is
    /// scoped to the file being processed.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedFormat(_) | Error::InvalidInputPath(_) | Error::UnsupportedFileType(_)
        )
    }
}
