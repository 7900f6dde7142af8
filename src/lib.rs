//! PDF Resize Library
//!
//! Batch resizing of PDF pages to A-series paper formats.
//! This library provides functionality to:
//! - Convert paper formats (A2–A5) to page sizes in points
//! - Compute per-axis scale factors between page sizes
//! - Scan a directory for documents and order them
//! - Rewrite each page's media box, optionally scaling its content
//! - Run a partial-failure-tolerant batch over a file or directory
//!
//! # Example
//!
//! ```no_run
//! use pdf_resize::layout::PaperFormat;
//! use pdf_resize::pipeline::{run, RunConfig};
//!
//! let config = RunConfig::new("to_convert", "converted", PaperFormat::A4);
//! let report = run(&config, &mut |_| {}).expect("Invalid configuration");
//!
//! for outcome in report.failed() {
//!     eprintln!("{} failed", outcome.name);
//! }
//! ```

pub mod error;
pub mod layout;
pub mod logging;
pub mod pdf;
pub mod pipeline;
pub mod scan;

// Re-export commonly used items
pub use error::{Error, Result};
