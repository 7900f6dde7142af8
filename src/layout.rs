//! Paper formats, unit conversion and scale calculations

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Millimetres to PDF points
pub const MM_TO_PT: f64 = 2.83464567;

/// Convert millimetres to whole points, rounding half up
pub fn to_points(mm: f64) -> f64 {
    (mm * MM_TO_PT + 0.5).floor()
}

/// Simple length type in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length(pub f64);

impl Length {
    /// Create a length from millimeters
    pub fn from_mm(mm: f64) -> Self {
        Length(mm)
    }

    /// Create a length from points
    pub fn from_pt(pt: f64) -> Self {
        Length(pt / MM_TO_PT)
    }

    /// Get the value in millimeters
    pub fn mm(&self) -> f64 {
        self.0
    }

    /// Get the value in points, unrounded
    pub fn pt(&self) -> f64 {
        self.0 * MM_TO_PT
    }
}

/// Supported target paper formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaperFormat {
    A2,
    A3,
    A4,
    A5,
}

impl PaperFormat {
    pub const ALL: [PaperFormat; 4] = [
        PaperFormat::A2,
        PaperFormat::A3,
        PaperFormat::A4,
        PaperFormat::A5,
    ];

    /// Portrait width and height in millimetres
    pub fn dimensions_mm(&self) -> (f64, f64) {
        match self {
            PaperFormat::A2 => (420.0, 594.0),
            PaperFormat::A3 => (297.0, 420.0),
            PaperFormat::A4 => (210.0, 297.0),
            PaperFormat::A5 => (148.0, 210.0),
        }
    }

    /// Target page size in whole points
    pub fn target_dimensions(&self) -> TargetDimensions {
        let (width, height) = self.dimensions_mm();
        TargetDimensions {
            width_pt: to_points(width),
            height_pt: to_points(height),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PaperFormat::A2 => "A2",
            PaperFormat::A3 => "A3",
            PaperFormat::A4 => "A4",
            PaperFormat::A5 => "A5",
        }
    }

    /// Find the format matching a page size (within 1pt), in either orientation
    pub fn detect(width_pt: f64, height_pt: f64) -> Option<PaperFormat> {
        Self::ALL.into_iter().find(|format| {
            let target = format.target_dimensions();
            let close = |a: f64, b: f64| (a - b).abs() <= 1.0;
            (close(width_pt, target.width_pt) && close(height_pt, target.height_pt))
                || (close(width_pt, target.height_pt) && close(height_pt, target.width_pt))
        })
    }
}

impl FromStr for PaperFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A2" => Ok(PaperFormat::A2),
            "A3" => Ok(PaperFormat::A3),
            "A4" => Ok(PaperFormat::A4),
            "A5" => Ok(PaperFormat::A5),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for PaperFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Page size every output page is forced to, fixed for a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetDimensions {
    pub width_pt: f64,
    pub height_pt: f64,
}

/// Per-axis ratio between a target and an original page size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactor {
    pub x: f64,
    pub y: f64,
}

impl ScaleFactor {
    /// Compute independent horizontal and vertical factors.
    ///
    /// Aspect ratio is not preserved: a page that is not proportional to the
    /// target gets stretched along one axis.
    pub fn between(original: (f64, f64), target: TargetDimensions) -> Result<Self> {
        let (width, height) = original;
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "original page size {}x{} must be positive",
                width, height
            )));
        }

        Ok(Self {
            x: target.width_pt / width,
            y: target.height_pt / height,
        })
    }

    pub fn is_identity(&self) -> bool {
        (self.x - 1.0).abs() < 1e-6 && (self.y - 1.0).abs() < 1e-6
    }

    /// The smaller of the two factors, applied to both axes
    pub fn uniform(&self) -> Self {
        let s = self.x.min(self.y);
        Self { x: s, y: s }
    }
}

/// Where page content lands on the target page: scale, then translate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: ScaleFactor,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Placement {
    /// Stretch each axis independently to fill the target
    pub fn stretch(original: (f64, f64), target: TargetDimensions) -> Result<Self> {
        Ok(Self {
            scale: ScaleFactor::between(original, target)?,
            offset_x: 0.0,
            offset_y: 0.0,
        })
    }

    /// Scale by one factor so the page fits inside the target, centred on it
    pub fn fit(original: (f64, f64), target: TargetDimensions) -> Result<Self> {
        let scale = ScaleFactor::between(original, target)?.uniform();
        Ok(Self {
            scale,
            offset_x: (target.width_pt - original.0 * scale.x) / 2.0,
            offset_y: (target.height_pt - original.1 * scale.y) / 2.0,
        })
    }

    /// Map a point from the original page onto the target page
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.scale.x + self.offset_x, y * self.scale.y + self.offset_y)
    }

    pub fn is_identity(&self) -> bool {
        self.scale.is_identity() && self.offset_x.abs() < 1e-6 && self.offset_y.abs() < 1e-6
    }
}
