//! Card recognition for iBridgeBaron screenshots.
//!
//! A screenshot is cut into 52 card regions at fixed coordinates. Each
//! region is split into a rank glyph and a suit glyph, binarized, and
//! compared by RMSE against glyphs cut from two reference screenshots whose
//! contents are known. The result is a notation string, a confidence margin
//! and a list of consistency problems for a human to look at.

mod bitmap;
mod check;
mod layout;
mod library;
mod recognize;

pub use bitmap::{binarize, binary_diff, rmse, to_image, Bitmap};
pub use check::{check, matches_to_notation, ConsistencyError};
pub use layout::{HandBoxes, Layout, PixelBox, Position};
pub use library::{ReferenceLibrary, BLACK_TEMPLATE_SUITS, RED_TEMPLATE_SUITS};
pub use recognize::{CardMatch, MatchStats, Recognition, Recognizer};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Size { width, height }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Error)]
pub enum RecognizeError {
    #[error("invalid {what}: expected {expected}, got {actual}")]
    Dimension {
        what: &'static str,
        expected: Size,
        actual: Size,
    },
    #[error("failed to read image: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid layout: {0}")]
    Layout(String),
    #[error("failed to load layout from {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}
