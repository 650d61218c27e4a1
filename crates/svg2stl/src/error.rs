//! Crate-level error type.
//!
//! Nothing is retried or recovered locally: the first error ends the
//! conversion of the current document.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::contour::UnsupportedSegmentError;
use crate::svg::SvgError;

#[derive(Debug, Error)]
pub enum Error {
    /// The document couldn't be read as SVG.
    #[error(transparent)]
    Svg(#[from] SvgError),

    /// A path used a command other than line, cubic curve, or close.
    #[error(transparent)]
    UnsupportedSegment(#[from] UnsupportedSegmentError),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch renderer `{}`: {source}", .program.display())]
    RendererLaunch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("renderer `{}` exited with {status}: {stderr}", .program.display())]
    RendererFailed {
        program: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
