//! Pipeline driver - SVG file in, STL file out.
//!
//! 1. Parse the document and pick a scale from its declared width unit.
//! 2. Emit the solid description.
//! 3. Write it to a temporary `.scad` file and run OpenSCAD on it.
//!
//! Steps 1 and 2 are pure ([`describe`]); only [`Renderer::render`]
//! touches the filesystem or spawns a process.

use std::fs;
use std::io::Write;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};
use crate::scad::{SolidDescription, emit};
use crate::svg::Document;
use crate::units::{DEFAULT_DPI, ScaleFactor, scale};

/// Curve samples per cubic segment when the caller doesn't pick one.
pub const DEFAULT_CURVE_STEPS: NonZeroU32 = match NonZeroU32::new(10) {
    Some(n) => n,
    None => unreachable!(),
};

/// Renderer executable looked up on `PATH` by default.
pub const DEFAULT_RENDERER: &str = "openscad";

/// Configuration for a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Pixels per inch, used when the document isn't in millimeters.
    pub dpi: u32,
    /// Line segments per cubic curve. Higher = smoother curves.
    pub curve_steps: NonZeroU32,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            curve_steps: DEFAULT_CURVE_STEPS,
        }
    }
}

impl ConvertOptions {
    pub fn validate(&self) -> Result<()> {
        if self.dpi == 0 {
            return Err(Error::InvalidOption("dpi must be greater than zero".to_string()));
        }
        Ok(())
    }
}

/// Everything produced for one document before rendering.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub document: Document,
    pub scale: ScaleFactor,
    pub description: SolidDescription,
}

/// Parse SVG source and build its solid description.
pub fn describe(svg: &str, options: &ConvertOptions) -> Result<Conversion> {
    options.validate()?;
    let document = Document::parse(svg)?;
    let scale = scale(document.unit, options.dpi);
    let description = emit(&document.entities, scale, options.curve_steps)?;
    Ok(Conversion {
        document,
        scale,
        description,
    })
}

/// Read an SVG file to a string.
pub fn read_svg(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// `drawing.svg` -> `drawing.stl`.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("stl")
}

/// External OpenSCAD process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renderer {
    pub program: PathBuf,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_RENDERER)
    }
}

impl Renderer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Render `description` to a mesh at `output`.
    ///
    /// Blocks until the renderer exits. The temporary `.scad` file is
    /// removed afterwards whatever the outcome.
    pub fn render(&self, description: &SolidDescription, output: &Path) -> Result<()> {
        let mut file = tempfile::Builder::new()
            .prefix("svg2stl-")
            .suffix(".scad")
            .tempfile()
            .map_err(|source| Error::Io {
                path: std::env::temp_dir(),
                source,
            })?;
        file.write_all(description.to_string().as_bytes())
            .and_then(|()| file.flush())
            .map_err(|source| Error::Io {
                path: file.path().to_path_buf(),
                source,
            })?;

        let result = Command::new(&self.program)
            .arg("-o")
            .arg(output)
            .arg(file.path())
            .output()
            .map_err(|source| Error::RendererLaunch {
                program: self.program.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(Error::RendererFailed {
                program: self.program.clone(),
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Convert an SVG file and render it to `output`.
pub fn convert_file(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
    renderer: &Renderer,
) -> Result<Conversion> {
    let svg = read_svg(input)?;
    let conversion = describe(&svg, options)?;
    renderer.render(&conversion.description, output)?;
    Ok(conversion)
}

// ============================================================================
// TESTS
// ============================================================================
