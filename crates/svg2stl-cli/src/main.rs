//! svg2stl - turn an SVG drawing into a 3D-printable STL
//!
//! Usage:
//!   svg2stl drawing.svg                      Render drawing.stl with OpenSCAD
//!   svg2stl drawing.svg plate.stl --dpi 72   Pick output and pixel density
//!   svg2stl drawing.svg --emit-scad -        Print the OpenSCAD program only
//!   cat drawing.svg | svg2stl - out.stl      Read SVG from stdin

use std::num::NonZeroU32;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "svg2stl", version)]
#[command(about = "Convert SVG outlines into an extruded STL via OpenSCAD", long_about = None)]
pub struct Cli {
    /// SVG file to process ('-' reads from stdin)
    pub input: PathBuf,

    /// STL file to write. Defaults to the input file name with .stl extension
    pub output: Option<PathBuf>,

    /// The DPI to use when scaling pixel units to millimeters
    #[arg(long, default_value_t = svg2stl::units::DEFAULT_DPI,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub dpi: u32,

    /// Segments per curved path segment. Higher = smoother curves
    #[arg(long, default_value = "10")]
    pub curve_steps: NonZeroU32,

    /// OpenSCAD executable used to render the mesh
    #[arg(long, value_name = "PROGRAM", default_value = svg2stl::pipeline::DEFAULT_RENDERER)]
    pub openscad: PathBuf,

    /// Write the OpenSCAD program to PATH ('-' for stdout) instead of rendering
    #[arg(long, value_name = "PATH")]
    pub emit_scad: Option<PathBuf>,

    /// Print a JSON summary of the conversion to stdout
    #[arg(long)]
    pub json: bool,

    /// Don't print progress messages
    #[arg(short, long)]
    pub quiet: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    cli::cmd_convert(&args)
}
