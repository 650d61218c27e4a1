//! # svg2stl
//!
//! Turn a 2D SVG drawing into a 3D-printable plate.
//!
//! Paths, circles, and rectangles are converted into OpenSCAD statements
//! inside one `difference()`, extruded 1.6mm and scaled to millimeters.
//! OpenSCAD then renders the program to an STL mesh.
//!
//! ```text
//! svg -> Document -> entities -> contours -> SolidDescription -> openscad -> stl
//! ```
//!
//! Only straight lines and cubic Bézier curves are understood inside
//! paths. Quadratic curves and arcs fail the conversion instead of being
//! silently approximated.

pub mod contour;
pub mod error;
pub mod flatten;
pub mod geometry;
pub mod pipeline;
pub mod scad;
pub mod svg;
pub mod units;

// Re-export common types at crate root for convenience.
pub use contour::{Contour, PathCommand, UnsupportedSegmentError, build_contour};
pub use error::{Error, Result};
pub use flatten::{CubicCurve, Flattened, flatten};
pub use geometry::{Line, Point};
pub use pipeline::{
    ConvertOptions, Conversion, Renderer, convert_file, default_output_path, describe, read_svg,
};
pub use scad::{Primitive, SolidDescription, emit};
pub use svg::{Document, Entity, SvgError};
pub use units::{ScaleFactor, UnitType, scale};
