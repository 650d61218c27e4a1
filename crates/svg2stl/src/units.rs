//! Drawing units to millimeters.
//!
//! Only two cases are recognized: the SVG already declares millimeters,
//! or it doesn't and every coordinate is taken to be a pixel at `dpi`.

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// DPI used when the caller doesn't pick one.
pub const DEFAULT_DPI: u32 = 96;

/// Unit type declared by the document's root width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitType {
    /// Coordinates are already physical millimeters.
    Millimeter,
    /// Anything else, assumed to be pixels.
    #[default]
    Other,
}

/// Uniform scale from drawing units to millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactor(pub f64);

impl ScaleFactor {
    /// The identity scale.
    pub const IDENTITY: ScaleFactor = ScaleFactor(1.0);

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Compute the scale factor for a declared unit type.
///
/// `dpi` must be non-zero; the pipeline rejects zero before getting here.
pub fn scale(unit: UnitType, dpi: u32) -> ScaleFactor {
    match unit {
        UnitType::Millimeter => ScaleFactor::IDENTITY,
        UnitType::Other => ScaleFactor(MM_PER_INCH / f64::from(dpi)),
    }
}
