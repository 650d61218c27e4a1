//! Core geometry types for svg2stl.
//!
//! Everything here lives in drawing-unit space (whatever the SVG declares).
//! Conversion to millimeters happens once, as a single `scale(...)` around
//! the whole solid, so these types never carry a unit.

/// A 2D point with x,y coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A line segment defined by two endpoints.
///
/// Contours are kept as raw segment lists: consecutive segments usually
/// share an endpoint, but nothing deduplicates them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point mirrored through `center`.
    ///
    /// Used to recover the implicit control point of smooth curve commands.
    #[inline]
    pub fn reflect_about(&self, center: Point) -> Point {
        Point::new(2.0 * center.x - self.x, 2.0 * center.y - self.y)
    }

    #[inline]
    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

impl From<Point> for lyon_geom::Point<f64> {
    #[inline]
    fn from(p: Point) -> Self {
        lyon_geom::point(p.x, p.y)
    }
}

impl From<lyon_geom::Point<f64>> for Point {
    #[inline]
    fn from(p: lyon_geom::Point<f64>) -> Self {
        Point::new(p.x, p.y)
    }
}

impl Line {
    #[inline]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Build a line from its two endpoints.
    #[inline]
    pub fn between(start: Point, end: Point) -> Self {
        Self::new(start.x, start.y, end.x, end.y)
    }

    /// Get the start point of the line.
    #[inline]
    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    /// Get the end point of the line.
    #[inline]
    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }
}

// ============================================================================
// TESTS
// ============================================================================
