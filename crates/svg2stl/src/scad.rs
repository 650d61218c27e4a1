//! OpenSCAD output - the solid description handed to the renderer.
//!
//! Emission builds a small IR first ([`Primitive`] statements inside a
//! [`SolidDescription`]) and only turns it into text through `Display`.
//! Tests compare the IR directly; the renderer gets the text.
//!
//! The generated program has one shape:
//!
//! ```text
//! <library preamble>
//! scale([s, s, 1]) { linear_extrude(height=1.6, center=false) { difference() {
//! <one statement per entity>
//! } } }
//! ```
//!
//! Inside `difference()` the first statement is the body and every later
//! statement is cut out of it, so statement order is document order.

use std::fmt;
use std::num::NonZeroU32;

use crate::contour::{Contour, UnsupportedSegmentError, build_contour};
use crate::geometry::{Line, Point};
use crate::svg::Entity;
use crate::units::ScaleFactor;

/// Helper functions the emitted statements rely on (`flatten`, `polyline`).
pub const LIBRARY_PREAMBLE: &str = include_str!("lib.scad");

/// Extrusion height in millimeters.
pub const EXTRUDE_HEIGHT: f64 = 1.6;

/// Facet count for circles.
pub const CIRCLE_FACETS: u32 = 30;

/// Stroke width for open paths.
pub const POLYLINE_WIDTH: f64 = 1.0;

/// `convexity` hint passed to every polygon.
pub const POLYGON_CONVEXITY: u32 = 10;

/// One 2D statement inside the difference block.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Filled region from a closed contour.
    Polygon { segments: Vec<Line> },
    /// Thin stroke from an open contour.
    Polyline { segments: Vec<Line>, width: f64 },
    Circle { center: Point, radius: f64, facets: u32 },
    /// Axis-aligned rectangle anchored at its minimum corner.
    Square { origin: Point, width: f64, height: f64 },
}

impl Primitive {
    /// Closed contours fill, open ones fall back to a stroke.
    pub fn from_contour(contour: Contour) -> Self {
        if contour.closed {
            Primitive::Polygon {
                segments: contour.segments,
            }
        } else {
            Primitive::Polyline {
                segments: contour.segments,
                width: POLYLINE_WIDTH,
            }
        }
    }

    /// Statement name as it appears in the output.
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Polygon { .. } => "polygon",
            Primitive::Polyline { .. } => "polyline",
            Primitive::Circle { .. } => "circle",
            Primitive::Square { .. } => "square",
        }
    }
}

/// `flatten([[[x1,y1],[x2,y2]], ...])`
struct SegmentList<'a>(&'a [Line]);

impl fmt::Display for SegmentList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("flatten([")?;
        for (i, line) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "[[{},{}],[{},{}]]", line.x1, line.y1, line.x2, line.y2)?;
        }
        f.write_str("])")
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Polygon { segments } => write!(
                f,
                "polygon(points={}, convexity={});",
                SegmentList(segments),
                POLYGON_CONVEXITY
            ),
            Primitive::Polyline { segments, width } => {
                write!(f, "polyline({}, {});", SegmentList(segments), width)
            }
            Primitive::Circle { center, radius, facets } => write!(
                f,
                "translate([{}, {}, 0]) circle({}, $fn={});",
                center.x, center.y, radius, facets
            ),
            Primitive::Square { origin, width, height } => write!(
                f,
                "translate([{}, {}, 0]) square([{}, {}]);",
                origin.x, origin.y, width, height
            ),
        }
    }
}

/// A complete OpenSCAD program for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidDescription {
    pub preamble: &'static str,
    pub scale: ScaleFactor,
    pub height: f64,
    pub primitives: Vec<Primitive>,
}

impl SolidDescription {
    pub fn new(scale: ScaleFactor) -> Self {
        Self {
            preamble: LIBRARY_PREAMBLE,
            scale,
            height: EXTRUDE_HEIGHT,
            primitives: Vec::new(),
        }
    }
}

impl fmt::Display for SolidDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.preamble.trim_end())?;
        let s = self.scale.value();
        writeln!(
            f,
            "scale([{s}, {s}, 1]) {{ linear_extrude(height={}, center=false) {{ difference() {{",
            self.height
        )?;
        for primitive in &self.primitives {
            writeln!(f, "{primitive}")?;
        }
        writeln!(f, "}} }} }}")
    }
}

/// Convert one entity, or `None` for kinds that have no solid form.
pub fn entity_to_primitive(
    entity: &Entity,
    curve_steps: NonZeroU32,
) -> Result<Option<Primitive>, UnsupportedSegmentError> {
    let primitive = match entity {
        Entity::Path { commands, .. } => {
            Primitive::from_contour(build_contour(commands, curve_steps)?)
        }
        Entity::Circle { cx, cy, r, .. } => Primitive::Circle {
            center: Point::new(*cx, *cy),
            radius: *r,
            facets: CIRCLE_FACETS,
        },
        Entity::Rect { x, y, width, height, .. } => Primitive::Square {
            origin: Point::new(*x, *y),
            width: *width,
            height: *height,
        },
        Entity::Other { .. } => return Ok(None),
    };
    Ok(Some(primitive))
}

/// Build the solid description for a document's entities.
///
/// Any unsupported path segment aborts the whole document.
pub fn emit(
    entities: &[Entity],
    scale: ScaleFactor,
    curve_steps: NonZeroU32,
) -> Result<SolidDescription, UnsupportedSegmentError> {
    let mut description = SolidDescription::new(scale);
    for entity in entities {
        if let Some(primitive) = entity_to_primitive(entity, curve_steps)? {
            description.primitives.push(primitive);
        }
    }
    Ok(description)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::PathCommand;
    use crate::flatten::CubicCurve;

    fn steps(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> PathCommand {
        PathCommand::LineTo {
            start: Point::new(x1, y1),
            end: Point::new(x2, y2),
        }
    }

    fn close() -> PathCommand {
        PathCommand::ClosePath {
            start: Point::new(0.0, 0.0),
            end: Point::new(0.0, 0.0),
        }
    }

    fn path(commands: Vec<PathCommand>) -> Entity {
        Entity::Path { id: None, commands }
    }

    fn triangle() -> Vec<PathCommand> {
        vec![
            PathCommand::MoveTo(Point::new(0.0, 0.0)),
            line(0.0, 0.0, 10.0, 0.0),
            line(10.0, 0.0, 5.0, 8.0),
            line(5.0, 8.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn closed_path_emits_polygon() {
        let mut cmds = triangle();
        cmds.push(close());
        let description = emit(&[path(cmds)], ScaleFactor::IDENTITY, steps(10)).unwrap();
        assert_eq!(description.primitives.len(), 1);
        let Primitive::Polygon { segments } = &description.primitives[0] else {
            panic!("expected polygon, got {:?}", description.primitives[0]);
        };
        assert_eq!(segments.len(), 3);
    }

    #[test]
    fn open_path_emits_unit_polyline() {
        let description = emit(&[path(triangle())], ScaleFactor::IDENTITY, steps(10)).unwrap();
        match &description.primitives[0] {
            Primitive::Polyline { segments, width } => {
                assert_eq!(segments.len(), 3);
                assert_eq!(*width, 1.0);
            }
            other => panic!("expected polyline, got {:?}", other),
        }
        assert!(description.to_string().contains("polyline(flatten(["));
        assert!(description.to_string().contains("]), 1);"));
    }

    #[test]
    fn entity_order_is_preserved() {
        let entities = vec![
            Entity::Rect { id: None, x: 0.0, y: 0.0, width: 50.0, height: 30.0 },
            Entity::Circle { id: None, cx: 10.0, cy: 10.0, r: 3.0 },
            path({
                let mut cmds = triangle();
                cmds.push(close());
                cmds
            }),
        ];
        let description = emit(&entities, ScaleFactor::IDENTITY, steps(10)).unwrap();
        let names: Vec<&str> = description.primitives.iter().map(Primitive::name).collect();
        assert_eq!(names, vec!["square", "circle", "polygon"]);

        let text = description.to_string();
        let square = text.find("square(").unwrap();
        let circle = text.find("circle(3").unwrap();
        let polygon = text.find("polygon(").unwrap();
        assert!(square < circle && circle < polygon);
    }

    #[test]
    fn other_entities_are_skipped() {
        let entities = vec![
            Entity::Other { name: "ellipse".to_string() },
            Entity::Circle { id: None, cx: 1.0, cy: 2.0, r: 3.0 },
            Entity::Other { name: "text".to_string() },
        ];
        let description = emit(&entities, ScaleFactor::IDENTITY, steps(10)).unwrap();
        assert_eq!(
            description.primitives,
            vec![Primitive::Circle {
                center: Point::new(1.0, 2.0),
                radius: 3.0,
                facets: 30,
            }]
        );
    }

    #[test]
    fn unsupported_segment_aborts_everything() {
        let entities = vec![
            Entity::Rect { id: None, x: 0.0, y: 0.0, width: 5.0, height: 5.0 },
            path(vec![PathCommand::QuadraticCurveTo {
                start: Point::new(1.0, 1.0),
                ctrl: Point::new(2.0, 3.0),
                end: Point::new(4.0, 1.0),
            }]),
        ];
        let err = emit(&entities, ScaleFactor::IDENTITY, steps(10)).unwrap_err();
        assert_eq!(err.kind, "quadratic curve");
    }

    #[test]
    fn curve_steps_control_polygon_size() {
        let curve = CubicCurve::new(
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
        );
        let cmds = vec![PathCommand::CubicCurveTo(curve), line(10.0, 0.0, 0.0, 0.0), close()];
        let coarse = emit(&[path(cmds.clone())], ScaleFactor::IDENTITY, steps(2)).unwrap();
        let fine = emit(&[path(cmds)], ScaleFactor::IDENTITY, steps(20)).unwrap();

        let count = |d: &SolidDescription| match &d.primitives[0] {
            Primitive::Polygon { segments } => segments.len(),
            other => panic!("expected polygon, got {:?}", other),
        };
        assert_eq!(count(&coarse), 3);
        assert_eq!(count(&fine), 21);
    }

    #[test]
    fn statement_syntax() {
        let polygon = Primitive::Polygon {
            segments: vec![Line::new(0.0, 0.0, 10.0, 0.0), Line::new(10.0, 0.0, 5.5, 8.0)],
        };
        assert_eq!(
            polygon.to_string(),
            "polygon(points=flatten([[[0,0],[10,0]], [[10,0],[5.5,8]]]), convexity=10);"
        );

        let circle = Primitive::Circle {
            center: Point::new(12.0, 7.5),
            radius: 2.0,
            facets: CIRCLE_FACETS,
        };
        assert_eq!(circle.to_string(), "translate([12, 7.5, 0]) circle(2, $fn=30);");

        let square = Primitive::Square {
            origin: Point::new(1.0, 2.0),
            width: 30.0,
            height: 40.0,
        };
        assert_eq!(square.to_string(), "translate([1, 2, 0]) square([30, 40]);");
    }

    #[test]
    fn empty_path_emits_empty_statement() {
        let description = emit(&[path(vec![])], ScaleFactor::IDENTITY, steps(10)).unwrap();
        assert_eq!(description.primitives[0].to_string(), "polyline(flatten([]), 1);");
    }

    #[test]
    fn program_wraps_statements_in_scaled_extrusion() {
        let description = emit(
            &[Entity::Rect { id: None, x: 0.0, y: 0.0, width: 96.0, height: 48.0 }],
            ScaleFactor(0.5),
            steps(10),
        )
        .unwrap();
        let text = description.to_string();

        assert!(text.starts_with(LIBRARY_PREAMBLE.trim_end()));
        assert!(text.contains(
            "scale([0.5, 0.5, 1]) { linear_extrude(height=1.6, center=false) { difference() {\n\
             translate([0, 0, 0]) square([96, 48]);\n\
             } } }\n"
        ));
    }

    #[test]
    fn preamble_defines_helpers() {
        assert!(LIBRARY_PREAMBLE.contains("function flatten("));
        assert!(LIBRARY_PREAMBLE.contains("module polyline("));
    }
}
