//! SVG parsing - the document model the converter works from.
//!
//! Streams the document with quick-xml instead of building a resolved
//! tree, because the converter needs to know which element each shape came
//! from: `<circle>` and `<rect>` become OpenSCAD built-ins, while `<path>`
//! goes through contour building.
//!
//! Path data is parsed with svgtypes and normalized so every command is
//! absolute and carries its own start point:
//!
//! - relative commands are resolved against the current point
//! - `H`/`V` become plain lines
//! - `S`/`T` get their reflected control point filled in
//! - `Z` records where the subpath started
//!
//! Transforms, styles, and `<use>` references are not resolved.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use svgtypes::{Length, LengthUnit, PathParser, PathSegment};
use thiserror::Error;

use crate::contour::PathCommand;
use crate::flatten::CubicCurve;
use crate::geometry::Point;
use crate::units::UnitType;

/// Error type for SVG parsing.
#[derive(Debug, Error)]
pub enum SvgError {
    #[error("XML parse error at position {position}: {message}")]
    Xml { position: u64, message: String },
    #[error("document has no <svg> root element")]
    NotSvg,
    #[error("invalid {attribute} on <{element}>: {message}")]
    InvalidAttribute {
        element: String,
        attribute: String,
        message: String,
    },
}

/// One drawable element, in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Path {
        id: Option<String>,
        commands: Vec<PathCommand>,
    },
    Circle {
        id: Option<String>,
        cx: f64,
        cy: f64,
        r: f64,
    },
    Rect {
        id: Option<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// A graphics element the converter doesn't handle.
    Other { name: String },
}

impl Entity {
    pub fn kind(&self) -> &str {
        match self {
            Entity::Path { .. } => "path",
            Entity::Circle { .. } => "circle",
            Entity::Rect { .. } => "rect",
            Entity::Other { name } => name,
        }
    }

    /// The element's `id` attribute, if it had one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Entity::Path { id, .. } | Entity::Circle { id, .. } | Entity::Rect { id, .. } => {
                id.as_deref()
            }
            Entity::Other { .. } => None,
        }
    }
}

/// Parsed SVG document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Unit of the root element's `width`.
    pub unit: UnitType,
    /// Every entity, depth-first in document order.
    pub entities: Vec<Entity>,
}

/// Elements reported as [`Entity::Other`].
const OTHER_GRAPHICS: &[&str] = &[
    "ellipse", "line", "polyline", "polygon", "text", "image", "use",
];

impl Document {
    /// Parse SVG source.
    pub fn parse(content: &str) -> Result<Self, SvgError> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut document = Document::default();
        let mut seen_root = false;
        // Elements opened but not yet closed.
        let mut depth = 0usize;

        loop {
            let event = reader.read_event().map_err(|e| SvgError::Xml {
                position: reader.error_position(),
                message: e.to_string(),
            })?;
            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    if matches!(event, Event::Start(_)) {
                        depth += 1;
                    }
                    let name = element_name(e);
                    if !seen_root {
                        if name != "svg" {
                            return Err(SvgError::NotSvg);
                        }
                        seen_root = true;
                        document.unit = root_unit(e)?;
                        continue;
                    }
                    if let Some(entity) = element_to_entity(&name, e)? {
                        document.entities.push(entity);
                    }
                }
                Event::End(_) => depth = depth.saturating_sub(1),
                Event::Eof if depth > 0 => {
                    return Err(SvgError::Xml {
                        position: reader.buffer_position(),
                        message: format!(
                            "unexpected end of document with {depth} unclosed element(s)"
                        ),
                    });
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !seen_root {
            return Err(SvgError::NotSvg);
        }
        Ok(document)
    }
}

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

/// Look up an attribute by local name.
fn attribute(e: &BytesStart, element: &str, key: &str) -> Result<Option<String>, SvgError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| invalid(element, key, err.to_string()))?;
        if attr.key.local_name().as_ref() == key.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|err| invalid(element, key, err.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn invalid(element: &str, attribute: &str, message: String) -> SvgError {
    SvgError::InvalidAttribute {
        element: element.to_string(),
        attribute: attribute.to_string(),
        message,
    }
}

/// Numeric attribute, 0 when absent. Units are dropped.
fn number(e: &BytesStart, element: &str, key: &str) -> Result<f64, SvgError> {
    match attribute(e, element, key)? {
        None => Ok(0.0),
        Some(raw) => {
            let length: Length = raw
                .trim()
                .parse()
                .map_err(|err: svgtypes::Error| invalid(element, key, err.to_string()))?;
            Ok(length.number)
        }
    }
}

fn root_unit(e: &BytesStart) -> Result<UnitType, SvgError> {
    let Some(raw) = attribute(e, "svg", "width")? else {
        return Ok(UnitType::Other);
    };
    let length: Length = raw
        .trim()
        .parse()
        .map_err(|err: svgtypes::Error| invalid("svg", "width", err.to_string()))?;
    Ok(match length.unit {
        LengthUnit::Mm => UnitType::Millimeter,
        _ => UnitType::Other,
    })
}

fn element_to_entity(name: &str, e: &BytesStart) -> Result<Option<Entity>, SvgError> {
    let entity = match name {
        "path" => {
            let data = attribute(e, name, "d")?.unwrap_or_default();
            Entity::Path {
                id: attribute(e, name, "id")?,
                commands: parse_path_data(&data)
                    .map_err(|err| invalid(name, "d", err.to_string()))?,
            }
        }
        "circle" => Entity::Circle {
            id: attribute(e, name, "id")?,
            cx: number(e, name, "cx")?,
            cy: number(e, name, "cy")?,
            r: number(e, name, "r")?,
        },
        "rect" => Entity::Rect {
            id: attribute(e, name, "id")?,
            x: number(e, name, "x")?,
            y: number(e, name, "y")?,
            width: number(e, name, "width")?,
            height: number(e, name, "height")?,
        },
        other if OTHER_GRAPHICS.contains(&other) => Entity::Other {
            name: other.to_string(),
        },
        _ => return Ok(None),
    };
    Ok(Some(entity))
}

/// Parse a `d` attribute into absolute commands.
pub fn parse_path_data(data: &str) -> Result<Vec<PathCommand>, svgtypes::Error> {
    let mut commands = Vec::new();
    let mut current = Point::new(0.0, 0.0);
    let mut subpath_start = current;
    // Control point of the previous command, for S and T reflection.
    let mut prev_cubic_ctrl: Option<Point> = None;
    let mut prev_quad_ctrl: Option<Point> = None;

    for segment in PathParser::from(data) {
        let segment = segment?;
        let resolve = move |abs: bool, x: f64, y: f64| {
            if abs { Point::new(x, y) } else { current.offset(x, y) }
        };

        let mut cubic_ctrl = None;
        let mut quad_ctrl = None;

        match segment {
            PathSegment::MoveTo { abs, x, y } => {
                let to = resolve(abs, x, y);
                commands.push(PathCommand::MoveTo(to));
                current = to;
                subpath_start = to;
            }
            PathSegment::LineTo { abs, x, y } => {
                let end = resolve(abs, x, y);
                commands.push(PathCommand::LineTo { start: current, end });
                current = end;
            }
            PathSegment::HorizontalLineTo { abs, x } => {
                let end = if abs { Point::new(x, current.y) } else { current.offset(x, 0.0) };
                commands.push(PathCommand::LineTo { start: current, end });
                current = end;
            }
            PathSegment::VerticalLineTo { abs, y } => {
                let end = if abs { Point::new(current.x, y) } else { current.offset(0.0, y) };
                commands.push(PathCommand::LineTo { start: current, end });
                current = end;
            }
            PathSegment::CurveTo { abs, x1, y1, x2, y2, x, y } => {
                let curve = CubicCurve::new(
                    current,
                    resolve(abs, x1, y1),
                    resolve(abs, x2, y2),
                    resolve(abs, x, y),
                );
                commands.push(PathCommand::CubicCurveTo(curve));
                cubic_ctrl = Some(curve.ctrl2);
                current = curve.end;
            }
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                let ctrl1 = prev_cubic_ctrl
                    .map(|c| c.reflect_about(current))
                    .unwrap_or(current);
                let curve = CubicCurve::new(current, ctrl1, resolve(abs, x2, y2), resolve(abs, x, y));
                commands.push(PathCommand::CubicCurveTo(curve));
                cubic_ctrl = Some(curve.ctrl2);
                current = curve.end;
            }
            PathSegment::Quadratic { abs, x1, y1, x, y } => {
                let ctrl = resolve(abs, x1, y1);
                let end = resolve(abs, x, y);
                commands.push(PathCommand::QuadraticCurveTo { start: current, ctrl, end });
                quad_ctrl = Some(ctrl);
                current = end;
            }
            PathSegment::SmoothQuadratic { abs, x, y } => {
                let ctrl = prev_quad_ctrl
                    .map(|c| c.reflect_about(current))
                    .unwrap_or(current);
                let end = resolve(abs, x, y);
                commands.push(PathCommand::QuadraticCurveTo { start: current, ctrl, end });
                quad_ctrl = Some(ctrl);
                current = end;
            }
            PathSegment::EllipticalArc {
                abs,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                let end = resolve(abs, x, y);
                commands.push(PathCommand::EllipticalArc {
                    start: current,
                    end,
                    rx,
                    ry,
                    x_axis_rotation,
                    large_arc,
                    sweep,
                });
                current = end;
            }
            PathSegment::ClosePath { .. } => {
                commands.push(PathCommand::ClosePath {
                    start: current,
                    end: subpath_start,
                });
                current = subpath_start;
            }
        }

        prev_cubic_ctrl = cubic_ctrl;
        prev_quad_ctrl = quad_ctrl;
    }

    Ok(commands)
}

// ============================================================================
// TESTS
// ============================================================================
