//! JSON summary of a conversion.

use serde::Serialize;

use svg2stl::{Conversion, Entity, Primitive, UnitType};

/// Entity counts by kind.
#[derive(Serialize, Default, Debug, PartialEq)]
pub struct JsonEntityCounts {
    pub paths: usize,
    pub circles: usize,
    pub rects: usize,
    /// Elements with no solid form (ellipses, text, ...)
    pub skipped: usize,
}

impl JsonEntityCounts {
    pub fn from_entities(entities: &[Entity]) -> Self {
        let mut counts = Self::default();
        for entity in entities {
            match entity {
                Entity::Path { .. } => counts.paths += 1,
                Entity::Circle { .. } => counts.circles += 1,
                Entity::Rect { .. } => counts.rects += 1,
                Entity::Other { .. } => counts.skipped += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.paths + self.circles + self.rects + self.skipped
    }
}

/// One statement of the difference block.
#[derive(Serialize, Debug)]
pub struct JsonStatement {
    pub kind: &'static str,
    /// `id` of the element it came from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Line segments, for polygons and polylines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<usize>,
}

impl JsonStatement {
    pub fn new(primitive: &Primitive, source: &Entity) -> Self {
        let segments = match primitive {
            Primitive::Polygon { segments } | Primitive::Polyline { segments, .. } => {
                Some(segments.len())
            }
            Primitive::Circle { .. } | Primitive::Square { .. } => None,
        };
        Self {
            kind: primitive.name(),
            id: source.id().map(str::to_string),
            segments,
        }
    }
}

/// Top-level `--json` output.
#[derive(Serialize, Debug)]
pub struct JsonSummary {
    pub input: String,
    pub unit: &'static str,
    pub scale: f64,
    pub dpi: u32,
    pub curve_steps: u32,
    pub entities: JsonEntityCounts,
    pub statements: Vec<JsonStatement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scad: Option<String>,
}

impl JsonSummary {
    pub fn new(input: String, conversion: &Conversion, dpi: u32, curve_steps: u32) -> Self {
        Self {
            input,
            unit: match conversion.document.unit {
                UnitType::Millimeter => "mm",
                UnitType::Other => "px",
            },
            scale: conversion.scale.value(),
            dpi,
            curve_steps,
            entities: JsonEntityCounts::from_entities(&conversion.document.entities),
            // Skipped entities emit nothing, so the rest line up with
            // the statements one to one.
            statements: conversion
                .document
                .entities
                .iter()
                .filter(|entity| !matches!(entity, Entity::Other { .. }))
                .zip(&conversion.description.primitives)
                .map(|(entity, primitive)| JsonStatement::new(primitive, entity))
                .collect(),
            output: None,
            scad: None,
        }
    }
}
