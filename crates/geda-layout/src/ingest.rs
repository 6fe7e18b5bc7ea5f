//! Normalized records handed over by the per-format ingestion adapters, and
//! the pipeline that turns one record into emitted `.sym`/`.fp` text.
//!
//! Raw coordinates are `f64` in source units. They are multiplied by the
//! unit's `scale` and quantized to the output grid before anything else
//! touches them.

use crate::assembly::{Assembly, AssemblyKind, Reference};
use crate::attributes::{Attribute, TextCursor};
use crate::bbox::BBox;
use crate::emit::emitter_for;
use crate::error::{LayoutError, Result};
use crate::geometry::{Layer, Point, Primitive};
use crate::layout::pads::{Pad, PadInstance, PadShape, PadStack, PadStackList};
use crate::layout::{synthesize, LayoutStrategy};
use crate::pin::{Pin, PinType, Side};
use crate::pin_list::{PinList, PinMapping};
use crate::LayoutOptions;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Extent, in mils, past which a converted unit is reported as unusually large.
pub const LARGE_COMPONENT: i64 = 10_000;

// ─── Records ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UnitRecord {
    pub name: String,
    pub kind: AssemblyKind,
    /// Source units to output grid units.
    pub scale: f64,
    pub layout: LayoutStrategy,
    pub slots: u32,
    /// Reject duplicate pin numbers instead of keeping both.
    pub strict_pins: bool,
    pub pins: Vec<PinRecord>,
    pub primitives: Vec<PrimitiveRecord>,
    pub pad_stacks: Vec<PadStackRecord>,
    pub pads: Vec<PadRecord>,
    /// `key=value` strings in display order.
    pub attributes: Vec<String>,
    pub pin_map: Vec<(String, String)>,
    pub variants: Vec<VariantRecord>,
    /// Footprint named on a symbol that has no variants. Ignored on footprints.
    pub default_footprint: Option<String>,
}

impl Default for UnitRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: AssemblyKind::Symbol,
            scale: 1.0,
            layout: LayoutStrategy::Auto,
            slots: 0,
            strict_pins: false,
            pins: Vec::new(),
            primitives: Vec::new(),
            pad_stacks: Vec::new(),
            pads: Vec::new(),
            attributes: Vec::new(),
            pin_map: Vec::new(),
            variants: Vec::new(),
            default_footprint: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PinRecord {
    pub number: Option<String>,
    pub label: String,
    #[serde(rename = "type")]
    pub pin_type: PinType,
    pub side: Side,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub length: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeRecord {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Arc {
        x: f64,
        y: f64,
        radius: f64,
        start: f64,
        sweep: f64,
    },
    Circle {
        x: f64,
        y: f64,
        radius: f64,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrimitiveRecord {
    #[serde(flatten)]
    pub shape: ShapeRecord,
    #[serde(default)]
    pub layer: Layer,
    #[serde(default)]
    pub width: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PadStackRecord {
    pub name: String,
    #[serde(default)]
    pub shape: PadShape,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub drill: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PadRecord {
    pub number: String,
    pub stack: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub rotation: f64,
}

/// One device flavour of a symbol: its footprint and how pins map onto its pads.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantRecord {
    pub footprint: String,
    #[serde(default)]
    pub pin_map: Vec<(String, String)>,
}

/// A records file: one unit, or `{ "units": [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Batch {
    Many { units: Vec<UnitRecord> },
    One(UnitRecord),
}

impl Batch {
    pub fn into_units(self) -> Vec<UnitRecord> {
        match self {
            Batch::Many { units } => units,
            Batch::One(unit) => vec![unit],
        }
    }
}

pub fn parse_batch(text: &str) -> Result<Vec<UnitRecord>> {
    let batch: Batch = serde_json::from_str(text)?;
    Ok(batch.into_units())
}

// ─── Output ──────────────────────────────────────────────────────────

/// One written file.
#[derive(Debug, Clone, Serialize)]
pub struct Converted {
    pub name: String,
    pub kind: AssemblyKind,
    pub file_name: String,
    pub body: String,
    pub bbox: BBox,
}

// ─── Record → model ──────────────────────────────────────────────────

fn quantize_length(value: f64, scale: f64) -> Result<i64> {
    Ok(Point::quantize(value, 0.0, scale)?.x)
}

fn build_pins(record: &UnitRecord, scale: f64, opts: &LayoutOptions) -> Result<PinList> {
    let mut pins = if record.strict_pins {
        PinList::strict()
    } else {
        PinList::new()
    }
    .with_slots(record.slots);

    for (i, raw) in record.pins.iter().enumerate() {
        let number = match &raw.number {
            Some(n) if !n.trim().is_empty() => n.trim().to_string(),
            _ => {
                let substitute = (i + 1).to_string();
                warn!(
                    "{}: pin record {} has no number; using {substitute}",
                    record.name,
                    i + 1
                );
                substitute
            }
        };
        let length = match raw.length {
            Some(l) => quantize_length(l, scale)?,
            None => opts.pin_length,
        };
        let mut pin = Pin::new(number)
            .with_label(raw.label.trim())
            .with_type(raw.pin_type)
            .with_side(raw.side)
            .with_length(length);
        match (raw.x, raw.y) {
            (Some(x), Some(y)) => pin = pin.at(Point::quantize(x, y, scale)?),
            (None, None) => {}
            _ => warn!(
                "{}: pin {} has only one coordinate; it will be laid out",
                record.name, pin.number
            ),
        }
        pins.add(pin)?;
    }
    Ok(pins)
}

fn build_primitive(raw: &PrimitiveRecord, scale: f64) -> Result<Primitive> {
    let primitive = match raw.shape {
        ShapeRecord::Line { x1, y1, x2, y2 } => Primitive::line(
            Point::quantize(x1, y1, scale)?,
            Point::quantize(x2, y2, scale)?,
            raw.layer,
        ),
        ShapeRecord::Arc {
            x,
            y,
            radius,
            start,
            sweep,
        } => Primitive::arc(
            Point::quantize(x, y, scale)?,
            quantize_length(radius, scale)?,
            start,
            sweep,
            raw.layer,
        ),
        ShapeRecord::Circle { x, y, radius } => Primitive::circle(
            Point::quantize(x, y, scale)?,
            quantize_length(radius, scale)?,
            raw.layer,
        ),
    };
    Ok(primitive.with_width(quantize_length(raw.width, scale)?))
}

fn build_pads(record: &UnitRecord, scale: f64) -> Result<Vec<Pad>> {
    let mut stacks = PadStackList::new();
    for raw in &record.pad_stacks {
        let drill = match raw.drill {
            Some(d) if d > 0.0 => Some(quantize_length(d, scale)?),
            _ => None,
        };
        stacks.add(PadStack {
            name: raw.name.clone(),
            shape: raw.shape,
            width: quantize_length(raw.width, scale)?,
            height: quantize_length(raw.height, scale)?,
            drill,
        });
    }

    let mut pads = Vec::with_capacity(record.pads.len());
    for raw in &record.pads {
        let instance = PadInstance {
            number: raw.number.clone(),
            stack: raw.stack.clone(),
            position: Point::quantize(raw.x, raw.y, scale)?,
            rotation: raw.rotation,
        };
        match stacks.pad(&instance) {
            Ok(pad) => pads.push(pad),
            Err(e @ LayoutError::MalformedRecord(_)) => {
                warn!("{}: {e}; pad skipped", record.name)
            }
            Err(e) => return Err(e),
        }
    }
    Ok(pads)
}

/// One output file to produce from a unit.
struct Variant {
    name: String,
    mapping: Option<PinMapping>,
    footprint: Option<String>,
}

fn mapping_of(pairs: &[(String, String)]) -> Option<PinMapping> {
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.iter().cloned().collect())
    }
}

fn variants_of(record: &UnitRecord, name: &str) -> Vec<Variant> {
    if record.kind == AssemblyKind::Footprint {
        if record.default_footprint.is_some() {
            debug!("{name}: default_footprint ignored on a footprint");
        }
        return vec![Variant {
            name: name.to_string(),
            mapping: mapping_of(&record.pin_map),
            footprint: None,
        }];
    }
    if record.variants.is_empty() {
        return vec![Variant {
            name: name.to_string(),
            mapping: mapping_of(&record.pin_map),
            footprint: record.default_footprint.clone(),
        }];
    }
    record
        .variants
        .iter()
        .map(|v| Variant {
            name: format!("{name}_{}", v.footprint),
            mapping: mapping_of(&v.pin_map).or_else(|| mapping_of(&record.pin_map)),
            footprint: Some(v.footprint.clone()),
        })
        .collect()
}

// ─── Pipeline ────────────────────────────────────────────────────────

/// Convert one unit record into its output files: one per variant for
/// symbols with device variants, otherwise exactly one.
pub fn convert_unit(record: &UnitRecord, opts: &LayoutOptions) -> Result<Vec<Converted>> {
    opts.validate()?;
    let name = match record.name.trim() {
        "" => {
            warn!("unit record has no name; using \"unnamed\"");
            "unnamed"
        }
        n => n,
    };
    let scale = if record.scale.is_finite() && record.scale > 0.0 {
        record.scale
    } else {
        warn!("{name}: scale {} is unusable; using 1", record.scale);
        1.0
    };

    let raw_pins = build_pins(record, scale, opts)?;
    let strategy = opts.layout.unwrap_or(record.layout);
    let pins = synthesize(&raw_pins, strategy, opts)?;
    let primitives = record
        .primitives
        .iter()
        .map(|p| build_primitive(p, scale))
        .collect::<Result<Vec<_>>>()?;
    let pads = build_pads(record, scale)?;
    let base_attributes: Vec<Attribute> = record
        .attributes
        .iter()
        .map(|a| Attribute::parse(a))
        .collect();

    let mut out = Vec::new();
    for variant in variants_of(record, name) {
        let mut assembly = Assembly::new(variant.name, record.kind);
        assembly.pins = pins.clone();
        assembly.primitives = primitives.clone();
        assembly.pads = pads.clone();
        if let Some(mapping) = &variant.mapping {
            assembly.pins.apply_pin_mapping(mapping);
        }
        assembly.finalize()?;

        if record.kind == AssemblyKind::Symbol {
            let offset = assembly.justify(
                Point::ORIGIN,
                Reference::LowerLeft {
                    clearance: opts.symbol_clearance,
                },
            )?;
            debug!("{}: justified by ({}, {})", assembly.name, offset.x, offset.y);
        }

        let mut attributes = base_attributes.clone();
        if let Some(footprint) = variant.footprint {
            attributes.push(Attribute::new("footprint", footprint));
        }
        if assembly.pins.slots() > 0 {
            attributes.push(Attribute::new("numslots", assembly.pins.slots().to_string()));
        }
        let cursor = TextCursor::new().with_pitch(opts.attribute_pitch);
        let anchor = assembly.text_anchor();
        assembly.place_attributes(cursor, anchor, &attributes);

        let body = emitter_for(record.kind).emit(&assembly)?;
        let bbox = assembly.bounding_box();
        let extent = match record.kind {
            AssemblyKind::Symbol => bbox.width().max(bbox.height()),
            AssemblyKind::Footprint => bbox.width().max(bbox.height()) / 100,
        };
        if extent > LARGE_COMPONENT {
            info!(
                "{} is unusually large: ({}, {}) to ({}, {})",
                assembly.name, bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y
            );
        }
        out.push(Converted {
            file_name: format!("{}.{}", assembly.name, record.kind.extension()),
            name: assembly.name,
            kind: record.kind,
            body,
            bbox,
        });
    }
    Ok(out)
}

/// Convert units in order. A unit that fails is logged and skipped.
pub fn convert_batch(units: &[UnitRecord], opts: &LayoutOptions) -> Vec<Converted> {
    let mut out = Vec::new();
    for unit in units {
        match convert_unit(unit, opts) {
            Ok(converted) => out.extend(converted),
            Err(e) => warn!("skipping unit {:?}: {e}", unit.name),
        }
    }
    out
}
