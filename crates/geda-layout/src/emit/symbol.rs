use super::{whole_degrees, Emitter};
use crate::assembly::Assembly;
use crate::attributes::AttributeText;
use crate::error::Result;
use crate::geometry::{ccw_span, Point, Shape};
use crate::pin::{Pin, Side};
use std::fmt::Write;

/// gschem file format version written in the header.
pub const SYMBOL_VERSION: &str = "v 20110115 1";

const GRAPHIC_COLOR: u8 = 3;
const PIN_COLOR: u8 = 1;
const ATTRIBUTE_COLOR: u8 = 5;
const DETACHED_ATTRIBUTE_COLOR: u8 = 8;
const TEXT_COLOR: u8 = 9;

/// Gap between a pin line and its number/label text, in mils.
const PIN_TEXT_GAP: i64 = 50;

/// Writes gschem `.sym` text.
#[derive(Debug, Clone)]
pub struct SymbolEmitter {
    /// Stroke width for primitives that carry width 0, and for the outline box.
    pub line_width: i64,
    pub text_size: u32,
    pub pin_text_size: u32,
}

impl Default for SymbolEmitter {
    fn default() -> Self {
        Self {
            line_width: 10,
            text_size: 10,
            pin_text_size: 8,
        }
    }
}

impl SymbolEmitter {
    fn width_of(&self, width: i64) -> i64 {
        if width > 0 {
            width
        } else {
            self.line_width
        }
    }

    fn write_pin(&self, out: &mut String, seq: usize, pin: &Pin) -> Result<()> {
        let Some((outer, inner)) = pin.endpoints() else {
            return Ok(());
        };
        writeln!(
            out,
            "P {} {} {} {} {PIN_COLOR} 0 0",
            outer.x, outer.y, inner.x, inner.y
        )?;
        writeln!(out, "{{")?;

        let (dx, dy) = pin.side.inward();
        let mid = Point::new((outer.x + inner.x) / 2, (outer.y + inner.y) / 2);
        let label_at = inner.offset(dx * PIN_TEXT_GAP, dy * PIN_TEXT_GAP);
        // gschem alignment codes: 1 mid-left, 3 lower-middle, 7 mid-right
        let (number_at, angle, label_align) = match pin.side {
            Side::Top => (mid.offset(-PIN_TEXT_GAP / 2, 0), 90, 7),
            Side::Bottom => (mid.offset(-PIN_TEXT_GAP / 2, 0), 90, 1),
            Side::Right => (mid.offset(0, PIN_TEXT_GAP / 2), 0, 7),
            _ => (mid.offset(0, PIN_TEXT_GAP / 2), 0, 1),
        };
        let label = if pin.label.is_empty() {
            pin.number.as_str()
        } else {
            pin.label.as_str()
        };

        let size = self.pin_text_size;
        writeln!(
            out,
            "T {} {} {ATTRIBUTE_COLOR} {size} 1 1 {angle} 3 1",
            number_at.x, number_at.y
        )?;
        writeln!(out, "pinnumber={}", pin.emitted_number())?;
        writeln!(
            out,
            "T {} {} {ATTRIBUTE_COLOR} {size} 0 1 {angle} 3 1",
            number_at.x, number_at.y
        )?;
        writeln!(out, "pinseq={seq}")?;
        writeln!(
            out,
            "T {} {} {TEXT_COLOR} {size} 1 1 {angle} {label_align} 1",
            label_at.x, label_at.y
        )?;
        writeln!(out, "pinlabel={label}")?;
        writeln!(
            out,
            "T {} {} {ATTRIBUTE_COLOR} {size} 0 1 {angle} {label_align} 1",
            label_at.x, label_at.y
        )?;
        writeln!(out, "pintype={}", pin.pin_type.as_geda())?;
        writeln!(out, "}}")?;
        Ok(())
    }

    fn write_attribute(&self, out: &mut String, attr: &AttributeText) -> Result<()> {
        let color = if attr.key.is_empty() {
            TEXT_COLOR
        } else {
            DETACHED_ATTRIBUTE_COLOR
        };
        writeln!(
            out,
            "T {} {} {color} {} {} 1 0 0 1",
            attr.position.x,
            attr.position.y,
            self.text_size,
            u8::from(attr.visible)
        )?;
        writeln!(out, "{}", attr.text())?;
        Ok(())
    }
}

impl Emitter for SymbolEmitter {
    fn emit(&self, assembly: &Assembly) -> Result<String> {
        assembly.finalize()?;
        let mut out = String::new();
        writeln!(out, "{SYMBOL_VERSION}")?;

        for (i, pin) in assembly.pins.iter().enumerate() {
            self.write_pin(&mut out, i + 1, pin)?;
        }

        for primitive in &assembly.primitives {
            let w = self.width_of(primitive.width);
            match &primitive.shape {
                Shape::Line { start, end } => writeln!(
                    out,
                    "L {} {} {} {} {GRAPHIC_COLOR} {w} 0 0 -1 -1",
                    start.x, start.y, end.x, end.y
                )?,
                Shape::Arc {
                    center,
                    radius,
                    start_angle,
                    sweep_angle,
                } => {
                    let (start, sweep) = ccw_span(*start_angle, *sweep_angle);
                    writeln!(
                        out,
                        "A {} {} {radius} {} {} {GRAPHIC_COLOR} {w} 0 0 -1 -1",
                        center.x,
                        center.y,
                        whole_degrees(start),
                        whole_degrees(sweep)
                    )?
                }
                Shape::Circle { center, radius } => writeln!(
                    out,
                    "V {} {} {radius} {GRAPHIC_COLOR} {w} 0 0 -1 -1 0 -1 -1 -1 -1 -1",
                    center.x, center.y
                )?,
            }
        }

        if !assembly.pins.is_empty() || !assembly.primitives.is_empty() {
            let outline = assembly.outline();
            writeln!(
                out,
                "B {} {} {} {} {GRAPHIC_COLOR} {} 0 0 -1 -1 0 -1 -1 -1 -1 -1",
                outline.min_x,
                outline.min_y,
                outline.width(),
                outline.height(),
                self.line_width
            )?;
        }

        for attr in &assembly.attributes {
            self.write_attribute(&mut out, attr)?;
        }
        Ok(out)
    }
}
