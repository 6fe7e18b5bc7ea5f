use super::{whole_degrees, Emitter};
use crate::assembly::Assembly;
use crate::bbox::BBox;
use crate::error::Result;
use crate::geometry::{normalize_degrees, Point, Shape};
use crate::layout::pads::{Pad, PadKind};
use crate::pin::Pin;
use log::debug;
use std::fmt::Write;

/// Writes gEDA PCB `Element[...]` footprints in centimils.
///
/// PCB's y axis points down, so every y coordinate is negated on the way out.
#[derive(Debug, Clone)]
pub struct FootprintEmitter {
    /// Silkscreen stroke for primitives that carry width 0.
    pub line_width: i64,
    /// Copper-to-copper clearance written on every pad and pin.
    pub clearance: i64,
    /// Added to the copper size to get the solder mask opening.
    pub mask_margin: i64,
    /// Copper ring written for each laid-out pin.
    pub pin_diameter: i64,
    pub pin_drill: i64,
}

impl Default for FootprintEmitter {
    fn default() -> Self {
        Self {
            line_width: 1000,
            clearance: 2000,
            mask_margin: 600,
            pin_diameter: 6000,
            pin_drill: 3200,
        }
    }
}

fn flip(p: Point) -> Point {
    Point::new(p.x, -p.y)
}

/// Quotes are not escapable in PCB strings.
fn quoted(s: &str) -> String {
    s.replace('"', "'")
}

impl FootprintEmitter {
    fn width_of(&self, width: i64) -> i64 {
        if width > 0 {
            width
        } else {
            self.line_width
        }
    }

    /// A laid-out pin becomes a through-hole `Pin` at its connecting end.
    fn write_pin(&self, out: &mut String, pin: &Pin) -> Result<()> {
        let Some((outer, _)) = pin.endpoints() else {
            return Ok(());
        };
        let c = flip(outer);
        let name = if pin.label.is_empty() {
            pin.number.as_str()
        } else {
            pin.label.as_str()
        };
        writeln!(
            out,
            "\tPin[{} {} {} {} {} {} \"{}\" \"{}\" \"\"]",
            c.x,
            c.y,
            self.pin_diameter,
            self.clearance,
            self.pin_diameter + self.mask_margin,
            self.pin_drill,
            quoted(name),
            quoted(pin.emitted_number())
        )?;
        Ok(())
    }

    fn write_outline(&self, out: &mut String, outline: &BBox) -> Result<()> {
        let corners = [
            Point::new(outline.min_x, outline.min_y),
            Point::new(outline.max_x, outline.min_y),
            Point::new(outline.max_x, outline.max_y),
            Point::new(outline.min_x, outline.max_y),
        ];
        for (i, start) in corners.iter().enumerate() {
            let (a, b) = (flip(*start), flip(corners[(i + 1) % corners.len()]));
            writeln!(
                out,
                "\tElementLine[{} {} {} {} {}]",
                a.x, a.y, b.x, b.y, self.line_width
            )?;
        }
        Ok(())
    }

    fn write_pad(&self, out: &mut String, pad: &Pad) -> Result<()> {
        let flags = if pad.square { "square" } else { "" };
        let number = quoted(&pad.number);
        match &pad.kind {
            PadKind::Smd {
                start,
                end,
                thickness,
            } => {
                let (a, b) = (flip(*start), flip(*end));
                writeln!(
                    out,
                    "\tPad[{} {} {} {} {thickness} {} {} \"{number}\" \"{number}\" \"{flags}\"]",
                    a.x,
                    a.y,
                    b.x,
                    b.y,
                    self.clearance,
                    thickness + self.mask_margin
                )?;
            }
            PadKind::ThroughHole {
                center,
                diameter,
                drill,
            } => {
                let c = flip(*center);
                writeln!(
                    out,
                    "\tPin[{} {} {diameter} {} {} {drill} \"{number}\" \"{number}\" \"{flags}\"]",
                    c.x,
                    c.y,
                    self.clearance,
                    diameter + self.mask_margin
                )?;
            }
        }
        Ok(())
    }
}

impl Emitter for FootprintEmitter {
    fn emit(&self, assembly: &Assembly) -> Result<String> {
        assembly.finalize()?;
        let mut out = String::new();
        writeln!(
            out,
            "Element[\"\" \"{}\" \"\" \"\" 0 0 0 25000 0 100 \"\"]",
            quoted(&assembly.name)
        )?;
        writeln!(out, "(")?;

        for pin in &assembly.pins {
            self.write_pin(&mut out, pin)?;
        }
        for pad in &assembly.pads {
            self.write_pad(&mut out, pad)?;
        }

        for primitive in &assembly.primitives {
            if !primitive.is_silkscreen() {
                debug!("{}: skipping {:?} layer primitive", assembly.name, primitive.layer);
                continue;
            }
            let w = self.width_of(primitive.width);
            match &primitive.shape {
                Shape::Line { start, end } => {
                    let (a, b) = (flip(*start), flip(*end));
                    writeln!(out, "\tElementLine[{} {} {} {} {w}]", a.x, a.y, b.x, b.y)?;
                }
                Shape::Arc {
                    center,
                    radius,
                    start_angle,
                    sweep_angle,
                } => {
                    // PCB measures from -x, and the flipped y axis keeps the sweep sense
                    let c = flip(*center);
                    writeln!(
                        out,
                        "\tElementArc[{} {} {radius} {radius} {} {} {w}]",
                        c.x,
                        c.y,
                        whole_degrees(normalize_degrees(start_angle + 180.0)),
                        whole_degrees(*sweep_angle)
                    )?;
                }
                Shape::Circle { center, radius } => {
                    let c = flip(*center);
                    writeln!(out, "\tElementArc[{} {} {radius} {radius} 0 360 {w}]", c.x, c.y)?;
                }
            }
        }

        if !assembly.pins.is_empty() || !assembly.primitives.is_empty() {
            self.write_outline(&mut out, &assembly.outline())?;
        }

        for attr in &assembly.attributes {
            if attr.key.is_empty() {
                debug!("{}: free text {:?} has no footprint form; skipped", assembly.name, attr.value);
                continue;
            }
            writeln!(out, "\tAttribute(\"{}\" \"{}\")", quoted(&attr.key), quoted(&attr.value))?;
        }

        writeln!(out, ")")?;
        Ok(out)
    }
}
