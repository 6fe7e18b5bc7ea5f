use crate::bbox::BBox;
use crate::error::{LayoutError, Result};
use crate::geometry::{normalize_degrees, Point};
use log::warn;
use serde::{Deserialize, Serialize};

// ─── Pad stacks ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadShape {
    #[default]
    #[serde(alias = "rectangle", alias = "square")]
    Rect,
    #[serde(alias = "circle", alias = "ellipse")]
    Round,
    #[serde(alias = "oval", alias = "obround")]
    Oblong,
}

/// A named, reusable pad shape. Sizes are in footprint grid units.
#[derive(Debug, Clone, PartialEq)]
pub struct PadStack {
    pub name: String,
    pub shape: PadShape,
    pub width: i64,
    pub height: i64,
    /// Plated hole diameter; `None` for surface-mount stacks.
    pub drill: Option<i64>,
}

/// One placement of a pad stack in a footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct PadInstance {
    pub number: String,
    pub stack: String,
    pub position: Point,
    /// Degrees, counter-clockwise.
    pub rotation: f64,
}

/// Pad stack definitions in declaration order.
#[derive(Debug, Clone, Default)]
pub struct PadStackList {
    stacks: Vec<PadStack>,
}

impl PadStackList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stack. A second definition with the same name is ignored.
    pub fn add(&mut self, stack: PadStack) {
        if self.get(&stack.name).is_some() {
            warn!("pad stack {} defined twice; keeping the first", stack.name);
            return;
        }
        self.stacks.push(stack);
    }

    pub fn get(&self, name: &str) -> Option<&PadStack> {
        self.stacks.iter().find(|s| s.name == name)
    }

    /// Resolve a pad instance against its stack.
    pub fn pad(&self, instance: &PadInstance) -> Result<Pad> {
        let stack = self.get(&instance.stack).ok_or_else(|| {
            LayoutError::MalformedRecord(format!(
                "pad {} references unknown pad stack {}",
                instance.number, instance.stack
            ))
        })?;
        Ok(Pad::from_stack(stack, instance))
    }
}

// ─── Pads ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PadKind {
    /// A copper stroke of `thickness` from `start` to `end` (gEDA `Pad[]`).
    Smd {
        start: Point,
        end: Point,
        thickness: i64,
    },
    /// A plated hole (gEDA `Pin[]`).
    ThroughHole {
        center: Point,
        diameter: i64,
        drill: i64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pad {
    pub number: String,
    pub kind: PadKind,
    pub square: bool,
}

impl Pad {
    fn from_stack(stack: &PadStack, instance: &PadInstance) -> Pad {
        let square = stack.shape == PadShape::Rect;
        let kind = match stack.drill {
            Some(drill) => {
                if stack.width != stack.height {
                    warn!(
                        "pad stack {} is {}x{}; plated pads are drawn round at the larger size",
                        stack.name, stack.width, stack.height
                    );
                }
                PadKind::ThroughHole {
                    center: instance.position,
                    diameter: stack.width.max(stack.height),
                    drill,
                }
            }
            None => {
                let thickness = stack.width.min(stack.height);
                let half_len = (stack.width.max(stack.height) - thickness) / 2;
                let (dx, dy) = if stack.width >= stack.height {
                    (half_len, 0)
                } else {
                    (0, half_len)
                };
                let a = rotate(Point::new(-dx, -dy), instance.rotation);
                let b = rotate(Point::new(dx, dy), instance.rotation);
                PadKind::Smd {
                    start: instance.position + a,
                    end: instance.position + b,
                    thickness,
                }
            }
        };
        Pad {
            number: instance.number.clone(),
            kind,
            square,
        }
    }

    pub fn translate(&mut self, delta: Point) {
        match &mut self.kind {
            PadKind::Smd { start, end, .. } => {
                *start = *start + delta;
                *end = *end + delta;
            }
            PadKind::ThroughHole { center, .. } => *center = *center + delta,
        }
    }

    /// Copper extent including the stroke thickness.
    pub fn extent(&self) -> BBox {
        match &self.kind {
            PadKind::Smd {
                start,
                end,
                thickness,
            } => {
                let r = thickness / 2;
                BBox {
                    min_x: start.x.min(end.x) - r,
                    min_y: start.y.min(end.y) - r,
                    max_x: start.x.max(end.x) + r,
                    max_y: start.y.max(end.y) + r,
                }
            }
            PadKind::ThroughHole {
                center, diameter, ..
            } => {
                let r = diameter / 2;
                BBox::from_corners(center.offset(-r, -r), center.offset(r, r))
            }
        }
    }
}

/// Rotate about the origin; quarter turns are exact.
fn rotate(p: Point, degrees: f64) -> Point {
    let a = normalize_degrees(degrees);
    if a == 0.0 {
        p
    } else if a == 90.0 {
        Point::new(-p.y, p.x)
    } else if a == 180.0 {
        Point::new(-p.x, -p.y)
    } else if a == 270.0 {
        Point::new(p.y, -p.x)
    } else {
        let (sin, cos) = a.to_radians().sin_cos();
        let x = p.x as f64 * cos - p.y as f64 * sin;
        let y = p.x as f64 * sin + p.y as f64 * cos;
        Point::new(x.round() as i64, y.round() as i64)
    }
}
