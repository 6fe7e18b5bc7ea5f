use crate::error::{LayoutError, Result};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg, Sub};

/// Largest coordinate magnitude gEDA tools accept (they read 32-bit ints).
pub const COORD_LIMIT: i64 = i32::MAX as i64;

// ─── Point ───────────────────────────────────────────────────────────

/// A position in the output format's native grid unit.
///
/// Symbols use mils, footprints use centimils. The y axis points up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Scale a raw source coordinate into grid units, rounding half away from zero.
    pub fn quantize(x: f64, y: f64, scale: f64) -> Result<Point> {
        let qx = quantize_scalar(x * scale);
        let qy = quantize_scalar(y * scale);
        match (qx, qy) {
            (Some(x), Some(y)) => Ok(Point { x, y }),
            _ => Err(LayoutError::GeometryOverflow {
                x: (x * scale) as i64,
                y: (y * scale) as i64,
            }),
        }
    }

    pub fn in_range(&self) -> bool {
        self.x.abs() <= COORD_LIMIT && self.y.abs() <= COORD_LIMIT
    }

    pub fn check_range(self) -> Result<Point> {
        if self.in_range() {
            Ok(self)
        } else {
            Err(LayoutError::GeometryOverflow {
                x: self.x,
                y: self.y,
            })
        }
    }

    /// Narrow a point computed in wide arithmetic, reporting anything past `COORD_LIMIT`.
    pub fn from_wide(x: i128, y: i128) -> Result<Point> {
        let limit = COORD_LIMIT as i128;
        if x.abs() <= limit && y.abs() <= limit {
            Ok(Point::new(x as i64, y as i64))
        } else {
            let saturate = |v: i128| v.clamp(i64::MIN as i128, i64::MAX as i128) as i64;
            Err(LayoutError::GeometryOverflow {
                x: saturate(x),
                y: saturate(y),
            })
        }
    }

    pub fn offset(self, dx: i64, dy: i64) -> Point {
        Point {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

fn quantize_scalar(v: f64) -> Option<i64> {
    let r = v.round();
    if r.is_finite() && r.abs() <= COORD_LIMIT as f64 {
        Some(r as i64)
    } else {
        None
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

// ─── Layers ──────────────────────────────────────────────────────────

/// Which board layer a drawn primitive was pulled from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    #[default]
    Silkscreen,
    Copper,
    Other,
}

// ─── Primitives ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Line {
        start: Point,
        end: Point,
    },
    /// Angles in degrees, counter-clockwise positive, 0 along +x.
    Arc {
        center: Point,
        radius: i64,
        start_angle: f64,
        sweep_angle: f64,
    },
    Circle {
        center: Point,
        radius: i64,
    },
}

/// A drawn outline element. `width` of 0 means "emitter default".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Primitive {
    pub shape: Shape,
    pub layer: Layer,
    pub width: i64,
}

impl Primitive {
    pub fn line(start: Point, end: Point, layer: Layer) -> Self {
        Self {
            shape: Shape::Line { start, end },
            layer,
            width: 0,
        }
    }

    /// Start angle is normalized into [0, 360) and the sweep clamped to one turn.
    pub fn arc(center: Point, radius: i64, start_angle: f64, sweep_angle: f64, layer: Layer) -> Self {
        Self {
            shape: Shape::Arc {
                center,
                radius: radius.abs(),
                start_angle: normalize_degrees(start_angle),
                sweep_angle: sweep_angle.clamp(-360.0, 360.0),
            },
            layer,
            width: 0,
        }
    }

    pub fn circle(center: Point, radius: i64, layer: Layer) -> Self {
        Self {
            shape: Shape::Circle {
                center,
                radius: radius.abs(),
            },
            layer,
            width: 0,
        }
    }

    pub fn with_width(mut self, width: i64) -> Self {
        self.width = width;
        self
    }

    pub fn is_silkscreen(&self) -> bool {
        self.layer == Layer::Silkscreen
    }

    pub fn translate(&mut self, delta: Point) {
        match &mut self.shape {
            Shape::Line { start, end } => {
                *start = *start + delta;
                *end = *end + delta;
            }
            Shape::Arc { center, .. } | Shape::Circle { center, .. } => {
                *center = *center + delta;
            }
        }
    }
}

// ─── Angles ──────────────────────────────────────────────────────────

/// Fold an angle in degrees into [0, 360).
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Rewrite an arc so its sweep is non-negative: returns (start, sweep).
pub fn ccw_span(start_angle: f64, sweep_angle: f64) -> (f64, f64) {
    if sweep_angle < 0.0 {
        (normalize_degrees(start_angle + sweep_angle), -sweep_angle)
    } else {
        (normalize_degrees(start_angle), sweep_angle)
    }
}

/// Whether `angle` lies on the counter-clockwise sweep starting at `start`.
pub fn angle_in_span(angle: f64, start: f64, sweep: f64) -> bool {
    if sweep >= 360.0 {
        return true;
    }
    let rel = normalize_degrees(angle - start);
    rel <= sweep
}

/// Point on a circle at `angle_deg`, unrounded.
pub fn arc_point(center: Point, radius: i64, angle_deg: f64) -> (f64, f64) {
    let rad = angle_deg.to_radians();
    (
        center.x as f64 + radius as f64 * rad.cos(),
        center.y as f64 + radius as f64 * rad.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quantize_rounds_half_away_from_zero() {
        let p = Point::quantize(1.5, -1.5, 1.0).unwrap();
        assert_eq!(p, Point::new(2, -2));
        let p = Point::quantize(0.254, 1.27, 1000.0).unwrap();
        assert_eq!(p, Point::new(254, 1270));
    }

    #[test]
    fn test_quantize_overflow() {
        let err = Point::quantize(1e12, 0.0, 1.0).unwrap_err();
        assert!(matches!(err, LayoutError::GeometryOverflow { .. }));
        assert!(Point::quantize(f64::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_from_wide_reports_overflow() {
        assert_eq!(Point::from_wide(-5, 7).unwrap(), Point::new(-5, 7));
        let err = Point::from_wide(COORD_LIMIT as i128 + 1, 0).unwrap_err();
        assert!(matches!(err, LayoutError::GeometryOverflow { x, .. } if x == COORD_LIMIT + 1));
        let err = Point::from_wide(0, i128::MIN / 2).unwrap_err();
        assert!(matches!(err, LayoutError::GeometryOverflow { y, .. } if y == i64::MIN));
    }

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(100, -200);
        let b = Point::new(-50, 25);
        assert_eq!(a + b - b, a);
        assert_eq!(-a, Point::new(-100, 200));
        assert_eq!(a.offset(1, 2), Point::new(101, -198));
    }

    #[test]
    fn test_normalize_degrees() {
        assert_relative_eq!(normalize_degrees(-90.0), 270.0);
        assert_relative_eq!(normalize_degrees(720.0), 0.0);
        assert_relative_eq!(normalize_degrees(45.5), 45.5);
    }

    #[test]
    fn test_ccw_span_flips_clockwise_sweep() {
        let (start, sweep) = ccw_span(90.0, -90.0);
        assert_relative_eq!(start, 0.0);
        assert_relative_eq!(sweep, 90.0);
    }

    #[test]
    fn test_angle_in_span_wraps() {
        assert!(angle_in_span(0.0, 315.0, 90.0));
        assert!(!angle_in_span(90.0, 315.0, 90.0));
        assert!(angle_in_span(180.0, 10.0, 360.0));
    }

    #[test]
    fn test_translate_primitives() {
        let mut line = Primitive::line(Point::new(0, 0), Point::new(10, 10), Layer::Silkscreen);
        line.translate(Point::new(5, -5));
        assert_eq!(
            line.shape,
            Shape::Line {
                start: Point::new(5, -5),
                end: Point::new(15, 5)
            }
        );

        let mut arc = Primitive::arc(Point::new(0, 0), 50, -90.0, 180.0, Layer::Silkscreen);
        arc.translate(Point::new(1, 1));
        match arc.shape {
            Shape::Arc {
                center,
                start_angle,
                ..
            } => {
                assert_eq!(center, Point::new(1, 1));
                assert_relative_eq!(start_angle, 270.0);
            }
            _ => panic!("Expected Arc"),
        }
    }
}
