use crate::geometry::{angle_in_span, arc_point, ccw_span, Point, Primitive, Shape};
use crate::pin_list::PinList;
use serde::Serialize;

/// Axis-aligned integer box. An empty box has `min > max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BBox {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl BBox {
    pub const ZERO: BBox = BBox {
        min_x: 0,
        min_y: 0,
        max_x: 0,
        max_y: 0,
    };

    pub fn empty() -> Self {
        Self {
            min_x: i64::MAX,
            min_y: i64::MAX,
            max_x: i64::MIN,
            max_y: i64::MIN,
        }
    }

    pub fn from_corners(a: Point, b: Point) -> Self {
        let mut bbox = Self::empty();
        bbox.expand_point(a);
        bbox.expand_point(b);
        bbox
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// The zero box at the origin when nothing was added.
    pub fn or_zero(self) -> Self {
        if self.is_empty() {
            Self::ZERO
        } else {
            self
        }
    }

    pub fn expand_point(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn union(&self, other: &BBox) -> BBox {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        BBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.max_x - self.min_x
        }
    }

    pub fn height(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.max_y - self.min_y
        }
    }

    pub fn lower_left(&self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn upper_left(&self) -> Point {
        Point::new(self.min_x, self.max_y)
    }

    pub fn translate(&self, delta: Point) -> BBox {
        if self.is_empty() {
            return *self;
        }
        BBox {
            min_x: self.min_x + delta.x,
            min_y: self.min_y + delta.y,
            max_x: self.max_x + delta.x,
            max_y: self.max_y + delta.y,
        }
    }

    pub fn expand_primitive(&mut self, primitive: &Primitive) {
        match &primitive.shape {
            Shape::Line { start, end } => {
                self.expand_point(*start);
                self.expand_point(*end);
            }
            Shape::Circle { center, radius } => {
                self.expand_point(center.offset(-radius, -radius));
                self.expand_point(center.offset(*radius, *radius));
            }
            Shape::Arc {
                center,
                radius,
                start_angle,
                sweep_angle,
            } => self.expand_arc(*center, *radius, *start_angle, *sweep_angle),
        }
    }

    /// Encloses the swept arc: both endpoints plus every axis extremum inside the sweep.
    fn expand_arc(&mut self, center: Point, radius: i64, start_angle: f64, sweep_angle: f64) {
        let (start, sweep) = ccw_span(start_angle, sweep_angle);
        for (x, y) in [arc_point(center, radius, start), arc_point(center, radius, start + sweep)] {
            self.expand_point(Point::new(x.round() as i64, y.round() as i64));
        }
        let extrema = [
            (0.0, center.offset(radius, 0)),
            (90.0, center.offset(0, radius)),
            (180.0, center.offset(-radius, 0)),
            (270.0, center.offset(0, -radius)),
        ];
        for (angle, p) in extrema {
            if angle_in_span(angle, start, sweep) {
                self.expand_point(p);
            }
        }
    }
}

/// Like `bounding_box`, but left empty when there is nothing to enclose.
pub(crate) fn enclose(primitives: &[Primitive], pins: &PinList) -> BBox {
    let mut bbox = pins.extents_or_empty();
    for primitive in primitives {
        bbox.expand_primitive(primitive);
    }
    bbox
}

/// Smallest box enclosing both ends of every placed pin and every primitive.
///
/// Returns the zero box when there is nothing to enclose.
pub fn bounding_box(primitives: &[Primitive], pins: &PinList) -> BBox {
    enclose(primitives, pins).or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Layer;
    use crate::pin::{Pin, Side};

    fn arc_bbox(start: f64, sweep: f64) -> BBox {
        let arc = Primitive::arc(Point::new(100, 100), 50, start, sweep, Layer::Silkscreen);
        bounding_box(&[arc], &PinList::new())
    }

    #[test]
    fn test_empty_is_zero_box() {
        assert_eq!(bounding_box(&[], &PinList::new()), BBox::ZERO);
    }

    #[test]
    fn test_full_circle_arc_any_start() {
        let square = BBox {
            min_x: 50,
            min_y: 50,
            max_x: 150,
            max_y: 150,
        };
        for start in [0.0, 17.0, 90.0, 213.5, -45.0] {
            assert_eq!(arc_bbox(start, 360.0), square, "start angle {start}");
        }
        let circle = Primitive::circle(Point::new(100, 100), 50, Layer::Silkscreen);
        assert_eq!(bounding_box(&[circle], &PinList::new()), square);
    }

    #[test]
    fn test_quarter_arc_uses_endpoints() {
        // 0..90 degrees: from (150,100) to (100,150)
        assert_eq!(
            arc_bbox(0.0, 90.0),
            BBox {
                min_x: 100,
                min_y: 100,
                max_x: 150,
                max_y: 150
            }
        );
    }

    #[test]
    fn test_arc_crossing_extremum() {
        // 45..135 passes through the top at 90 degrees
        let bbox = arc_bbox(45.0, 90.0);
        assert_eq!(bbox.max_y, 150);
        assert_eq!(bbox.min_x, 65);
        assert_eq!(bbox.max_x, 135);
        assert_eq!(bbox.min_y, 135);
    }

    #[test]
    fn test_clockwise_sweep_matches_ccw() {
        assert_eq!(arc_bbox(90.0, -90.0), arc_bbox(0.0, 90.0));
    }

    #[test]
    fn test_pins_contribute_both_ends() {
        let mut pins = PinList::new();
        pins.add(Pin::new("1").with_side(Side::Left).at(Point::new(0, 0)))
            .unwrap();
        pins.add(Pin::new("2").with_side(Side::Top).at(Point::new(500, 800)))
            .unwrap();
        assert_eq!(
            bounding_box(&[], &pins),
            BBox {
                min_x: 0,
                min_y: 0,
                max_x: 500,
                max_y: 800
            }
        );
    }

    #[test]
    fn test_union_with_empty() {
        let a = BBox::from_corners(Point::new(0, 0), Point::new(10, 10));
        assert_eq!(a.union(&BBox::empty()), a);
        assert_eq!(BBox::empty().union(&a), a);
    }
}
