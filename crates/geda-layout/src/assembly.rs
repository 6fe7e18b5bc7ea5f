use crate::attributes::{Attribute, AttributeText, TextCursor};
use crate::bbox::{enclose, BBox};
use crate::error::{LayoutError, Result};
use crate::geometry::{Point, Primitive};
use crate::layout::pads::Pad;
use crate::pin_list::PinList;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssemblyKind {
    /// gschem symbol, coordinates in mils.
    #[default]
    Symbol,
    /// gEDA PCB footprint, coordinates in centimils.
    Footprint,
}

impl AssemblyKind {
    pub fn extension(&self) -> &'static str {
        match self {
            AssemblyKind::Symbol => "sym",
            AssemblyKind::Footprint => "fp",
        }
    }
}

/// The point of the bounding box that `justify` moves onto the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    /// Bottom-left corner, `clearance` further down.
    LowerLeft { clearance: i64 },
    /// Top-left corner, `clearance` further up.
    UpperLeft { clearance: i64 },
    At(Point),
}

/// Everything produced for one symbol or footprint.
#[derive(Debug, Clone, Serialize)]
pub struct Assembly {
    pub name: String,
    pub kind: AssemblyKind,
    pub pins: PinList,
    pub primitives: Vec<Primitive>,
    pub pads: Vec<Pad>,
    pub attributes: Vec<AttributeText>,
    /// Total translation applied by `justify`/`translate` so far.
    pub offset: Point,
}

impl Assembly {
    pub fn new(name: impl Into<String>, kind: AssemblyKind) -> Self {
        Self {
            name: name.into(),
            kind,
            pins: PinList::new(),
            primitives: Vec::new(),
            pads: Vec::new(),
            attributes: Vec::new(),
            offset: Point::ORIGIN,
        }
    }

    fn require_resolved(&self) -> Result<()> {
        match self.pins.first_unresolved() {
            Some(pin) => Err(LayoutError::UnresolvedPin(pin.number.clone())),
            None => Ok(()),
        }
    }

    /// Check the invariants emission relies on: every pin placed and sided,
    /// no two pins on one point, all geometry inside the output grid range.
    pub fn finalize(&self) -> Result<()> {
        self.require_resolved()?;
        self.pins.check_collisions()?;
        let bbox = self.bounding_box();
        Point::new(bbox.min_x, bbox.min_y).check_range()?;
        Point::new(bbox.max_x, bbox.max_y).check_range()?;
        Ok(())
    }

    // ─── Boxes ───────────────────────────────────────────────────────

    /// Encloses both ends of every pin, every primitive, every pad and the
    /// declared body. The zero box for an empty assembly.
    pub fn bounding_box(&self) -> BBox {
        let mut bbox = enclose(&self.primitives, &self.pins);
        for pad in &self.pads {
            bbox = bbox.union(&pad.extent());
        }
        if let Some(body) = self.pins.body() {
            bbox = bbox.union(&body);
        }
        bbox.or_zero()
    }

    /// The rectangle a symbol draws around itself: the declared body, or the
    /// box over pin body ends and primitives.
    pub fn outline(&self) -> BBox {
        if let Some(body) = self.pins.body() {
            return body;
        }
        let mut bbox = BBox::empty();
        for inner in self.pins.iter().filter_map(|p| p.body_end()) {
            bbox.expand_point(inner);
        }
        for primitive in &self.primitives {
            bbox.expand_primitive(primitive);
        }
        bbox.or_zero()
    }

    /// Where attribute text starts: right of the pins, level with the top.
    pub fn text_anchor(&self) -> Point {
        let bbox = self.bounding_box();
        let x = if self.pins.is_empty() {
            bbox.max_x
        } else {
            self.pins.text_right_edge()
        };
        Point::new(x, bbox.max_y)
    }

    // ─── Justification ───────────────────────────────────────────────

    /// The translation that would put `reference` on `anchor`. Pure.
    pub fn justification_offset(&self, anchor: Point, reference: Reference) -> Result<Point> {
        self.require_resolved()?;
        let bbox = self.bounding_box();
        let reference_point = match reference {
            Reference::LowerLeft { clearance } => bbox.lower_left().offset(0, -clearance),
            Reference::UpperLeft { clearance } => bbox.upper_left().offset(0, clearance),
            Reference::At(p) => p,
        };
        Ok(anchor - reference_point)
    }

    /// Move the assembly so `reference` lands on `anchor`; returns the offset used.
    pub fn justify(&mut self, anchor: Point, reference: Reference) -> Result<Point> {
        let offset = self.justification_offset(anchor, reference)?;
        self.translate(offset)?;
        Ok(offset)
    }

    /// Shift every coordinate by `delta`.
    ///
    /// Nothing is modified when the result would leave the output grid range.
    pub fn translate(&mut self, delta: Point) -> Result<()> {
        delta.check_range()?;
        let moved = self.bounding_box().translate(delta);
        Point::new(moved.min_x, moved.min_y).check_range()?;
        Point::new(moved.max_x, moved.max_y).check_range()?;
        for attr in &self.attributes {
            (attr.position + delta).check_range()?;
        }

        self.pins.translate(delta);
        for primitive in &mut self.primitives {
            primitive.translate(delta);
        }
        for pad in &mut self.pads {
            pad.translate(delta);
        }
        for attr in &mut self.attributes {
            attr.translate(delta);
        }
        self.offset = self.offset + delta;
        Ok(())
    }

    // ─── Attributes ──────────────────────────────────────────────────

    /// Place `attrs` from `cursor` at `anchor` and keep them; returns the advanced cursor.
    pub fn place_attributes(&mut self, cursor: TextCursor, anchor: Point, attrs: &[Attribute]) -> TextCursor {
        let (placed, cursor) = cursor.place(anchor, attrs);
        self.attributes.extend(placed);
        cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Layer, Shape};
    use crate::layout::dil::{create_dil, DIL_BODY_WIDTH, DIL_PITCH};
    use crate::layout::pads::{PadInstance, PadShape, PadStack, PadStackList};
    use crate::pin::{Pin, Side};

    fn dil_symbol(n: usize) -> Assembly {
        let mut raw = PinList::new();
        for i in 1..=n {
            raw.add(Pin::new(i.to_string())).unwrap();
        }
        let mut asm = Assembly::new("U", AssemblyKind::Symbol);
        asm.pins = create_dil(&raw, DIL_PITCH, DIL_BODY_WIDTH).unwrap();
        asm.primitives.push(Primitive::arc(Point::new(400, 900), 100, 180.0, 180.0, Layer::Silkscreen));
        asm.primitives.push(Primitive::line(Point::new(0, 0), Point::new(800, 0), Layer::Silkscreen));
        asm
    }

    fn coordinates(asm: &Assembly) -> (Vec<Option<Point>>, Vec<Primitive>, Vec<Point>) {
        (
            asm.pins.iter().map(|p| p.position).collect(),
            asm.primitives.clone(),
            asm.attributes.iter().map(|a| a.position).collect(),
        )
    }

    #[test]
    fn test_justify_round_trip_is_exact() {
        let mut asm = dil_symbol(8);
        let anchor = asm.text_anchor();
        asm.place_attributes(
            TextCursor::new(),
            anchor,
            &[Attribute::parse("refdes=U?"), Attribute::parse("value=X")],
        );
        let before = coordinates(&asm);

        let offset = asm
            .justify(Point::ORIGIN, Reference::LowerLeft { clearance: 200 })
            .unwrap();
        assert_ne!(offset, Point::ORIGIN);
        assert_eq!(asm.offset, offset);
        asm.translate(-offset).unwrap();

        assert_eq!(coordinates(&asm), before);
        assert_eq!(asm.offset, Point::ORIGIN);
    }

    #[test]
    fn test_justify_lower_left_lands_on_anchor() {
        let mut asm = dil_symbol(4);
        asm.justify(Point::ORIGIN, Reference::LowerLeft { clearance: 200 })
            .unwrap();
        let bbox = asm.bounding_box();
        assert_eq!(bbox.lower_left(), Point::new(0, 200));
    }

    #[test]
    fn test_justify_upper_left() {
        let mut asm = dil_symbol(4);
        asm.justify(Point::ORIGIN, Reference::UpperLeft { clearance: 100 })
            .unwrap();
        let bbox = asm.bounding_box();
        assert_eq!(bbox.upper_left(), Point::new(0, -100));
        assert!(bbox.max_y <= 0);
    }

    #[test]
    fn test_justify_requires_resolved_pins() {
        let mut asm = Assembly::new("U", AssemblyKind::Symbol);
        asm.pins.add(Pin::new("1")).unwrap();
        let err = asm
            .justify(Point::ORIGIN, Reference::LowerLeft { clearance: 0 })
            .unwrap_err();
        assert!(matches!(err, LayoutError::UnresolvedPin(n) if n == "1"));
        assert!(asm.finalize().is_err());
    }

    #[test]
    fn test_translate_overflow_leaves_assembly_untouched() {
        let mut asm = dil_symbol(2);
        let before = coordinates(&asm);
        let err = asm
            .translate(Point::new(crate::geometry::COORD_LIMIT, 0))
            .unwrap_err();
        assert!(matches!(err, LayoutError::GeometryOverflow { .. }));
        assert_eq!(coordinates(&asm), before);
        assert_eq!(asm.offset, Point::ORIGIN);
    }

    #[test]
    fn test_empty_assembly_is_valid() {
        let mut asm = Assembly::new("EMPTY", AssemblyKind::Footprint);
        asm.finalize().unwrap();
        assert_eq!(asm.bounding_box(), BBox::ZERO);
        assert_eq!(asm.outline(), BBox::ZERO);
        let offset = asm
            .justify(Point::ORIGIN, Reference::LowerLeft { clearance: 0 })
            .unwrap();
        assert_eq!(offset, Point::ORIGIN);
    }

    #[test]
    fn test_outline_without_body_uses_pin_body_ends() {
        let mut asm = Assembly::new("X", AssemblyKind::Symbol);
        asm.pins
            .add(Pin::new("1").with_side(Side::Left).at(Point::new(0, 0)))
            .unwrap();
        asm.pins
            .add(Pin::new("2").with_side(Side::Right).at(Point::new(1200, 400)))
            .unwrap();
        assert_eq!(
            asm.outline(),
            BBox::from_corners(Point::new(300, 0), Point::new(900, 400))
        );
        assert_eq!(
            asm.bounding_box(),
            BBox::from_corners(Point::new(0, 0), Point::new(1200, 400))
        );
    }

    #[test]
    fn test_bounding_box_includes_pads_and_arcs() {
        let mut stacks = PadStackList::new();
        stacks.add(PadStack {
            name: "P".to_string(),
            shape: PadShape::Round,
            width: 1000,
            height: 1000,
            drill: Some(500),
        });
        let mut asm = Assembly::new("FP", AssemblyKind::Footprint);
        let pad = stacks
            .pad(&PadInstance {
                number: "1".to_string(),
                stack: "P".to_string(),
                position: Point::new(5000, 5000),
                rotation: 0.0,
            })
            .unwrap();
        asm.pads.push(pad);
        asm.primitives
            .push(Primitive::circle(Point::new(0, 0), 1000, Layer::Silkscreen));
        assert_eq!(
            asm.bounding_box(),
            BBox::from_corners(Point::new(-1000, -1000), Point::new(5500, 5500))
        );
        assert!(matches!(asm.primitives[0].shape, Shape::Circle { .. }));
    }

    #[test]
    fn test_finalize_rejects_collisions() {
        let mut asm = Assembly::new("X", AssemblyKind::Symbol);
        for n in ["1", "2"] {
            asm.pins
                .add(Pin::new(n).with_side(Side::Left).at(Point::new(0, 0)))
                .unwrap();
        }
        assert!(matches!(
            asm.finalize(),
            Err(LayoutError::PinCollision { .. })
        ));
    }
}
