use crate::bbox::BBox;
use crate::error::{LayoutError, Result};
use crate::geometry::Point;
use crate::pin::{Pin, Side, UNMAPPED};
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// Room left for a pin label when anchoring attribute text right of the pins.
pub const TEXT_ALLOWANCE: i64 = 200;

// ─── PinList ─────────────────────────────────────────────────────────

/// An ordered pin collection.
///
/// Iteration order is always insertion order, and emitters write pins in that
/// order, so two runs over the same records give byte-identical output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PinList {
    pins: Vec<Pin>,
    slots: u32,
    strict: bool,
    body: Option<BBox>,
}

impl PinList {
    pub fn new() -> Self {
        Self::default()
    }

    /// A list that rejects a second pin with an already used number.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    pub fn with_slots(mut self, slots: u32) -> Self {
        self.slots = slots;
        self
    }

    /// An empty list carrying the same slot count and uniqueness policy.
    pub(crate) fn empty_like(&self) -> PinList {
        PinList {
            pins: Vec::with_capacity(self.pins.len()),
            slots: self.slots,
            strict: self.strict,
            body: None,
        }
    }

    /// Append without the uniqueness check; synthesizers re-adding pins
    /// from an already valid list use this.
    pub(crate) fn push(&mut self, pin: Pin) {
        self.pins.push(pin);
    }

    pub fn add(&mut self, pin: Pin) -> Result<()> {
        if self.strict && self.pins.iter().any(|p| p.number == pin.number) {
            return Err(LayoutError::DuplicateName(pin.number));
        }
        self.pins.push(pin);
        Ok(())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pin> {
        self.pins.iter()
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn slots(&self) -> u32 {
        self.slots
    }

    /// The body rectangle a synthesizer laid the pins around, if any.
    pub fn body(&self) -> Option<BBox> {
        self.body
    }

    pub fn set_body(&mut self, body: BBox) {
        self.body = Some(body);
    }

    // ─── Extents ─────────────────────────────────────────────────────

    /// Box over both ends of every placed pin; the zero box when there are none.
    pub fn extents(&self) -> BBox {
        self.extents_or_empty().or_zero()
    }

    pub(crate) fn extents_or_empty(&self) -> BBox {
        let mut bbox = BBox::empty();
        for (outer, inner) in self.pins.iter().filter_map(|p| p.endpoints()) {
            bbox.expand_point(outer);
            bbox.expand_point(inner);
        }
        bbox
    }

    pub fn min_x(&self) -> i64 {
        self.extents().min_x
    }

    pub fn max_x(&self) -> i64 {
        self.extents().max_x
    }

    pub fn min_y(&self) -> i64 {
        self.extents().min_y
    }

    pub fn max_y(&self) -> i64 {
        self.extents().max_y
    }

    /// X anchor for right-justified attribute text.
    pub fn text_right_edge(&self) -> i64 {
        self.pins
            .iter()
            .filter(|p| matches!(p.side, Side::Right | Side::Unspecified))
            .filter_map(|p| p.position)
            .map(|p| p.x + TEXT_ALLOWANCE)
            .max()
            .unwrap_or_else(|| self.max_x())
    }

    // ─── Numbering ───────────────────────────────────────────────────

    /// Overlay footprint pad numbers. Unmapped pins get the `"0"` sentinel.
    pub fn apply_pin_mapping(&mut self, mapping: &PinMapping) {
        for pin in &mut self.pins {
            let pad = match mapping.pad_for(&pin.number) {
                Some(pad) => pad.to_string(),
                None => {
                    debug!("pin {} has no pad in mapping", pin.number);
                    UNMAPPED.to_string()
                }
            };
            pin.pad_number = Some(pad);
        }
    }

    // ─── Finalization checks ─────────────────────────────────────────

    pub fn first_unresolved(&self) -> Option<&Pin> {
        self.pins.iter().find(|p| !p.is_resolved())
    }

    pub fn is_resolved(&self) -> bool {
        self.first_unresolved().is_none()
    }

    /// Fails on the first two pins whose connecting ends coincide.
    pub fn check_collisions(&self) -> Result<()> {
        let mut seen: HashMap<Point, &str> = HashMap::new();
        for pin in &self.pins {
            let Some(pos) = pin.position else { continue };
            if let Some(first) = seen.insert(pos, pin.number.as_str()) {
                return Err(LayoutError::PinCollision {
                    first: first.to_string(),
                    second: pin.number.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn translate(&mut self, delta: Point) {
        for pin in &mut self.pins {
            if let Some(pos) = pin.position.as_mut() {
                *pos = *pos + delta;
            }
        }
        if let Some(body) = self.body.as_mut() {
            *body = body.translate(delta);
        }
    }
}

impl<'a> IntoIterator for &'a PinList {
    type Item = &'a Pin;
    type IntoIter = std::slice::Iter<'a, Pin>;

    fn into_iter(self) -> Self::IntoIter {
        self.pins.iter()
    }
}

// ─── Pin mapping ─────────────────────────────────────────────────────

/// Ordered (source pin number → pad number) pairs from a device/package map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinMapping {
    pairs: Vec<(String, String)>,
}

impl PinMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: impl Into<String>, pad: impl Into<String>) {
        self.pairs.push((source.into(), pad.into()));
    }

    /// The first pad listed for `source`.
    pub fn pad_for(&self, source: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, pad)| pad.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<S: Into<String>, P: Into<String>> FromIterator<(S, P)> for PinMapping {
    fn from_iter<I: IntoIterator<Item = (S, P)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(s, p)| (s.into(), p.into()))
                .collect(),
        }
    }
}
