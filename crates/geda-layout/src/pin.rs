use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Default distance from a pin's connecting end to the symbol body, in mils.
pub const PIN_LENGTH: i64 = 300;

/// Sentinel pad number for pins a pin mapping does not mention.
pub const UNMAPPED: &str = "0";

// ─── Side ────────────────────────────────────────────────────────────

/// The body edge a pin sticks out of. `Unspecified` asks for DIL placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
    #[default]
    #[serde(other)]
    Unspecified,
}

impl Side {
    /// Unit step from the connecting end towards the body.
    pub fn inward(&self) -> (i64, i64) {
        match self {
            Side::Left => (1, 0),
            Side::Right => (-1, 0),
            Side::Top => (0, -1),
            Side::Bottom => (0, 1),
            Side::Unspecified => (0, 0),
        }
    }
}

// ─── Electrical type ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinType {
    #[serde(alias = "in")]
    Input,
    #[serde(alias = "out")]
    Output,
    #[serde(alias = "io", alias = "inout", alias = "bidir")]
    Bidirectional,
    #[serde(alias = "pwr")]
    Power,
    #[serde(alias = "pas")]
    Passive,
    #[default]
    #[serde(other)]
    Unknown,
}

impl PinType {
    /// The gschem `pintype=` value.
    pub fn as_geda(&self) -> &'static str {
        match self {
            PinType::Input => "in",
            PinType::Output => "out",
            PinType::Bidirectional | PinType::Unknown => "io",
            PinType::Power => "pwr",
            PinType::Passive => "pas",
        }
    }
}

// ─── Pin ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pin {
    /// Source pin number; identifies the pin inside one collection.
    pub number: String,
    pub label: String,
    pub pin_type: PinType,
    pub side: Side,
    /// The connecting (outer) end. `None` until a synthesizer places it.
    pub position: Option<Point>,
    pub length: i64,
    /// Footprint pad number overlaid by a pin mapping.
    pub pad_number: Option<String>,
}

impl Pin {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            label: String::new(),
            pin_type: PinType::Unknown,
            side: Side::Unspecified,
            position: None,
            length: PIN_LENGTH,
            pad_number: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_type(mut self, pin_type: PinType) -> Self {
        self.pin_type = pin_type;
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn at(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_length(mut self, length: i64) -> Self {
        self.length = length;
        self
    }

    /// A copy of this pin moved to `position` on `side`.
    pub fn placed(&self, side: Side, position: Point) -> Pin {
        Pin {
            side,
            position: Some(position),
            ..self.clone()
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.position.is_some() && self.side != Side::Unspecified
    }

    /// The end that touches the symbol body.
    pub fn body_end(&self) -> Option<Point> {
        let (dx, dy) = self.side.inward();
        self.position
            .map(|p| p.offset(dx * self.length, dy * self.length))
    }

    /// (connecting end, body end)
    pub fn endpoints(&self) -> Option<(Point, Point)> {
        Some((self.position?, self.body_end()?))
    }

    /// The number written out: the mapped pad if any, else the source number.
    pub fn emitted_number(&self) -> &str {
        self.pad_number.as_deref().unwrap_or(&self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_end_per_side() {
        let origin = Point::new(0, 0);
        let pin = Pin::new("1").with_side(Side::Left).at(origin);
        assert_eq!(pin.body_end(), Some(Point::new(300, 0)));
        let pin = Pin::new("2").with_side(Side::Right).at(origin);
        assert_eq!(pin.body_end(), Some(Point::new(-300, 0)));
        let pin = Pin::new("3").with_side(Side::Top).at(origin).with_length(200);
        assert_eq!(pin.body_end(), Some(Point::new(0, -200)));
        let pin = Pin::new("4").with_side(Side::Bottom).at(origin);
        assert_eq!(pin.body_end(), Some(Point::new(0, 300)));
        let pin = Pin::new("5").at(origin);
        assert_eq!(pin.body_end(), Some(origin));
    }

    #[test]
    fn test_unplaced_pin_has_no_endpoints() {
        let pin = Pin::new("1").with_side(Side::Left);
        assert!(pin.endpoints().is_none());
        assert!(!pin.is_resolved());
    }

    #[test]
    fn test_emitted_number_prefers_pad() {
        let mut pin = Pin::new("7");
        assert_eq!(pin.emitted_number(), "7");
        pin.pad_number = Some("B3".to_string());
        assert_eq!(pin.emitted_number(), "B3");
    }

    #[test]
    fn test_pin_type_deserialize_aliases() {
        let types: Vec<PinType> =
            serde_json::from_str(r#"["in", "output", "io", "pwr", "passive", "tristate"]"#).unwrap();
        assert_eq!(
            types,
            vec![
                PinType::Input,
                PinType::Output,
                PinType::Bidirectional,
                PinType::Power,
                PinType::Passive,
                PinType::Unknown,
            ]
        );
    }

    #[test]
    fn test_side_deserialize_unknown_is_unspecified() {
        let sides: Vec<Side> = serde_json::from_str(r#"["left", "top", "middle"]"#).unwrap();
        assert_eq!(sides, vec![Side::Left, Side::Top, Side::Unspecified]);
    }
}
