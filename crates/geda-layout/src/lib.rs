pub mod assembly;
pub mod attributes;
pub mod bbox;
pub mod emit;
pub mod error;
pub mod geometry;
pub mod ingest;
pub mod layout;
pub mod pin;
pub mod pin_list;

pub use assembly::{Assembly, AssemblyKind, Reference};
pub use error::{LayoutError, Result};
pub use ingest::{convert_batch, convert_unit, parse_batch, Converted, UnitRecord};
pub use layout::LayoutStrategy;

use std::path::Path;

/// Tunables for pin synthesis, text placement and justification.
///
/// Lengths are in the symbol grid unit (mils).
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Distance between neighbouring synthesized pins.
    pub pin_pitch: i64,
    /// Gap between the two DIL pin columns.
    pub dil_body_width: i64,
    /// Length for pins whose record gives none.
    pub pin_length: i64,
    pub attribute_pitch: i64,
    /// Space left under a justified symbol.
    pub symbol_clearance: i64,
    /// Overrides each record's own layout choice when set.
    pub layout: Option<LayoutStrategy>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            pin_pitch: layout::dil::DIL_PITCH,
            dil_body_width: layout::dil::DIL_BODY_WIDTH,
            pin_length: pin::PIN_LENGTH,
            attribute_pitch: attributes::ATTRIBUTE_PITCH,
            symbol_clearance: 200,
            layout: None,
        }
    }
}

impl LayoutOptions {
    /// Reject values that cannot produce a usable layout: pitch and body
    /// width must be positive, every length must fit the output grid.
    pub fn validate(&self) -> Result<()> {
        let limit = geometry::COORD_LIMIT;
        let checks = [
            ("pin_pitch", self.pin_pitch, 1),
            ("dil_body_width", self.dil_body_width, 1),
            ("attribute_pitch", self.attribute_pitch, 1),
            ("pin_length", self.pin_length, 0),
            ("symbol_clearance", self.symbol_clearance, 0),
        ];
        for (name, value, min) in checks {
            if !(min..=limit).contains(&value) {
                return Err(LayoutError::InvalidOption(format!(
                    "{name} = {value} is outside {min}..={limit}"
                )));
            }
        }
        Ok(())
    }
}

/// Read a records file and convert every unit in it.
pub fn convert_file(path: &Path, opts: &LayoutOptions) -> Result<Vec<Converted>> {
    let text = std::fs::read_to_string(path)?;
    convert_str(&text, opts)
}

/// Convert a records document already in memory.
pub fn convert_str(text: &str, opts: &LayoutOptions) -> Result<Vec<Converted>> {
    opts.validate()?;
    let units = parse_batch(text)?;
    Ok(convert_batch(&units, opts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_valid() {
        LayoutOptions::default().validate().unwrap();
    }

    #[test]
    fn test_zero_pitch_is_rejected() {
        let opts = LayoutOptions {
            pin_pitch: 0,
            ..LayoutOptions::default()
        };
        let err = opts.validate().unwrap_err();
        assert!(matches!(err, LayoutError::InvalidOption(ref m) if m.starts_with("pin_pitch")));
        let err = convert_str(r#"{ "name": "U", "pins": [{ "number": "1" }] }"#, &opts).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidOption(_)));
    }

    #[test]
    fn test_out_of_range_options_are_rejected() {
        for opts in [
            LayoutOptions {
                pin_pitch: i64::MAX / 2,
                ..LayoutOptions::default()
            },
            LayoutOptions {
                dil_body_width: -800,
                ..LayoutOptions::default()
            },
            LayoutOptions {
                pin_length: -1,
                ..LayoutOptions::default()
            },
        ] {
            assert!(matches!(opts.validate(), Err(LayoutError::InvalidOption(_))));
        }
        let edge = LayoutOptions {
            pin_pitch: geometry::COORD_LIMIT,
            pin_length: 0,
            ..LayoutOptions::default()
        };
        edge.validate().unwrap();
    }
}
