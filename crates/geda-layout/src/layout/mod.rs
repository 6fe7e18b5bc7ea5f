pub mod dil;
pub mod grid;
pub mod pads;

use crate::error::Result;
use crate::pin::Side;
use crate::pin_list::PinList;
use crate::LayoutOptions;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// How a unit's pins get their coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStrategy {
    /// Pick from what the records carry.
    #[default]
    Auto,
    /// Keep the source coordinates.
    Explicit,
    Dil,
    Grid,
}

/// Decide the concrete strategy for `pins`.
///
/// `Auto` keeps source coordinates when every pin is placed, sided and
/// collision free; otherwise pins that all declare a side are grid-aligned
/// and anything else falls back to DIL.
pub fn resolve_strategy(pins: &PinList, requested: LayoutStrategy) -> LayoutStrategy {
    match requested {
        LayoutStrategy::Auto => {}
        LayoutStrategy::Explicit if !pins.is_resolved() => {
            warn!("explicit layout requested but some pins are unplaced; choosing a layout");
        }
        other => return other,
    }

    if pins.is_resolved() {
        match pins.check_collisions() {
            Ok(()) => return LayoutStrategy::Explicit,
            Err(e) => warn!("{e}; re-laying out pins"),
        }
    }
    if pins.iter().all(|p| p.side != Side::Unspecified) {
        LayoutStrategy::Grid
    } else {
        LayoutStrategy::Dil
    }
}

/// Produce a placed copy of `pins`. The input is never modified.
pub fn synthesize(pins: &PinList, requested: LayoutStrategy, opts: &LayoutOptions) -> Result<PinList> {
    let strategy = resolve_strategy(pins, requested);
    debug!("laying out {} pins with {:?}", pins.len(), strategy);
    match strategy {
        LayoutStrategy::Dil => dil::create_dil(pins, opts.pin_pitch, opts.dil_body_width),
        LayoutStrategy::Grid => grid::align_to_grid(pins, opts.pin_pitch),
        LayoutStrategy::Explicit | LayoutStrategy::Auto => Ok(pins.clone()),
    }
}
