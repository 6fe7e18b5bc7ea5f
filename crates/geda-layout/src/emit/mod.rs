pub mod footprint;
pub mod symbol;

pub use footprint::FootprintEmitter;
pub use symbol::SymbolEmitter;

use crate::assembly::{Assembly, AssemblyKind};
use crate::error::Result;

/// Renders a finalized assembly as the text of one output file.
pub trait Emitter {
    fn emit(&self, assembly: &Assembly) -> Result<String>;
}

/// The emitter for an assembly kind, with default stroke widths.
pub fn emitter_for(kind: AssemblyKind) -> Box<dyn Emitter> {
    match kind {
        AssemblyKind::Symbol => Box::new(SymbolEmitter::default()),
        AssemblyKind::Footprint => Box::new(FootprintEmitter::default()),
    }
}

/// Round a float angle for formats that only take whole degrees.
pub(crate) fn whole_degrees(angle: f64) -> i64 {
    angle.round() as i64
}
