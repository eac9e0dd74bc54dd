use crate::*;
pub use rejection::*;

mod rejection;

/// Strategy for laying out mines once the first revealed cell is known.
pub trait MineLayoutGenerator {
    /// Produces a layout with exactly `config.mines()` mines, none of them on `exclude`.
    fn generate(self, config: BoardConfig, exclude: Coord2) -> MineLayout;
}
