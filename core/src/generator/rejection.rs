use ndarray::Array2;
use rand::prelude::*;

use super::*;

/// Uniform placement by rejection sampling: draw a random cell, retry when it is already a mine or
/// is the excluded cell.
///
/// Expected retries stay close to the mine count while the board is sparse, which all presets are
/// (at most ~21% density). Since `BoardConfig` always leaves one safe cell the loop terminates, but
/// it slows down sharply as the density approaches `rows * cols - 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct RejectionSampler {
    seed: u64,
}

impl RejectionSampler {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineLayoutGenerator for RejectionSampler {
    fn generate(self, config: BoardConfig, exclude: Coord2) -> MineLayout {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mine_mask: Array2<bool> = Array2::default(config.size().to_nd_index());
        let mut mines_placed: CellCount = 0;
        let mut draws: u64 = 0;

        while mines_placed < config.mines() {
            let coords = (
                rng.random_range(0..config.rows()),
                rng.random_range(0..config.cols()),
            );
            draws += 1;

            if coords == exclude || mine_mask[coords.to_nd_index()] {
                continue;
            }

            mine_mask[coords.to_nd_index()] = true;
            mines_placed += 1;
        }

        log::debug!(
            "Placed {} mines avoiding {:?} after {} draws",
            mines_placed,
            exclude,
            draws
        );
        MineLayout::from_mine_mask(mine_mask)
    }
}
