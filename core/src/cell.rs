use serde::{Deserialize, Serialize};

use crate::*;

/// One grid position together with everything the engine knows about it.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    row: Coord,
    col: Coord,
    mine: bool,
    revealed: bool,
    flagged: bool,
    adjacent_mines: u8,
}

impl Cell {
    pub(crate) const fn new((row, col): Coord2) -> Self {
        Self {
            row,
            col,
            mine: false,
            revealed: false,
            flagged: false,
            adjacent_mines: 0,
        }
    }

    pub const fn row(&self) -> Coord {
        self.row
    }

    pub const fn col(&self) -> Coord {
        self.col
    }

    pub const fn coords(&self) -> Coord2 {
        (self.row, self.col)
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// Mine count among the up to 8 neighbors, only meaningful for non-mine cells.
    pub const fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    /// Whether this cell is a mine that has been laid open, which only happens on loss.
    pub const fn shows_mine(&self) -> bool {
        self.mine && self.revealed
    }

    pub(crate) const fn is_mine(&self) -> bool {
        self.mine
    }

    pub(crate) fn set_mine(&mut self) {
        self.mine = true;
    }

    pub(crate) fn set_adjacent_mines(&mut self, count: u8) {
        self.adjacent_mines = count;
    }

    pub(crate) fn set_revealed(&mut self) {
        self.revealed = true;
    }

    pub(crate) fn set_flagged(&mut self, flagged: bool) {
        self.flagged = flagged;
    }
}

/// Player-visible projection of a cell, what a renderer draws.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed(u8),
    /// Mine laid open after the game was lost.
    Mine,
    /// The mine whose reveal lost the game.
    Exploded,
    /// Flag left on a safe cell when the game was lost.
    WrongFlag,
}

impl CellView {
    /// Compact numeric encoding for renderers: `0..=8` revealed counts, negatives for the rest.
    pub const fn code(self) -> i8 {
        match self {
            Self::Revealed(count) => count as i8,
            Self::Hidden => -1,
            Self::Flagged => -2,
            Self::Mine => -3,
            Self::Exploded => -4,
            Self::WrongFlag => -5,
        }
    }
}

impl Default for CellView {
    fn default() -> Self {
        Self::Hidden
    }
}
