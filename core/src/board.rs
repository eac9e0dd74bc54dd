use alloc::collections::VecDeque;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardPhase {
    /// Nothing revealed yet, flags may already be set.
    Ready,
    Active,
    Won,
    Lost,
}

impl BoardPhase {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for BoardPhase {
    fn default() -> Self {
        Self::Ready
    }
}

/// The board engine: owns the grid and applies reveal and flag actions to it.
///
/// Mines are placed lazily on the first reveal so that the first revealed cell is always safe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: BoardConfig,
    cells: Array2<Cell>,
    seed: u64,
    mines_placed: bool,
    revealed_count: CellCount,
    flagged_count: CellCount,
    phase: BoardPhase,
    triggered_mine: Option<Coord2>,
}

impl Board {
    /// Empty board, mines are laid out from `seed` on the first reveal.
    pub fn new(config: BoardConfig, seed: u64) -> Self {
        Self {
            config,
            cells: Array2::from_shape_fn(config.size().to_nd_index(), |(row, col)| {
                Cell::new((row as Coord, col as Coord))
            }),
            seed,
            mines_placed: false,
            revealed_count: 0,
            flagged_count: 0,
            phase: Default::default(),
            triggered_mine: None,
        }
    }

    pub fn create(rows: Coord, cols: Coord, mines: CellCount, seed: u64) -> Result<Self> {
        Ok(Self::new(BoardConfig::new(rows, cols, mines)?, seed))
    }

    /// Board with a predetermined layout, the first reveal will not move any mine.
    pub fn from_layout(layout: &MineLayout) -> Result<Self> {
        let mut board = Self::new(layout.config()?, 0);
        board.apply_layout(layout);
        Ok(board)
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub fn rows(&self) -> Coord {
        self.config.rows()
    }

    pub fn cols(&self) -> Coord {
        self.config.cols()
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines()
    }

    pub fn phase(&self) -> BoardPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn cell(&self, coords: Coord2) -> Result<&Cell> {
        let coords = self.config.validate_coords(coords)?;
        Ok(&self.cells[coords.to_nd_index()])
    }

    pub fn view_at(&self, coords: Coord2) -> Result<CellView> {
        let coords = self.config.validate_coords(coords)?;
        Ok(self.view_of(coords))
    }

    /// Views in row-major order.
    pub fn iter_views(&self) -> impl Iterator<Item = (Coord2, CellView)> + '_ {
        self.cells
            .iter()
            .map(|cell| (cell.coords(), self.view_of(cell.coords())))
    }

    fn view_of(&self, coords: Coord2) -> CellView {
        let cell = &self.cells[coords.to_nd_index()];
        match (cell.is_revealed(), cell.is_flagged(), cell.is_mine()) {
            (true, _, true) if self.triggered_mine == Some(coords) => CellView::Exploded,
            (true, _, true) => CellView::Mine,
            (true, _, false) => CellView::Revealed(cell.adjacent_mines()),
            (false, true, false) if matches!(self.phase, BoardPhase::Lost) => CellView::WrongFlag,
            (false, true, _) => CellView::Flagged,
            (false, false, _) => CellView::Hidden,
        }
    }

    /// Lays out mines around `exclude` and computes adjacency, exactly once per board.
    pub fn place_mines(&mut self, exclude: Coord2) -> Result<()> {
        self.place_mines_with(RejectionSampler::new(self.seed), exclude)
    }

    pub fn place_mines_with<G: MineLayoutGenerator>(
        &mut self,
        generator: G,
        exclude: Coord2,
    ) -> Result<()> {
        let exclude = self.config.validate_coords(exclude)?;
        if self.mines_placed {
            return Err(GameError::MinesAlreadyPlaced);
        }

        let layout = generator.generate(self.config, exclude);
        debug_assert_eq!(layout.mine_count(), self.config.mines());
        debug_assert!(!layout.contains_mine(exclude));
        self.apply_layout(&layout);
        Ok(())
    }

    fn apply_layout(&mut self, layout: &MineLayout) {
        for cell in self.cells.iter_mut() {
            let coords = cell.coords();
            if layout.contains_mine(coords) {
                cell.set_mine();
            } else {
                cell.set_adjacent_mines(layout.adjacent_mine_count(coords));
            }
        }
        self.mines_placed = true;
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.config.validate_coords(coords)?;

        if self.phase.is_finished() {
            log::trace!("Ignoring reveal at {:?}, game already ended", coords);
            return Ok(RevealOutcome::Continue);
        }

        let cell = self.cells[coords.to_nd_index()];
        if cell.is_flagged() || cell.is_revealed() {
            log::trace!("Ignoring reveal at {:?}, cell is {:?}", coords, self.view_of(coords));
            return Ok(RevealOutcome::Continue);
        }

        if !self.mines_placed {
            self.place_mines(coords)?;
        }

        if self.cells[coords.to_nd_index()].is_mine() {
            self.lose(coords);
            return Ok(RevealOutcome::Lost);
        }

        self.flood_reveal(coords);

        if self.revealed_count == self.config.safe_cells() {
            self.win();
            Ok(RevealOutcome::Won)
        } else {
            self.mark_started();
            Ok(RevealOutcome::Continue)
        }
    }

    /// Reveals `start` and, while zero cells keep turning up, their unflagged neighbors.
    fn flood_reveal(&mut self, start: Coord2) {
        let mut to_visit = VecDeque::from([start]);

        while let Some(visit_coords) = to_visit.pop_front() {
            let cell = &mut self.cells[visit_coords.to_nd_index()];
            if cell.is_revealed() || cell.is_flagged() {
                continue;
            }

            cell.set_revealed();
            self.revealed_count += 1;
            let adjacent_mines = cell.adjacent_mines();
            log::trace!(
                "Revealed {:?}, adjacent mines: {}",
                visit_coords,
                adjacent_mines
            );

            if adjacent_mines == 0 {
                to_visit.extend(self.cells.neighbors(visit_coords).filter(|&pos| {
                    let neighbor = &self.cells[pos.to_nd_index()];
                    !neighbor.is_revealed() && !neighbor.is_flagged()
                }));
            }
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<i8> {
        let coords = self.config.validate_coords(coords)?;

        if self.phase.is_finished() {
            log::trace!("Ignoring flag at {:?}, game already ended", coords);
            return Ok(0);
        }

        let cell = &mut self.cells[coords.to_nd_index()];
        if cell.is_revealed() {
            return Ok(0);
        }

        if cell.is_flagged() {
            cell.set_flagged(false);
            self.flagged_count -= 1;
            Ok(-1)
        } else {
            cell.set_flagged(true);
            self.flagged_count += 1;
            Ok(1)
        }
    }

    fn mark_started(&mut self) {
        if self.phase.is_ready() {
            log::debug!("Game started");
            self.phase = BoardPhase::Active;
        }
    }

    /// Lays every mine open, flagged or not. Flags on mines are dropped since a cell is never both.
    fn lose(&mut self, triggered: Coord2) {
        self.phase = BoardPhase::Lost;
        self.triggered_mine = Some(triggered);

        for cell in self.cells.iter_mut().filter(|cell| cell.is_mine()) {
            if cell.is_flagged() {
                cell.set_flagged(false);
                self.flagged_count -= 1;
            }
            cell.set_revealed();
        }
        log::debug!("Game lost at {:?}", triggered);
    }

    fn win(&mut self) {
        self.phase = BoardPhase::Won;

        for cell in self.cells.iter_mut().filter(|cell| cell.is_mine()) {
            if !cell.is_flagged() {
                cell.set_flagged(true);
                self.flagged_count += 1;
            }
        }
        log::debug!("Game won, {} cells revealed", self.revealed_count);
    }
}
