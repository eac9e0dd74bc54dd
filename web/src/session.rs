use serde::Serialize;
use wasm_bindgen::prelude::*;
use winsweep_core::{Board, CellView, Coord, Difficulty, GameState, RevealOutcome, Session};

use crate::config::LaunchOptions;
use crate::utils::js_random_seed;

/// Everything a renderer needs to redraw after an action.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub difficulty: Difficulty,
    pub state: GameState,
    pub rows: Coord,
    pub cols: Coord,
    pub mine_counter: u16,
    pub timer: u16,
    /// Row-major.
    pub cells: Vec<CellView>,
}

impl Snapshot {
    pub fn of(session: &Session) -> Self {
        let board = session.board();
        Self {
            difficulty: session.difficulty(),
            state: session.state(),
            rows: board.rows(),
            cols: board.cols(),
            mine_counter: session.mine_counter_display(),
            timer: session.timer_display(),
            cells: board.iter_views().map(|(_, view)| view).collect(),
        }
    }
}

pub fn outcome_name(outcome: RevealOutcome) -> &'static str {
    match outcome {
        RevealOutcome::Continue => "continue",
        RevealOutcome::Lost => "lost",
        RevealOutcome::Won => "won",
    }
}

/// Flat row-major [`CellView::code`] encoding of the board.
pub fn cell_codes(board: &Board) -> Vec<i8> {
    board.iter_views().map(|(_, view)| view.code()).collect()
}

/// JavaScript handle on one game session.
#[wasm_bindgen]
pub struct WebSession {
    session: Session,
}

#[wasm_bindgen]
impl WebSession {
    #[wasm_bindgen(constructor)]
    pub fn new(difficulty: &str) -> Result<WebSession, JsError> {
        let difficulty: Difficulty = difficulty.parse()?;
        Ok(Self {
            session: Session::new(difficulty, js_random_seed()),
        })
    }

    /// Session configured by the launch args in the location hash.
    pub fn from_location() -> WebSession {
        let options = LaunchOptions::current();
        let seed = options.seed.unwrap_or_else(js_random_seed);
        log::debug!("New {} session, seed: {}", options.difficulty, seed);
        Self {
            session: Session::new(options.difficulty, seed),
        }
    }

    pub fn reveal(&mut self, row: Coord, col: Coord) -> Result<String, JsError> {
        let outcome = self.session.reveal((row, col))?;
        Ok(outcome_name(outcome).into())
    }

    pub fn toggle_flag(&mut self, row: Coord, col: Coord) -> Result<i8, JsError> {
        Ok(self.session.toggle_flag((row, col))?)
    }

    pub fn reset(&mut self) {
        self.session.reset(js_random_seed());
    }

    pub fn change_difficulty(&mut self, difficulty: &str) -> Result<(), JsError> {
        let difficulty: Difficulty = difficulty.parse()?;
        self.session.change_difficulty(difficulty, js_random_seed());
        Ok(())
    }

    pub fn state(&self) -> String {
        self.session.state().name().into()
    }

    pub fn difficulty(&self) -> String {
        self.session.difficulty().name().into()
    }

    pub fn rows(&self) -> Coord {
        self.session.board().rows()
    }

    pub fn cols(&self) -> Coord {
        self.session.board().cols()
    }

    pub fn mine_counter(&self) -> u16 {
        self.session.mine_counter_display()
    }

    pub fn timer(&self) -> u16 {
        self.session.timer_display()
    }

    pub fn cell_codes(&self) -> Vec<i8> {
        cell_codes(self.session.board())
    }

    pub fn snapshot_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&Snapshot::of(&self.session))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winsweep_core::MineLayout;

    #[test]
    fn fresh_snapshot_is_all_hidden() {
        let session = Session::new(Difficulty::Intermediate, 4);
        let snapshot = Snapshot::of(&session);

        assert_eq!(snapshot.state, GameState::Idle);
        assert_eq!((snapshot.rows, snapshot.cols), (16, 16));
        assert_eq!(snapshot.mine_counter, 40);
        assert_eq!(snapshot.timer, 0);
        assert_eq!(snapshot.cells.len(), 256);
        assert!(snapshot.cells.iter().all(|&view| view == CellView::Hidden));
    }

    #[test]
    fn snapshot_json_uses_lowercase_names() {
        let session = Session::new(Difficulty::Expert, 4);
        let json = serde_json::to_value(Snapshot::of(&session)).unwrap();

        assert_eq!(json["difficulty"], "expert");
        assert_eq!(json["state"], "idle");
        assert_eq!(json["cells"][0], "hidden");
    }

    #[test]
    fn codes_follow_board_views() {
        let layout = MineLayout::from_mine_coords((2, 2), &[(1, 1)]).unwrap();
        let mut board = Board::from_layout(&layout).unwrap();
        board.reveal((0, 0)).unwrap();
        board.toggle_flag((1, 1)).unwrap();

        assert_eq!(cell_codes(&board), [1, -1, -1, -2]);
    }

    #[test]
    fn outcome_names() {
        assert_eq!(outcome_name(RevealOutcome::Continue), "continue");
        assert_eq!(outcome_name(RevealOutcome::Lost), "lost");
        assert_eq!(outcome_name(RevealOutcome::Won), "won");
    }
}
