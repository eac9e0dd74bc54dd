use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

/// Highest value the three-digit counters can show.
pub const DISPLAY_MAX: u16 = 999;

/// Coarse game state as the surrounding UI sees it.
///
/// Valid transitions:
/// - Idle -> Playing (first accepted reveal or flag)
/// - Idle -> Won/Lost (first reveal ends the game outright)
/// - Playing -> Won/Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    Idle,
    Playing,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::Idle
    }
}

/// One game from the player's point of view: the board plus the timer and flag counter around it.
#[derive(Clone, Debug)]
pub struct Session {
    difficulty: Difficulty,
    board: Board,
    state: GameState,
    flag_count: i32,
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
}

impl Session {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            board: Board::new(difficulty.config(), seed),
            state: Default::default(),
            flag_count: 0,
            started_at: None,
            ended_at: None,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Running total of placed flags, kept from the deltas the board reports.
    pub fn flag_count(&self) -> i32 {
        self.flag_count
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        self.reveal_at(coords, Instant::now())
    }

    fn reveal_at(&mut self, coords: Coord2, now: Instant) -> Result<RevealOutcome> {
        if self.state.is_final() {
            return Ok(RevealOutcome::Continue);
        }

        let was_revealed = self.board.revealed_count();
        let outcome = self.board.reveal(coords)?;

        match outcome {
            RevealOutcome::Continue if self.board.revealed_count() > was_revealed => {
                self.start(now)
            }
            RevealOutcome::Continue => {}
            RevealOutcome::Lost => self.end(GameState::Lost, now),
            RevealOutcome::Won => {
                self.flag_count = self.board.mine_count().into();
                self.end(GameState::Won, now);
            }
        }
        Ok(outcome)
    }

    /// Flips a flag and returns the change to the flag counter.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<i8> {
        self.toggle_flag_at(coords, Instant::now())
    }

    fn toggle_flag_at(&mut self, coords: Coord2, now: Instant) -> Result<i8> {
        if self.state.is_final() {
            return Ok(0);
        }

        let delta = self.board.toggle_flag(coords)?;
        if delta != 0 {
            self.flag_count += i32::from(delta);
            self.start(now);
        }
        Ok(delta)
    }

    /// Throws the board away and starts over with the same difficulty.
    pub fn reset(&mut self, seed: u64) {
        *self = Self::new(self.difficulty, seed);
    }

    pub fn change_difficulty(&mut self, difficulty: Difficulty, seed: u64) {
        log::debug!("Difficulty changed to {}", difficulty);
        *self = Self::new(difficulty, seed);
    }

    /// Whole seconds since play started, frozen once the game ends.
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs_at(Instant::now())
    }

    fn elapsed_secs_at(&self, now: Instant) -> u64 {
        match self.started_at {
            Some(started_at) => self
                .ended_at
                .unwrap_or(now)
                .saturating_duration_since(started_at)
                .as_secs(),
            None => 0,
        }
    }

    pub fn timer_display(&self) -> u16 {
        self.elapsed_secs().min(DISPLAY_MAX.into()) as u16
    }

    /// Mines minus flags, clamped to what a three-digit counter shows.
    ///
    /// Counts every flag the player placed, so it stays put when a loss lays the flagged mines open
    /// and [`Board::flagged_count`] drops.
    pub fn mine_counter_display(&self) -> u16 {
        let left = i32::from(self.board.mine_count()) - self.flag_count;
        left.clamp(0, DISPLAY_MAX.into()) as u16
    }

    fn start(&mut self, now: Instant) {
        if matches!(self.state, GameState::Idle) {
            log::debug!("Session started ({})", self.difficulty);
            self.state = GameState::Playing;
            self.started_at = Some(now);
        }
    }

    fn end(&mut self, state: GameState, now: Instant) {
        self.started_at.get_or_insert(now);
        self.ended_at = Some(now);
        self.state = state;
        log::debug!(
            "Session ended: {} after {}s",
            state.name(),
            self.elapsed_secs_at(now)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;

    fn session_with_layout(mines: &[Coord2]) -> Session {
        let layout = MineLayout::from_mine_coords((9, 9), mines).unwrap();
        Session {
            board: Board::from_layout(&layout).unwrap(),
            ..Session::new(Difficulty::Beginner, 0)
        }
    }

    /// Beginner layout: mines along the bottom row and three walling off the safe (0, 8) pocket,
    /// so a reveal at (0, 0) opens everything except that pocket.
    const MINES: [Coord2; 10] = [
        (8, 0),
        (8, 1),
        (8, 2),
        (8, 3),
        (8, 4),
        (8, 5),
        (8, 6),
        (0, 7),
        (1, 7),
        (1, 8),
    ];

    #[test]
    fn starts_idle() {
        let session = Session::new(Difficulty::Expert, 5);

        assert_eq!(session.state(), GameState::Idle);
        assert_eq!(session.elapsed_secs(), 0);
        assert_eq!(session.mine_counter_display(), 99);
        assert_eq!(session.board().size(), (16, 30));
    }

    #[test]
    fn first_reveal_starts_playing() {
        let mut session = Session::new(Difficulty::Beginner, 9);

        let outcome = session.reveal((4, 4)).unwrap();

        assert_ne!(outcome, RevealOutcome::Lost);
        assert!(matches!(session.state(), GameState::Playing | GameState::Won));
    }

    #[test]
    fn flagging_starts_playing_without_placing_mines() {
        let mut session = Session::new(Difficulty::Beginner, 9);

        assert_eq!(session.toggle_flag((0, 0)).unwrap(), 1);
        assert_eq!(session.state(), GameState::Playing);
        assert_eq!(session.flag_count(), 1);
        assert_eq!(session.mine_counter_display(), 9);
        assert!(!session.board().mines_placed());
    }

    #[test]
    fn rejected_reveal_keeps_idle() {
        let mut session = session_with_layout(&MINES);
        session.board.toggle_flag((0, 0)).unwrap();

        assert_eq!(session.reveal((0, 0)).unwrap(), RevealOutcome::Continue);
        assert_eq!(session.state(), GameState::Idle);
    }

    #[test]
    fn losing_freezes_timer() {
        let mut session = session_with_layout(&MINES);
        let t0 = Instant::now();

        session.reveal_at((0, 0), t0).unwrap();
        assert_eq!(session.state(), GameState::Playing);
        assert_eq!(
            session.reveal_at((0, 7), t0 + Duration::from_secs(12)).unwrap(),
            RevealOutcome::Lost
        );

        assert_eq!(session.state(), GameState::Lost);
        assert_eq!(session.elapsed_secs_at(t0 + Duration::from_secs(500)), 12);
        assert_eq!(session.toggle_flag((3, 3)).unwrap(), 0);
        assert_eq!(session.reveal((3, 3)).unwrap(), RevealOutcome::Continue);
    }

    #[test]
    fn losing_keeps_flag_counter() {
        let mut session = session_with_layout(&MINES);
        session.toggle_flag((8, 0)).unwrap();
        session.toggle_flag((0, 8)).unwrap();
        session.reveal((0, 0)).unwrap();

        assert_eq!(session.reveal((0, 7)).unwrap(), RevealOutcome::Lost);
        assert_eq!(session.board().flagged_count(), 1);
        assert_eq!(session.board().view_at((0, 8)).unwrap(), CellView::WrongFlag);
        assert_eq!(session.flag_count(), 2);
        assert_eq!(session.mine_counter_display(), 8);
    }

    #[test]
    fn winning_sets_flag_counter_to_mine_count() {
        let mut session = session_with_layout(&MINES);
        session.toggle_flag((8, 0)).unwrap();
        session.toggle_flag((7, 7)).unwrap();
        session.toggle_flag((7, 7)).unwrap();

        let mut outcome = RevealOutcome::Continue;
        for row in 0..9 {
            for col in 0..9 {
                if !MINES.contains(&(row, col)) && !outcome.is_final() {
                    outcome = session.reveal((row, col)).unwrap();
                }
            }
        }

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(session.state(), GameState::Won);
        assert_eq!(session.flag_count(), 10);
        assert_eq!(session.mine_counter_display(), 0);
    }

    #[test]
    fn timer_display_caps_at_999() {
        let mut session = session_with_layout(&MINES);
        let t0 = Instant::now();
        session.reveal_at((0, 0), t0).unwrap();

        assert_eq!(session.elapsed_secs_at(t0 + Duration::from_secs(61)), 61);
        session.ended_at = Some(t0 + Duration::from_secs(5000));
        assert_eq!(session.timer_display(), DISPLAY_MAX);
    }

    #[test]
    fn mine_counter_never_goes_negative() {
        let mut session = Session::new(Difficulty::Beginner, 1);
        for col in 0..9 {
            session.toggle_flag((0, col)).unwrap();
            session.toggle_flag((1, col)).unwrap();
        }

        assert_eq!(session.flag_count(), 18);
        assert_eq!(session.mine_counter_display(), 0);
    }

    #[test]
    fn reset_and_difficulty_change_start_fresh() {
        let mut session = Session::new(Difficulty::Beginner, 1);
        session.reveal((0, 0)).unwrap();
        session.toggle_flag((8, 8)).unwrap();

        session.reset(2);
        assert_eq!(session.state(), GameState::Idle);
        assert_eq!(session.flag_count(), 0);
        assert_eq!(session.elapsed_secs(), 0);
        assert!(!session.board().mines_placed());
        assert_eq!(session.difficulty(), Difficulty::Beginner);

        session.change_difficulty(Difficulty::Intermediate, 3);
        assert_eq!(session.difficulty(), Difficulty::Intermediate);
        assert_eq!(session.board().size(), (16, 16));
        assert_eq!(session.mine_counter_display(), 40);
    }
}
