use serde::{Deserialize, Serialize};

use crate::*;

/// Highest value the timer shows; it stops counting there.
pub const TIMER_CAP_SECS: u16 = 999;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Intermediate, Self::Expert];

    pub const fn config(self) -> BoardConfig {
        match self {
            Self::Beginner => BoardConfig::new_unchecked((9, 9), 10),
            Self::Intermediate => BoardConfig::new_unchecked((16, 16), 40),
            Self::Expert => BoardConfig::new_unchecked((16, 30), 99),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Expert => "Expert",
        }
    }

    /// Next preset in menu order, wrapping to the first.
    pub const fn next(self) -> Self {
        match self {
            Self::Beginner => Self::Intermediate,
            Self::Intermediate => Self::Expert,
            Self::Expert => Self::Beginner,
        }
    }

    /// Previous preset in menu order, wrapping to the last.
    pub const fn prev(self) -> Self {
        match self {
            Self::Beginner => Self::Expert,
            Self::Intermediate => Self::Beginner,
            Self::Expert => Self::Intermediate,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Beginner
    }
}

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::InProgress
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    NoChange,
    Moved,
    Flagged,
    Unflagged,
    Revealed(CellCount),
    Won,
    Lost,
}

impl ActionOutcome {
    pub const fn has_update(self) -> bool {
        use ActionOutcome::*;
        match self {
            NoChange => false,
            Moved | Flagged | Unflagged | Revealed(_) | Won | Lost => true,
        }
    }
}

/// One round of play: the board, the cursor, the counters and the timer.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSession {
    board: Board,
    cursor: Coord2,
    flags_placed: CellCount,
    revealed_count: CellCount,
    status: GameStatus,
    triggered_mine: Option<Coord2>,
    started_at: Option<Millis>,
    ended_at: Option<Millis>,
    placer: RandomPlacer,
}

impl GameSession {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        log::debug!("New {} session, seed: {}", difficulty.label(), seed);
        Self::from_board(Board::new(difficulty.config()), seed)
    }

    /// Starts a session on an existing board, generated or not. `seed` is used if the board still
    /// needs mines.
    ///
    /// Cells already revealed or flagged on `board` count toward the session counters.
    pub fn from_board(board: Board, seed: u64) -> Self {
        let (rows, cols) = board.size();
        let (mut revealed_count, mut flags_placed): (CellCount, CellCount) = (0, 0);
        for coords in board.coords() {
            let cell = board[coords];
            if cell.is_revealed {
                revealed_count += 1;
            } else if cell.is_flagged {
                flags_placed += 1;
            }
        }
        Self {
            board,
            cursor: (rows / 2, cols / 2),
            flags_placed,
            revealed_count,
            status: GameStatus::default(),
            triggered_mine: None,
            started_at: None,
            ended_at: None,
            placer: RandomPlacer::new(seed),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.board.cell_at(coords)
    }

    pub fn cursor(&self) -> Coord2 {
        self.cursor
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn flags_placed(&self) -> CellCount {
        self.flags_placed
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Preset this board was built from, if any.
    pub fn difficulty(&self) -> Option<Difficulty> {
        let config = self.board.config();
        Difficulty::ALL
            .into_iter()
            .find(|difficulty| difficulty.config() == config)
    }

    pub fn seed(&self) -> u64 {
        self.placer.seed()
    }

    /// How many mines have not been flagged yet; negative when the player over-flags.
    pub fn mines_left(&self) -> isize {
        (self.board.mine_count() as isize) - (self.flags_placed as isize)
    }

    /// Whole seconds since the first successful reveal, frozen once the game ends.
    pub fn elapsed_secs(&self, now: Millis) -> u16 {
        let Some(started_at) = self.started_at else {
            return 0;
        };
        let secs = self.ended_at.unwrap_or(now).saturating_sub(started_at) / 1000;
        secs.min(TIMER_CAP_SECS.into()) as u16
    }

    pub fn apply(&mut self, action: Action, now: Millis) -> Result<ActionOutcome> {
        match action {
            Action::Move(direction) => Ok(self.move_cursor(direction)),
            Action::ToggleFlag => self.toggle_flag(),
            Action::Reveal => self.reveal(now),
        }
    }

    pub fn move_cursor(&mut self, direction: Direction) -> ActionOutcome {
        let next = direction.step_clamped(self.cursor, self.board.size());
        if next == self.cursor {
            return ActionOutcome::NoChange;
        }
        self.cursor = next;
        ActionOutcome::Moved
    }

    pub fn toggle_flag(&mut self) -> Result<ActionOutcome> {
        self.check_not_finished()?;

        Ok(match self.board.toggle_flag(self.cursor) {
            FlagOutcome::NoChange => ActionOutcome::NoChange,
            FlagOutcome::Flagged => {
                self.flags_placed += 1;
                ActionOutcome::Flagged
            }
            FlagOutcome::Unflagged => {
                self.flags_placed -= 1;
                ActionOutcome::Unflagged
            }
        })
    }

    pub fn reveal(&mut self, now: Millis) -> Result<ActionOutcome> {
        self.check_not_finished()?;

        let coords = self.cursor;
        let Some(cell) = self.board.cell_at(coords) else {
            return Ok(ActionOutcome::NoChange);
        };
        if cell.is_flagged {
            return Ok(ActionOutcome::NoChange);
        }

        if cell.is_mine {
            self.triggered_mine = Some(coords);
            self.board.reveal_for_loss();
            self.end_game(GameStatus::Lost, now);
            return Ok(ActionOutcome::Lost);
        }

        if !self.board.is_generated() {
            self.board.generate(coords, &mut self.placer);
        }

        let delta = self.board.reveal(coords);
        if delta == 0 {
            return Ok(ActionOutcome::NoChange);
        }
        self.revealed_count += delta;
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }

        if self.revealed_count == self.board.safe_cell_count() {
            self.flags_placed = self.board.flag_all_mines();
            self.end_game(GameStatus::Won, now);
            return Ok(ActionOutcome::Won);
        }

        Ok(ActionOutcome::Revealed(delta))
    }

    fn end_game(&mut self, status: GameStatus, now: Millis) {
        if self.status.is_finished() {
            return;
        }
        self.status = status;
        self.ended_at = Some(now);
        log::debug!(
            "Game ended {:?} after {} revealed cells, {}s",
            status,
            self.revealed_count,
            self.elapsed_secs(now)
        );
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.status.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
