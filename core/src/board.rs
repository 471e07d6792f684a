use alloc::collections::VecDeque;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Cells kept clear around the first reveal: the cell itself plus its eight neighbours.
pub const SAFE_ZONE_CELLS: CellCount = 9;

/// Board dimensions and mine count. Only built through [`BoardConfig::new`] (or deserialized
/// through the same checks), so every config leaves room for a safe first reveal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoardConfig")]
pub struct BoardConfig {
    /// `(height, width)`
    size: Coord2,
    mines: CellCount,
}

#[derive(Deserialize)]
struct RawBoardConfig {
    size: Coord2,
    mines: CellCount,
}

impl TryFrom<RawBoardConfig> for BoardConfig {
    type Error = GameError;

    fn try_from(raw: RawBoardConfig) -> Result<Self> {
        Self::new(raw.size, raw.mines)
    }
}

impl BoardConfig {
    pub(crate) const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Validates that the board exists, has mines, and leaves room for a safe first reveal.
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::EmptyBoard);
        }
        if mines == 0 {
            return Err(GameError::NoMines);
        }
        let total_cells = mult(size.0, size.1);
        if mines > total_cells.saturating_sub(SAFE_ZONE_CELLS) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked(size, mines))
    }

    /// `(height, width)`
    pub const fn size(&self) -> Coord2 {
        self.size
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn height(&self) -> Coord {
        self.size.0
    }

    pub const fn width(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

/// Grid of cells. Mines are placed lazily on the first reveal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
    generated: bool,
}

impl Board {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            cells: Array2::default(config.size().to_nd_index()),
            mine_count: config.mines(),
            generated: false,
        }
    }

    /// Builds an already generated board from explicit mine positions.
    pub fn with_mines(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::EmptyBoard);
        }

        let mut cells: Array2<Cell> = Array2::default(size.to_nd_index());
        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            cells[coords.to_nd_index()].is_mine = true;
        }

        let mine_count = cells
            .iter()
            .filter(|cell| cell.is_mine)
            .count()
            .try_into()
            .map_err(|_| GameError::TooManyMines)?;

        let mut board = Self {
            cells,
            mine_count,
            generated: true,
        };
        board.compute_adjacency();
        Ok(board)
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        // dimensions come from a Coord2 in both constructors
        (rows as Coord, cols as Coord)
    }

    pub fn height(&self) -> Coord {
        self.size().0
    }

    pub fn width(&self) -> Coord {
        self.size().1
    }

    pub fn config(&self) -> BoardConfig {
        BoardConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.height(), self.width())
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        let (rows, cols) = self.size();
        coords.0 < rows && coords.1 < cols
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    pub fn count_adjacent_mines(&self, coords: Coord2) -> u8 {
        let count = self
            .iter_neighbors(coords)
            .filter(|&pos| self[pos].is_mine)
            .count();
        // at most eight neighbours
        count as u8
    }

    /// Iterates over every position in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (rows, cols) = self.size();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }

    /// Places all mines away from `exclude` and its neighbours, then fills in adjacency counts.
    ///
    /// Candidates come from `placer` and are rejected until they land on a free cell outside the
    /// safe zone. The board config guarantees enough room, so this terminates. Runs only once;
    /// later calls are ignored.
    pub fn generate(&mut self, exclude: Coord2, mut placer: impl MinePlacer) {
        if self.generated {
            log::warn!("Board already generated, ignoring request around {:?}", exclude);
            return;
        }
        debug_assert!(
            self.mine_count <= self.total_cells().saturating_sub(SAFE_ZONE_CELLS),
            "mine count leaves no room for a safe first reveal"
        );

        let size = self.size();
        let mut mines_placed: CellCount = 0;
        let mut rejected: u32 = 0;

        while mines_placed < self.mine_count {
            let candidate = placer.next_candidate(size);
            let cell = &mut self.cells[candidate.to_nd_index()];

            if cell.is_mine || is_adjacent_or_same(candidate, exclude) {
                log::trace!("Rejected mine candidate {:?}", candidate);
                rejected += 1;
                continue;
            }

            cell.is_mine = true;
            mines_placed += 1;
        }

        self.compute_adjacency();
        self.generated = true;
        log::debug!(
            "Generated {:?} board with {} mines around {:?}, {} candidates rejected",
            size,
            mines_placed,
            exclude,
            rejected
        );
    }

    fn compute_adjacency(&mut self) {
        for coords in self.coords() {
            if !self[coords].is_mine {
                let count = self.count_adjacent_mines(coords);
                self.cells[coords.to_nd_index()].adjacent_mine_count = count;
            }
        }
    }

    /// Reveals a cell and, if it is blank, everything reachable through blank cells.
    ///
    /// Flagged, revealed and out-of-range cells are left alone. Mines and numbered cells are revealed
    /// but stop the spread. Returns how many cells this call uncovered.
    pub fn reveal(&mut self, coords: Coord2) -> CellCount {
        let mut revealed: CellCount = 0;
        let mut to_visit = VecDeque::from([coords]);

        while let Some(visit_coords) = to_visit.pop_front() {
            let Some(cell) = self.cells.get_mut(visit_coords.to_nd_index()) else {
                continue;
            };
            if cell.is_revealed || cell.is_flagged {
                continue;
            }

            cell.uncover();
            revealed += 1;
            let cell = *cell;
            log::trace!(
                "Revealed cell at {:?}, mine: {}, count: {}",
                visit_coords,
                cell.is_mine,
                cell.adjacent_mine_count
            );

            if cell.is_blank() {
                to_visit.extend(
                    self.iter_neighbors(visit_coords)
                        .filter(|&pos| self[pos].is_covered() && !self[pos].is_flagged),
                );
            }
        }

        if revealed > 1 {
            log::debug!("Flood fill from {:?} revealed {} cells", coords, revealed);
        }
        revealed
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> FlagOutcome {
        let Some(cell) = self.cells.get_mut(coords.to_nd_index()) else {
            return FlagOutcome::NoChange;
        };
        if cell.is_revealed {
            return FlagOutcome::NoChange;
        }

        cell.is_flagged = !cell.is_flagged;
        if cell.is_flagged {
            FlagOutcome::Flagged
        } else {
            FlagOutcome::Unflagged
        }
    }

    /// Shows unflagged mines and wrong flags. Correct flags and other covered cells stay covered.
    ///
    /// Wrong flags keep their flag so they can be drawn as mistakes.
    pub fn reveal_for_loss(&mut self) {
        for cell in self.cells.iter_mut() {
            if (cell.is_mine && !cell.is_flagged) || cell.is_wrong_flag() {
                cell.is_revealed = true;
            }
        }
    }

    /// Flags every mine without revealing anything. Returns the number of mines.
    pub fn flag_all_mines(&mut self) -> CellCount {
        for cell in self.cells.iter_mut().filter(|cell| cell.is_mine) {
            cell.is_flagged = true;
        }
        self.mine_count
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// Proposes a fixed list of cells in order, for deterministic layouts.
    struct Scripted(Vec<Coord2>);

    impl MinePlacer for Scripted {
        fn next_candidate(&mut self, _size: Coord2) -> Coord2 {
            self.0.remove(0)
        }
    }

    fn brute_force_count(board: &Board, (row, col): Coord2) -> u8 {
        let mut count = 0;
        for r in row.saturating_sub(1)..=row.saturating_add(1) {
            for c in col.saturating_sub(1)..=col.saturating_add(1) {
                if (r, c) != (row, col) && board.contains((r, c)) && board[(r, c)].is_mine {
                    count += 1;
                }
            }
        }
        count
    }

    fn revealed_cells(board: &Board) -> Vec<Coord2> {
        board.coords().filter(|&pos| board[pos].is_revealed).collect()
    }

    #[test]
    fn config_validation() {
        assert_eq!(BoardConfig::new((0, 9), 10), Err(GameError::EmptyBoard));
        assert_eq!(BoardConfig::new((9, 9), 0), Err(GameError::NoMines));
        assert_eq!(BoardConfig::new((9, 9), 73), Err(GameError::TooManyMines));
        assert_eq!(BoardConfig::new((3, 3), 1), Err(GameError::TooManyMines));
        assert!(BoardConfig::new((9, 9), 72).is_ok());
        assert!(BoardConfig::new((9, 9), 10).is_ok());
    }

    #[test]
    fn unvalidated_configs_are_rejected() {
        let cramped = RawBoardConfig {
            size: (3, 3),
            mines: 1,
        };
        let empty = RawBoardConfig {
            size: (0, 4),
            mines: 1,
        };

        assert_eq!(BoardConfig::try_from(cramped), Err(GameError::TooManyMines));
        assert_eq!(BoardConfig::try_from(empty), Err(GameError::EmptyBoard));

        let config = BoardConfig::new((16, 30), 99).unwrap();
        assert_eq!((config.size(), config.mines()), ((16, 30), 99));
        assert_eq!(Board::new(config).config(), config);
    }

    #[test]
    fn new_board_is_blank() {
        let board = Board::new(BoardConfig::new((9, 9), 10).unwrap());

        assert!(!board.is_generated());
        assert_eq!(board.mine_count(), 10);
        assert!(board.coords().all(|pos| board[pos] == Cell::default()));
    }

    #[test]
    fn generation_places_exact_count_outside_safe_zone() {
        let config = BoardConfig::new((16, 30), 99).unwrap();

        for seed in 0..200 {
            let mut board = Board::new(config);
            let start = ((seed % 16) as Coord, (seed % 30) as Coord);
            board.generate(start, RandomPlacer::new(seed));

            let mines = board.coords().filter(|&pos| board[pos].is_mine).count();
            assert_eq!(mines, 99, "seed {seed}");
            assert!(board.is_generated());
            for pos in board.coords().filter(|&pos| is_adjacent_or_same(pos, start)) {
                assert!(!board[pos].is_mine, "seed {seed} mine at {pos:?}");
            }
        }
    }

    #[test]
    fn adjacency_matches_brute_force() {
        let config = BoardConfig::new((16, 16), 40).unwrap();

        for seed in 0..50 {
            let mut board = Board::new(config);
            board.generate((0, 0), RandomPlacer::new(seed));

            for pos in board.coords().filter(|&pos| !board[pos].is_mine) {
                assert_eq!(board[pos].adjacent_mine_count, brute_force_count(&board, pos));
            }
        }
    }

    #[test]
    fn beginner_first_reveal_center_is_clear() {
        let mut board = Board::new(BoardConfig::new((9, 9), 10).unwrap());

        board.generate((4, 4), RandomPlacer::new(1234));

        for row in 3..=5 {
            for col in 3..=5 {
                assert!(!board[(row, col)].is_mine);
            }
        }
        assert_eq!(board[(4, 4)].adjacent_mine_count, 0);
    }

    #[test]
    fn generation_rejects_mines_and_safe_zone() {
        let mut board = Board::new(BoardConfig::new((5, 5), 2).unwrap());
        let placer = Scripted(Vec::from([(0, 0), (1, 1), (0, 0), (4, 4), (0, 4)]));

        board.generate((1, 1), placer);

        let mines: Vec<_> = board.coords().filter(|&pos| board[pos].is_mine).collect();
        assert_eq!(mines, [(0, 4), (4, 4)]);
    }

    #[test]
    fn second_generate_is_ignored() {
        let mut board = Board::new(BoardConfig::new((9, 9), 10).unwrap());
        board.generate((4, 4), RandomPlacer::new(9));
        let before = board.clone();

        board.generate((0, 0), RandomPlacer::new(10));

        assert_eq!(board, before);
    }

    #[test]
    fn with_mines_rejects_out_of_range() {
        assert_eq!(
            Board::with_mines((3, 3), &[(3, 0)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn corner_mine_flood_fill_reveals_all_safe_cells() {
        let mut board = Board::with_mines((3, 3), &[(0, 0)]).unwrap();

        let delta = board.reveal((2, 2));

        assert_eq!(delta, 8);
        assert!(!board[(0, 0)].is_revealed);
        assert_eq!(revealed_cells(&board).len(), 8);
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut board = Board::with_mines((3, 3), &[(0, 0)]).unwrap();
        board.reveal((2, 2));
        let before = board.clone();

        assert_eq!(board.reveal((2, 2)), 0);
        assert_eq!(board.reveal((1, 1)), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn reveal_out_of_range_is_noop() {
        let mut board = Board::with_mines((3, 3), &[(0, 0)]).unwrap();

        assert_eq!(board.reveal((3, 0)), 0);
        assert_eq!(board.reveal((0, 9)), 0);
        assert!(revealed_cells(&board).is_empty());
    }

    #[test]
    fn reveal_skips_flagged_cell() {
        let mut board = Board::with_mines((3, 3), &[(0, 0)]).unwrap();
        board.toggle_flag((2, 2));

        assert_eq!(board.reveal((2, 2)), 0);
        assert!(board[(2, 2)].is_flagged);
        assert!(!board[(2, 2)].is_revealed);
    }

    #[test]
    fn flood_fill_routes_around_flags() {
        let mut board = Board::with_mines((3, 3), &[(0, 0)]).unwrap();
        board.toggle_flag((2, 1));

        let delta = board.reveal((2, 2));

        // the flag cuts off the blank cell at (2, 0) and the number above it
        assert_eq!(delta, 5);
        assert!(board[(2, 1)].is_flagged);
        assert!(!board[(2, 1)].is_revealed);
        assert!(!board[(2, 0)].is_revealed);
        assert!(!board[(1, 0)].is_revealed);
    }

    #[test]
    fn numbered_cell_does_not_spread() {
        let mut board = Board::with_mines((3, 3), &[(0, 0)]).unwrap();

        assert_eq!(board.reveal((1, 1)), 1);
        assert_eq!(revealed_cells(&board), [(1, 1)]);
    }

    #[test]
    fn revealing_a_mine_counts_one() {
        let mut board = Board::with_mines((3, 3), &[(0, 0)]).unwrap();

        assert_eq!(board.reveal((0, 0)), 1);
        assert_eq!(revealed_cells(&board), [(0, 0)]);
    }

    #[test]
    fn flood_fill_stops_at_one_ring_of_numbers() {
        // column 2 is a wall of mines splitting the board
        let mines = [(0, 2), (1, 2), (2, 2), (3, 2), (4, 2)];
        let mut board = Board::with_mines((5, 5), &mines).unwrap();

        let delta = board.reveal((2, 0));

        assert_eq!(delta, 10);
        for row in 0..5 {
            assert!(board[(row, 0)].is_revealed);
            assert!(board[(row, 1)].is_revealed);
            assert!(board[(row, 1)].adjacent_mine_count > 0);
            assert!(!board[(row, 2)].is_revealed);
            assert!(!board[(row, 3)].is_revealed);
            assert!(!board[(row, 4)].is_revealed);
        }
    }

    #[test]
    fn flood_fill_region_is_closed_under_blank_neighbors() {
        let config = BoardConfig::new((16, 30), 99).unwrap();

        for seed in 0..50 {
            let mut board = Board::new(config);
            board.generate((8, 15), RandomPlacer::new(seed));
            board.reveal((8, 15));

            for pos in revealed_cells(&board) {
                assert!(!board[pos].is_mine);
                if board[pos].is_blank() {
                    assert!(board.iter_neighbors(pos).all(|n| board[n].is_revealed));
                } else {
                    // every numbered cell touches a revealed blank cell or is the start
                    assert!(
                        pos == (8, 15)
                            || board
                                .iter_neighbors(pos)
                                .any(|n| board[n].is_revealed && board[n].is_blank())
                    );
                }
            }
        }
    }

    #[test]
    fn flag_toggle_round_trip() {
        let mut board = Board::with_mines((3, 3), &[(0, 0)]).unwrap();

        assert_eq!(board.toggle_flag((1, 1)), FlagOutcome::Flagged);
        assert_eq!(board.toggle_flag((1, 1)), FlagOutcome::Unflagged);
        assert!(!board[(1, 1)].is_flagged);
    }

    #[test]
    fn cannot_flag_revealed_cell() {
        let mut board = Board::with_mines((3, 3), &[(0, 0)]).unwrap();
        board.reveal((1, 1));

        assert_eq!(board.toggle_flag((1, 1)), FlagOutcome::NoChange);
        assert!(!board[(1, 1)].is_flagged);
    }

    #[test]
    fn loss_reveal_shows_mistakes_only() {
        let mines = [(0, 0), (0, 2), (2, 2)];
        let mut board = Board::with_mines((4, 4), &mines).unwrap();
        board.toggle_flag((0, 0)); // correct
        board.toggle_flag((3, 0)); // wrong
        let before = board.clone();

        board.reveal_for_loss();

        assert!(!board[(0, 0)].is_revealed);
        assert!(board[(0, 2)].is_revealed);
        assert!(board[(2, 2)].is_revealed);
        assert!(board[(3, 0)].is_revealed);
        assert!(board[(3, 0)].is_flagged);
        let changed: Vec<_> = board
            .coords()
            .filter(|&pos| board[pos].is_revealed != before[pos].is_revealed)
            .collect();
        assert_eq!(changed, [(0, 2), (2, 2), (3, 0)]);
    }

    #[test]
    fn win_flags_mines_without_revealing() {
        let mut board = Board::with_mines((3, 3), &[(0, 0), (2, 2)]).unwrap();

        assert_eq!(board.flag_all_mines(), 2);
        assert!(board[(0, 0)].is_flagged && !board[(0, 0)].is_revealed);
        assert!(board[(2, 2)].is_flagged && !board[(2, 2)].is_revealed);
        assert!(revealed_cells(&board).is_empty());
    }
}
