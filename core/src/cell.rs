use serde::{Deserialize, Serialize};

/// State of a single square.
///
/// `adjacent_mine_count` is meaningless for mines and only set once the board is generated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub is_mine: bool,
    pub is_revealed: bool,
    pub is_flagged: bool,
    pub adjacent_mine_count: u8,
}

impl Cell {
    pub const fn is_covered(self) -> bool {
        !self.is_revealed
    }

    /// Non-mine without mine neighbours; flood fill spreads from these.
    pub const fn is_blank(self) -> bool {
        !self.is_mine && self.adjacent_mine_count == 0
    }

    /// Flag that does not sit on a mine; only meaningful once the board is generated.
    pub const fn is_wrong_flag(self) -> bool {
        self.is_flagged && !self.is_mine
    }

    pub(crate) fn uncover(&mut self) {
        self.is_revealed = true;
        self.is_flagged = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncover_clears_flag() {
        let mut cell = Cell {
            is_flagged: true,
            ..Cell::default()
        };

        cell.uncover();

        assert!(cell.is_revealed);
        assert!(!cell.is_flagged);
    }

    #[test]
    fn mines_are_never_blank() {
        let mine = Cell {
            is_mine: true,
            ..Cell::default()
        };

        assert!(!mine.is_blank());
        assert!(Cell::default().is_blank());
    }
}
