//! Draws the menu and the board. Reads session state only.

use std::io::Write;

use anyhow::Result;
use calcsweeper_core::{Cell, Coord2, Difficulty, GameSession, GameStatus, Millis};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType},
};

const TITLE: &str = "MINESWEEPER";
const MENU_HINT: &str = "Enter: select   Esc: quit";
const GAME_HINT: &str = "Arrows/hjkl: move   Space: reveal   f: flag   Esc: quit";

/// Number colours, same order as the calculator palette: blue, green, red, navy, maroon, teal,
/// black, grey.
const NUMBER_COLORS: [Color; 8] = [
    Color::Blue,
    Color::DarkGreen,
    Color::Red,
    Color::DarkBlue,
    Color::DarkRed,
    Color::DarkCyan,
    Color::Black,
    Color::DarkGrey,
];

/// Glyph and colour for one square.
///
/// Covered squares show `#`, or `F` when flagged. After a loss, mines show `*` and wrong flags
/// show `X`, which are the only revealed squares that still carry a flag.
pub fn cell_glyph(cell: Cell) -> (char, Color) {
    match cell {
        Cell {
            is_revealed: false,
            is_flagged: true,
            ..
        } => ('F', Color::Red),
        Cell {
            is_revealed: false,
            ..
        } => ('#', Color::DarkGrey),
        Cell {
            is_flagged: true, ..
        } => ('X', Color::Black),
        Cell { is_mine: true, .. } => ('*', Color::Red),
        Cell {
            adjacent_mine_count: 0,
            ..
        } => (' ', Color::Reset),
        Cell {
            adjacent_mine_count: count,
            ..
        } => {
            let index = usize::from(count.clamp(1, 8) - 1);
            (char::from(b'0' + count.min(8)), NUMBER_COLORS[index])
        }
    }
}

/// Remaining-mine counter and timer, both three digits wide like the calculator scoreboard.
pub fn scoreboard(mines_left: isize, elapsed_secs: u16) -> String {
    format!("{:>3}  {:>3}", mines_left.clamp(-99, 999), elapsed_secs)
}

pub fn status_line(session: &GameSession) -> &'static str {
    match session.status() {
        GameStatus::InProgress => GAME_HINT,
        GameStatus::Won => "You win! Enter: menu   Esc: quit",
        GameStatus::Lost => "Boom. Enter: menu   Esc: quit",
    }
}

pub fn draw_menu(out: &mut impl Write, selected: Difficulty) -> Result<()> {
    queue!(
        out,
        Clear(ClearType::All),
        MoveTo(2, 1),
        PrintStyledContent(TITLE.red().bold())
    )?;

    for (row, difficulty) in (3..).zip(Difficulty::ALL) {
        let config = difficulty.config();
        let line = format!(
            "{:<13}{:>2}x{:<2} {:>2} mines",
            difficulty.label(),
            config.width(),
            config.height(),
            config.mines()
        );
        queue!(out, MoveTo(2, row))?;
        if difficulty == selected {
            queue!(out, PrintStyledContent(format!("> {line}").red()))?;
        } else {
            queue!(out, Print(format!("  {line}")))?;
        }
    }

    queue!(out, MoveTo(2, 7), Print(MENU_HINT))?;
    out.flush()?;
    Ok(())
}

pub fn draw_game(out: &mut impl Write, session: &GameSession, now: Millis) -> Result<()> {
    let (rows, cols) = session.size();
    queue!(
        out,
        Clear(ClearType::All),
        MoveTo(2, 0),
        PrintStyledContent(scoreboard(session.mines_left(), session.elapsed_secs(now)).bold())
    )?;

    for row in 0..rows {
        queue!(out, MoveTo(2, u16::from(row) + 2))?;
        for col in 0..cols {
            let coords: Coord2 = (row, col);
            let Some(cell) = session.cell_at(coords) else {
                continue;
            };
            let (glyph, color) = cell_glyph(cell);
            let mut styled = format!("{glyph} ").with(color);
            if session.triggered_mine() == Some(coords) {
                styled = styled.on(Color::Red);
            }
            if session.cursor() == coords {
                styled = styled.attribute(Attribute::Reverse);
            }
            queue!(out, PrintStyledContent(styled))?;
        }
    }

    queue!(out, MoveTo(2, u16::from(rows) + 3), Print(status_line(session)))?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calcsweeper_core::{Action, Board};

    /// Drops CSI escape sequences so only printed text is left.
    fn strip_escapes(text: &str) -> String {
        let mut plain = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c != '\x1b' {
                plain.push(c);
                continue;
            }
            if chars.next() == Some('[') {
                for c in chars.by_ref() {
                    if ('@'..='~').contains(&c) {
                        break;
                    }
                }
            }
        }
        plain
    }

    #[test]
    fn glyphs_follow_cell_state() {
        let covered = Cell::default();
        let flagged = Cell {
            is_flagged: true,
            ..Cell::default()
        };
        let blank = Cell {
            is_revealed: true,
            ..Cell::default()
        };
        let three = Cell {
            is_revealed: true,
            adjacent_mine_count: 3,
            ..Cell::default()
        };
        let mine = Cell {
            is_revealed: true,
            is_mine: true,
            ..Cell::default()
        };
        let wrong_flag = Cell {
            is_revealed: true,
            is_flagged: true,
            ..Cell::default()
        };

        assert_eq!(cell_glyph(covered).0, '#');
        assert_eq!(cell_glyph(flagged).0, 'F');
        assert_eq!(cell_glyph(blank).0, ' ');
        assert_eq!(cell_glyph(three), ('3', Color::Red));
        assert_eq!(cell_glyph(mine).0, '*');
        assert_eq!(cell_glyph(wrong_flag).0, 'X');
    }

    #[test]
    fn scoreboard_pads_to_three_digits() {
        assert_eq!(scoreboard(10, 0), " 10    0");
        assert_eq!(scoreboard(-2, 999), " -2  999");
    }

    #[test]
    fn draws_board_without_mutating_session() {
        let board = Board::with_mines((3, 3), &[(0, 0)]).unwrap();
        let mut session = GameSession::from_board(board, 0);
        session.apply(Action::Reveal, 0).unwrap();
        let before = session.clone();
        let mut out = Vec::new();

        draw_game(&mut out, &session, 5_000).unwrap();

        assert_eq!(session, before);
        assert_eq!(
            cell_glyph(session.cell_at((1, 1)).unwrap()),
            ('1', Color::Blue)
        );
        let text = strip_escapes(&String::from_utf8_lossy(&out));
        assert!(text.starts_with("  1    5"));
        assert!(text.contains("# # # # 1 # # # # "));
        assert!(text.ends_with(GAME_HINT));
    }

    #[test]
    fn menu_marks_selection() {
        let mut out = Vec::new();

        draw_menu(&mut out, Difficulty::Expert).unwrap();

        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("> Expert"));
        assert!(text.contains("  Beginner"));
    }
}
