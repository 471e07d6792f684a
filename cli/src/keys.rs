//! Keyboard bindings for the menu and the board.

use calcsweeper_core::{Action, Direction};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuKey {
    Previous,
    Next,
    Select,
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameKey {
    Play(Action),
    /// Leave a finished game for the menu.
    Continue,
    Quit,
}

/// Only presses count; repeats and releases are dropped so every action fires once per press.
fn is_press(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
}

fn is_quit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Esc | KeyCode::Char('q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn direction(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('h') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('l') => Some(Direction::Right),
        _ => None,
    }
}

pub fn menu_key(key: KeyEvent) -> Option<MenuKey> {
    if !is_press(&key) {
        return None;
    }
    if is_quit(&key) {
        return Some(MenuKey::Quit);
    }
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => Some(MenuKey::Select),
        code => match direction(code)? {
            Direction::Up => Some(MenuKey::Previous),
            Direction::Down => Some(MenuKey::Next),
            Direction::Left | Direction::Right => None,
        },
    }
}

pub fn game_key(key: KeyEvent, finished: bool) -> Option<GameKey> {
    if !is_press(&key) {
        return None;
    }
    if is_quit(&key) {
        return Some(GameKey::Quit);
    }
    if let Some(direction) = direction(key.code) {
        return Some(GameKey::Play(Action::Move(direction)));
    }
    match key.code {
        KeyCode::Enter if finished => Some(GameKey::Continue),
        KeyCode::Char(' ') | KeyCode::Enter => Some(GameKey::Play(Action::Reveal)),
        KeyCode::Char('f') => Some(GameKey::Play(Action::ToggleFlag)),
        _ => None,
    }
}
