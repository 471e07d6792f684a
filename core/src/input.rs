use alloc::vec::Vec;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::Direction;

/// Player action, already edge-triggered: one per key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Move(Direction),
    ToggleFlag,
    Reveal,
}

bitflags! {
    /// Snapshot of the game keys held down during one poll of a keypad.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct RawKeys: u8 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const FLAG = 1 << 4;
        const REVEAL = 1 << 5;
    }
}

const KEY_ACTIONS: [(RawKeys, Action); 6] = [
    (RawKeys::UP, Action::Move(Direction::Up)),
    (RawKeys::DOWN, Action::Move(Direction::Down)),
    (RawKeys::LEFT, Action::Move(Direction::Left)),
    (RawKeys::RIGHT, Action::Move(Direction::Right)),
    (RawKeys::FLAG, Action::ToggleFlag),
    (RawKeys::REVEAL, Action::Reveal),
];

/// Turns polled key state into actions, firing only for keys that were up on the previous poll.
#[derive(Copy, Clone, Debug, Default)]
pub struct KeyLatch {
    previous: RawKeys,
}

impl KeyLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll(&mut self, held: RawKeys) -> Vec<Action> {
        let pressed = held.difference(self.previous);
        self.previous = held;

        KEY_ACTIONS
            .iter()
            .filter(|(key, _)| pressed.contains(*key))
            .map(|&(_, action)| action)
            .collect()
    }
}
