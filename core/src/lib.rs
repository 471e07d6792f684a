//! Minesweeper rules for small devices: lazily generated boards with a safe first reveal,
//! flood-fill reveals, and a single-player session state machine.
#![no_std]

extern crate alloc;

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use input::*;
pub use session::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod generator;
mod input;
mod session;
mod types;
