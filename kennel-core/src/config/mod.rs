//! Configuration types
//!
//! Board-agnostic configuration, built at compile time from `board.toml`
//! by the firmware build script via the const constructors here.

pub mod board;
pub mod pins;

pub use board::*;
pub use pins::*;
