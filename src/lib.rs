//! Conway's Game of Life on a wrap-around square grid.
//!
//! [`grid`] holds the board, [`proc`] advances it one generation at a time,
//! and [`draw`] puts it on a terminal.

pub mod config;
pub mod draw;
pub mod error;
pub mod grid;
pub mod proc;

pub use error::{ConfigError, Error, GridError, Result};
