//! Rules of the game: board geometry, data-driven move patterns, movement
//! cards and the game state machine that ties them together.

pub mod board;
pub mod cards;
pub mod core;
pub mod game;
pub mod pattern;
