//! Falling-block puzzle engine
//!
//! The engine is single-threaded and deterministic for a given seed. A
//! front-end feeds it [`game::Action`]s and elapsed time, and draws from
//! [`snapshot::Snapshot`].

pub mod board;
pub mod game;
pub mod generator;
pub mod gravity;
pub mod piece;
pub mod replay;
pub mod score;
pub mod snapshot;
pub mod tetromino;
