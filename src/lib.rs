//! Concordat: a deterministic Diplomacy adjudication engine.
//!
//! Exposes the board model, the per-phase resolvers and the game driver for
//! use by integration tests and the binary entry point.

pub mod board;
pub mod config;
pub mod game;
pub mod resolve;
