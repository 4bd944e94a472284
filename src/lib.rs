//! Bingo scout — draw-history scoring and squad recommendations.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod engine;
pub mod feed;
pub mod dashboard;
