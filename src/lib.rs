//! ascii-courier library crate.
//!
//! This module exposes the internal components for integration testing.

pub mod ascii;
pub mod cli;
pub mod config;
pub mod delivery;
pub mod messages;
pub mod render;
pub mod server;
pub mod store;
