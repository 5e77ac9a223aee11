//! Subcommand implementations.

pub mod ai;
pub mod auth;
pub mod navigate;
pub mod status;
pub mod theme;
