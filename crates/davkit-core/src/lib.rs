//! Shared configuration, constants and error types for the `davkit` crates.

pub mod config;
pub mod constants;
pub mod error;
