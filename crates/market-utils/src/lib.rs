//! Shared utilities for market-rs
//!
//! This crate provides the logging setup and the application-level
//! configuration used by the market-rs binaries.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigError, LogFormat};
pub use logging::{init_tracing, init_tracing_with};
