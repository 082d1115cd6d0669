//! benchplot CLI library
//!
//! Command implementations and configuration loading for the `benchplot` binary.

pub mod commands;
pub mod config;
pub mod progress;

pub use commands::{ConfigCommand, RenderCommand, SummaryCommand};
pub use config::{ConfigLoader, ConfigSource, PlotConfig};
