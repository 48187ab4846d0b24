pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{AppConfig, CliConfig};
pub use core::Aggregator;
pub use utils::error::{ApiError, Result};
