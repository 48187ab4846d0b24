pub mod toml_config;

use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

pub use toml_config::{AppConfig, GovDataConfig, ServerConfig, SparqlConfig};

/// Environment variable consulted for the data.go.kr service key when neither
/// the config file nor the CLI provides one.
pub const SERVICE_KEY_ENV: &str = "DATA_GO_KR_SERVICE_KEY";

#[derive(Debug, Clone, Parser)]
#[command(name = "qualinfo")]
#[command(about = "Aggregation backend for Korean qualification, weather and terminal data")]
pub struct CliConfig {
    #[arg(long, help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Bind address, overrides the config file")]
    pub bind: Option<String>,

    #[arg(long, help = "data.go.kr service key, overrides config file and env")]
    pub service_key: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Resolve the effective config: file (or defaults), then env, then CLI flags.
    pub fn load(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if config.govdata.service_key.is_empty() {
            if let Ok(key) = std::env::var(SERVICE_KEY_ENV) {
                config.govdata.service_key = key;
            }
        }
        if let Some(key) = &self.service_key {
            config.govdata.service_key = key.clone();
        }
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }

        Ok(config)
    }
}
