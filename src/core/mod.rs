pub mod exam_area;
pub mod govdata;
pub mod licenses;
pub mod schedule;
pub mod sparql;
pub mod terminals;
pub mod weather;

use crate::config::AppConfig;
use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;

pub use sparql::{escape_literal, SparqlClient, SparqlLit};

/// The aggregation service: owns the HTTP client for the government APIs,
/// the SPARQL client for the triple store, and the validated configuration.
/// Every capability handler lives in its own module as an `impl Aggregator`
/// block. Handlers hold no state between requests.
pub struct Aggregator {
    pub(crate) http: Client,
    pub(crate) sparql: SparqlClient,
    pub(crate) config: AppConfig,
}

impl Aggregator {
    pub fn new(config: AppConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.govdata.timeout_seconds))
            .build()?;
        let sparql = SparqlClient::new(
            config.sparql.endpoint.clone(),
            Duration::from_secs(config.sparql.timeout_seconds),
        )?;

        Ok(Self {
            http,
            sparql,
            config,
        })
    }
}
