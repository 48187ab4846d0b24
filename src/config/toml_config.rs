use crate::utils::error::{ApiError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub sparql: SparqlConfig,
    pub govdata: GovDataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SparqlConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GovDataConfig {
    pub service_key: String,
    pub timeout_seconds: u64,
    pub num_of_rows: u32,
    pub exam_schedule_url: String,
    pub exam_area_url: String,
    pub mid_land_url: String,
    pub mid_ta_url: String,
    pub exam_fee_url: String,
    pub exam_site_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            sparql: SparqlConfig::default(),
            govdata: GovDataConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
        }
    }
}

impl Default for SparqlConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3030/licenses/sparql".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl Default for GovDataConfig {
    fn default() -> Self {
        Self {
            service_key: String::new(),
            timeout_seconds: 10,
            num_of_rows: 100,
            exam_schedule_url: "http://apis.data.go.kr/B490007/qualExamSchd/getQualExamSchdList"
                .to_string(),
            exam_area_url: "http://openapi.q-net.or.kr/api/service/rest/InquiryExamAreaSVC/getList"
                .to_string(),
            mid_land_url: "http://apis.data.go.kr/1360000/MidFcstInfoService/getMidLandFcst"
                .to_string(),
            mid_ta_url: "http://apis.data.go.kr/1360000/MidFcstInfoService/getMidTa".to_string(),
            exam_fee_url: "https://apis.data.go.kr/B490075/qualExamFee/getQualExamFeeList"
                .to_string(),
            exam_site_url: "https://apis.data.go.kr/B490076/qualExamSite/getQualExamSiteList"
                .to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ApiError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ApiError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace ${VAR_NAME} placeholders with environment values. Unresolved
    /// placeholders are left intact so validation can report them.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("server.bind", &self.server.bind)?;
        validation::validate_url("sparql.endpoint", &self.sparql.endpoint)?;
        validation::validate_non_empty_string("govdata.service_key", &self.govdata.service_key)?;

        validation::validate_url("govdata.exam_schedule_url", &self.govdata.exam_schedule_url)?;
        validation::validate_url("govdata.exam_area_url", &self.govdata.exam_area_url)?;
        validation::validate_url("govdata.mid_land_url", &self.govdata.mid_land_url)?;
        validation::validate_url("govdata.mid_ta_url", &self.govdata.mid_ta_url)?;
        validation::validate_url("govdata.exam_fee_url", &self.govdata.exam_fee_url)?;
        validation::validate_url("govdata.exam_site_url", &self.govdata.exam_site_url)?;

        validation::validate_range("govdata.num_of_rows", self.govdata.num_of_rows, 1, 1000)?;

        Ok(())
    }
}
