//! Response envelopes and records for every capability. Field names follow
//! the JSON contract consumed by the frontend, so several structs carry serde
//! renames for the upstream-style camelCase keys.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct LicenseSearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<LicenseHit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LicenseHit {
    pub uri: String,
    pub label: String,
    pub desc: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleResponse {
    pub name: String,
    pub year: i32,
    pub qualgb_name: Option<String>,
    pub total_from_api: usize,
    pub count: usize,
    /// True only when the rows are the name-filtered subset; false when the
    /// filter was empty or the full-list fallback fired.
    pub filtered: bool,
    pub results: Vec<ScheduleRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleRow {
    pub year: Option<String>,
    pub seq: Option<String>,
    #[serde(rename = "qualgbCd")]
    pub qualgb_cd: Option<String>,
    #[serde(rename = "qualgbNm")]
    pub qualgb_nm: Option<String>,
    pub description: String,
    // Written-stage registration window
    #[serde(rename = "docRegStartDt")]
    pub doc_reg_start_dt: String,
    #[serde(rename = "docRegEndDt")]
    pub doc_reg_end_dt: String,
    // Written exam window
    #[serde(rename = "docExamStartDt")]
    pub doc_exam_start_dt: String,
    #[serde(rename = "docExamEndDt")]
    pub doc_exam_end_dt: String,
    // Practical-stage registration window
    #[serde(rename = "pracRegStartDt")]
    pub prac_reg_start_dt: String,
    #[serde(rename = "pracRegEndDt")]
    pub prac_reg_end_dt: String,
    // Practical exam window
    #[serde(rename = "pracExamStartDt")]
    pub prac_exam_start_dt: String,
    #[serde(rename = "pracExamEndDt")]
    pub prac_exam_end_dt: String,
    // Result announcements
    #[serde(rename = "docPassDt")]
    pub doc_pass_dt: String,
    #[serde(rename = "pracPassDt")]
    pub prac_pass_dt: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExamCentersResponse {
    pub brch_cd: String,
    pub page: u32,
    pub per_page: u32,
    pub total_count: u64,
    pub count: usize,
    pub results: Vec<ExamAreaRecord>,
}

/// One test venue from the exam-area XML service. Missing or empty child
/// elements surface as nulls rather than failing the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExamAreaRecord {
    pub address: Option<String>,
    #[serde(rename = "brchCd")]
    pub brch_cd: Option<String>,
    #[serde(rename = "brchNm")]
    pub brch_nm: Option<String>,
    #[serde(rename = "examAreaGbNm")]
    pub exam_area_gb_nm: Option<String>,
    #[serde(rename = "examAreaNm")]
    pub exam_area_nm: Option<String>,
    #[serde(rename = "plceLoctGid")]
    pub plce_loct_gid: Option<String>,
    #[serde(rename = "telNo")]
    pub tel_no: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeatherResponse {
    pub region: String,
    #[serde(rename = "regId")]
    pub reg_id: String,
    #[serde(rename = "tmFc")]
    pub tm_fc: String,
    pub has_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_day4: Option<WeatherSummary>,
    pub land_raw: Option<Value>,
    pub temp_raw: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeatherSummary {
    /// Days from today; the first offset in 4..=10 with any sky condition.
    pub day_offset: Option<u32>,
    pub am: HalfDaySummary,
    pub pm: HalfDaySummary,
    pub temp: TempSummary,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HalfDaySummary {
    pub weather: Option<Value>,
    pub rain_prob: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TempSummary {
    pub min: Option<Value>,
    pub max: Option<Value>,
}

/// Fee and site lookups share one envelope. Absence of graph metadata is an
/// expected outcome, not an error, so it gets its own arm.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CodedItemsResponse {
    NoData {
        name: String,
        has_data: bool,
        results: Vec<Value>,
    },
    Found {
        name: String,
        #[serde(rename = "qualgbCd")]
        qualgb_cd: String,
        #[serde(rename = "jmCd")]
        jm_cd: String,
        count: usize,
        results: Vec<Value>,
    },
}

impl CodedItemsResponse {
    pub fn no_data(name: String) -> Self {
        CodedItemsResponse::NoData {
            name,
            has_data: false,
            results: Vec::new(),
        }
    }
}

/// Category and item codes resolved from the graph for a license name.
#[derive(Debug, Clone, Default)]
pub struct LicenseCodes {
    pub qualgb_cd: Option<String>,
    pub jm_cd: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TerminalRegionsResponse {
    pub count: usize,
    pub regions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TerminalLocalitiesResponse {
    pub sido: String,
    pub count: usize,
    pub localities: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TerminalListResponse {
    pub sido: String,
    pub locality: Option<String>,
    pub count: usize,
    pub results: Vec<TerminalRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TerminalRow {
    pub uri: String,
    pub id: String,
    pub name: String,
    #[serde(rename = "streetAddress")]
    pub street_address: String,
    pub address: String,
    pub sido: Option<String>,
    pub locality: Option<String>,
    pub neighborhood: Option<String>,
    pub telephone: Option<String>,
    pub url: Option<String>,
    // Fields the frontend expects on every terminal row
    #[serde(rename = "type")]
    pub kind: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub routes: Option<Value>,
}
