use crate::core::govdata::{item_list, str_field};
use crate::core::Aggregator;
use crate::domain::model::{ScheduleResponse, ScheduleRow};
use crate::utils::error::{ApiError, Result};
use serde_json::Value;

/// Qualification-category name to upstream code. Fixed table, no runtime
/// mutation.
pub const QUALGB_CATEGORIES: [(&str, &str); 4] = [
    ("국가기술자격", "T"),
    ("과정평가형자격", "C"),
    ("일학습병행자격", "W"),
    ("국가전문자격", "S"),
];

pub fn qualgb_code(name: &str) -> Option<&'static str> {
    QUALGB_CATEGORIES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
}

fn qualgb_names() -> String {
    QUALGB_CATEGORIES
        .iter()
        .map(|(n, _)| *n)
        .collect::<Vec<_>>()
        .join(", ")
}

/// `YYYYMMDD` -> `YYYY-MM-DD`. Anything that is not an 8-digit numeric
/// string passes through unchanged; this never fails.
pub fn format_yyyymmdd(date_str: &str) -> String {
    if date_str.len() != 8 || !date_str.bytes().all(|b| b.is_ascii_digit()) {
        return date_str.to_string();
    }
    format!(
        "{}-{}-{}",
        &date_str[0..4],
        &date_str[4..6],
        &date_str[6..8]
    )
}

impl Aggregator {
    /// Exam schedules for a year, filtered to plans whose description
    /// mentions the license name. A filter that matches nothing falls back
    /// to the full unfiltered list for the year; `filtered` in the envelope
    /// records whether the filter produced the returned rows.
    pub async fn exam_schedule(
        &self,
        name: &str,
        year: i32,
        qualgb_name: Option<&str>,
    ) -> Result<ScheduleResponse> {
        let num_rows = self.config.govdata.num_of_rows.to_string();
        let year_s = year.to_string();

        let mut params = vec![
            ("serviceKey", self.config.govdata.service_key.as_str()),
            ("numOfRows", num_rows.as_str()),
            ("pageNo", "1"),
            ("dataFormat", "json"),
            ("implYy", year_s.as_str()),
        ];

        if let Some(qualgb) = qualgb_name {
            let code = qualgb_code(qualgb).ok_or_else(|| {
                ApiError::invalid_input(format!(
                    "지원하지 않는 자격구분명: {}. 사용 가능한 값: {}",
                    qualgb,
                    qualgb_names()
                ))
            })?;
            params.push(("qualgbCd", code));
        }

        let data = self
            .get_json(&self.config.govdata.exam_schedule_url, &params)
            .await?;
        let items = item_list(&data);
        let total_from_api = items.len();

        let (results, filtered) = build_rows(&items, name.trim());
        tracing::debug!(
            "exam schedule {}/{:?}: {} of {} rows (filtered: {})",
            year,
            qualgb_name,
            results.len(),
            total_from_api,
            filtered
        );

        Ok(ScheduleResponse {
            name: name.to_string(),
            year,
            qualgb_name: qualgb_name.map(str::to_string),
            total_from_api,
            count: results.len(),
            filtered,
            results,
        })
    }
}

/// Filter raw items by description substring and normalize them into rows.
/// A non-empty keyword that matches nothing returns the full list instead,
/// flagged `filtered = false`.
pub fn build_rows(items: &[Value], keyword: &str) -> (Vec<ScheduleRow>, bool) {
    let matched: Vec<ScheduleRow> = items
        .iter()
        .filter(|item| {
            keyword.is_empty()
                || str_field(item, "description")
                    .unwrap_or_default()
                    .contains(keyword)
        })
        .map(to_row)
        .collect();

    if !keyword.is_empty() && matched.is_empty() {
        (items.iter().map(to_row).collect(), false)
    } else {
        (matched, !keyword.is_empty())
    }
}

fn to_row(item: &Value) -> ScheduleRow {
    let date = |key: &str| format_yyyymmdd(&str_field(item, key).unwrap_or_default());

    ScheduleRow {
        year: str_field(item, "implYy"),
        seq: str_field(item, "implSeq"),
        qualgb_cd: str_field(item, "qualgbCd"),
        qualgb_nm: str_field(item, "qualgbNm"),
        description: str_field(item, "description").unwrap_or_default(),
        doc_reg_start_dt: date("docRegStartDt"),
        doc_reg_end_dt: date("docRegEndDt"),
        doc_exam_start_dt: date("docExamStartDt"),
        doc_exam_end_dt: date("docExamEndDt"),
        prac_reg_start_dt: date("pracRegStartDt"),
        prac_reg_end_dt: date("pracRegEndDt"),
        prac_exam_start_dt: date("pracExamStartDt"),
        prac_exam_end_dt: date("pracExamEndDt"),
        doc_pass_dt: date("docPassDt"),
        prac_pass_dt: date("pracPassDt"),
    }
}
