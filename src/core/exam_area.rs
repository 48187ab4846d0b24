use crate::core::Aggregator;
use crate::domain::model::{ExamAreaRecord, ExamCentersResponse};
use crate::utils::error::{ApiError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

impl Aggregator {
    /// Test-venue listing for a branch office: straight pass-through of the
    /// XML-parsed records with caller-supplied paging.
    pub async fn exam_centers(
        &self,
        brch_cd: &str,
        page: u32,
        per_page: u32,
    ) -> Result<ExamCentersResponse> {
        if page < 1 {
            return Err(ApiError::invalid_input("page must be at least 1"));
        }
        if !(1..=100).contains(&per_page) {
            return Err(ApiError::invalid_input("per_page must be between 1 and 100"));
        }

        let per_page_s = per_page.to_string();
        let page_s = page.to_string();
        let params = [
            ("serviceKey", self.config.govdata.service_key.as_str()),
            ("brchCd", brch_cd),
            ("numOfRows", per_page_s.as_str()),
            ("pageNo", page_s.as_str()),
        ];

        let xml_text = self
            .get_text(&self.config.govdata.exam_area_url, &params)
            .await?;
        let (results, total_count) = parse_exam_area_xml(&xml_text)?;

        Ok(ExamCentersResponse {
            brch_cd: brch_cd.to_string(),
            page,
            per_page,
            total_count,
            count: results.len(),
            results,
        })
    }
}

/// Parse the exam-area XML payload into records plus the reported total.
///
/// Structure: `response -> body -> (totalCount, items -> item*)`. An absent
/// `body` yields an empty list and count 0; a non-numeric `totalCount` yields
/// count 0; a missing or empty child field yields `None` for that field
/// without aborting sibling records.
pub fn parse_exam_area_xml(xml_text: &str) -> Result<(Vec<ExamAreaRecord>, u64)> {
    let mut reader = Reader::from_str(xml_text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<String> = Vec::new();
    let mut records: Vec<ExamAreaRecord> = Vec::new();
    let mut current: Option<ExamAreaRecord> = None;
    let mut total_count: u64 = 0;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "item" && path_ends_with(&stack, &["body", "items"]) {
                    current = Some(ExamAreaRecord::default());
                }
                stack.push(name);
            }
            Ok(Event::Text(e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).trim().to_string();
                if text.is_empty() {
                    continue;
                }

                if path_ends_with(&stack, &["body", "totalCount"]) {
                    total_count = text.parse().unwrap_or(0);
                } else if let Some(record) = current.as_mut() {
                    if let Some(field) = stack.last() {
                        set_item_field(record, field, text);
                    }
                }
            }
            Ok(Event::End(_)) => {
                if stack.pop().as_deref() == Some("item") {
                    if let Some(record) = current.take() {
                        records.push(record);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok((records, total_count))
}

fn path_ends_with(stack: &[String], tail: &[&str]) -> bool {
    stack.len() >= tail.len()
        && stack[stack.len() - tail.len()..]
            .iter()
            .zip(tail)
            .all(|(a, b)| a == b)
}

fn set_item_field(record: &mut ExamAreaRecord, tag: &str, text: String) {
    match tag {
        "address" => record.address = Some(text),
        "brchCd" => record.brch_cd = Some(text),
        "brchNm" => record.brch_nm = Some(text),
        "examAreaGbNm" => record.exam_area_gb_nm = Some(text),
        "examAreaNm" => record.exam_area_nm = Some(text),
        "plceLoctGid" => record.plce_loct_gid = Some(text),
        "telNo" => record.tel_no = Some(text),
        _ => {}
    }
}
