use crate::core::govdata::item_list;
use crate::core::Aggregator;
use crate::domain::model::{HalfDaySummary, TempSummary, WeatherResponse, WeatherSummary};
use crate::utils::error::{ApiError, Result};
use chrono::{Duration, Local, NaiveDateTime, Timelike};
use serde_json::Value;

/// One forecast region. The land/sky service and the temperature service use
/// disjoint region-coding schemes for the same logical region, so each entry
/// carries both codes (the temperature code is the region's anchor city).
pub struct ForecastRegion {
    pub name: &'static str,
    pub land_code: &'static str,
    pub temp_code: &'static str,
}

pub const FORECAST_REGIONS: [ForecastRegion; 10] = [
    ForecastRegion { name: "수도권", land_code: "11B00000", temp_code: "11B10101" },
    ForecastRegion { name: "강원영서", land_code: "11D10000", temp_code: "11D10301" },
    ForecastRegion { name: "강원영동", land_code: "11D20000", temp_code: "11D20501" },
    ForecastRegion { name: "충청북도", land_code: "11C10000", temp_code: "11C10301" },
    ForecastRegion { name: "충남권", land_code: "11C20000", temp_code: "11C20401" },
    ForecastRegion { name: "전라북도", land_code: "11F10000", temp_code: "11F10201" },
    ForecastRegion { name: "전남권", land_code: "11F20000", temp_code: "11F20501" },
    ForecastRegion { name: "경북권", land_code: "11H10000", temp_code: "11H10701" },
    ForecastRegion { name: "경남권", land_code: "11H20000", temp_code: "11H20301" },
    ForecastRegion { name: "제주도", land_code: "11G00000", temp_code: "11G00601" },
];

pub fn forecast_region(name: &str) -> Option<&'static ForecastRegion> {
    FORECAST_REGIONS.iter().find(|r| r.name == name)
}

fn region_names() -> String {
    FORECAST_REGIONS
        .iter()
        .map(|r| r.name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Most recently elapsed forecast issuance for a wall-clock moment.
/// Forecasts are issued daily at 06:00 and 18:00; before 06:00 the applicable
/// issuance is the previous day's 18:00 slot. Minutes are always `00`.
pub fn latest_issuance(now: NaiveDateTime) -> String {
    let hour = now.hour();

    let (base_date, base_hour) = if hour < 6 {
        (now.date() - Duration::days(1), 18)
    } else if hour < 18 {
        (now.date(), 6)
    } else {
        (now.date(), 18)
    };

    format!("{}{:02}00", base_date.format("%Y%m%d"), base_hour)
}

fn default_tm_fc() -> String {
    latest_issuance(Local::now().naive_local())
}

/// First day offset in 4..=10 whose morning or afternoon sky condition is
/// populated. Near the forecast boundary day 4 can be empty while later days
/// already carry data, so this is a scan, not a fixed offset.
pub fn first_available_day(land: &Value) -> Option<u32> {
    (4..=10).find(|d| {
        has_text(land.get(format!("wf{}Am", d))) || has_text(land.get(format!("wf{}Pm", d)))
    })
}

fn has_text(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    }
}

impl Aggregator {
    /// Combined mid-range forecast: land/sky conditions plus temperatures,
    /// with a short summary for the first day that actually has data. A
    /// missing item from either upstream is data, not an error.
    pub async fn mid_weather(&self, region: &str, tm_fc: Option<String>) -> Result<WeatherResponse> {
        let reg = forecast_region(region).ok_or_else(|| {
            ApiError::invalid_input(format!(
                "지원하지 않는 지역: {}. 사용 가능한 값: {}",
                region,
                region_names()
            ))
        })?;

        let tm_fc = tm_fc.unwrap_or_else(default_tm_fc);

        let land = self
            .fetch_forecast_item(&self.config.govdata.mid_land_url, reg.land_code, &tm_fc)
            .await?;
        let ta = self
            .fetch_forecast_item(&self.config.govdata.mid_ta_url, reg.temp_code, &tm_fc)
            .await?;

        let (land, ta) = match (land, ta) {
            (Some(land), Some(ta)) => (land, ta),
            (land, ta) => {
                tracing::info!("no mid-range forecast yet for {} at {}", region, tm_fc);
                return Ok(WeatherResponse {
                    region: region.to_string(),
                    reg_id: reg.land_code.to_string(),
                    tm_fc,
                    has_data: false,
                    summary_day4: None,
                    land_raw: land,
                    temp_raw: ta,
                });
            }
        };

        let summary = match first_available_day(&land) {
            None => WeatherSummary {
                day_offset: None,
                am: HalfDaySummary::default(),
                pm: HalfDaySummary::default(),
                temp: TempSummary::default(),
            },
            Some(d) => WeatherSummary {
                day_offset: Some(d),
                am: HalfDaySummary {
                    weather: land.get(format!("wf{}Am", d)).cloned(),
                    rain_prob: land.get(format!("rnSt{}Am", d)).cloned(),
                },
                pm: HalfDaySummary {
                    weather: land.get(format!("wf{}Pm", d)).cloned(),
                    rain_prob: land.get(format!("rnSt{}Pm", d)).cloned(),
                },
                temp: TempSummary {
                    min: ta.get(format!("taMin{}", d)).cloned(),
                    max: ta.get(format!("taMax{}", d)).cloned(),
                },
            },
        };

        Ok(WeatherResponse {
            region: region.to_string(),
            reg_id: reg.land_code.to_string(),
            tm_fc,
            has_data: true,
            summary_day4: Some(summary),
            land_raw: Some(land),
            temp_raw: Some(ta),
        })
    }

    /// Fetch the single forecast item for a region code, or `None` when the
    /// upstream has no data for the issuance yet.
    async fn fetch_forecast_item(
        &self,
        url: &str,
        reg_id: &str,
        tm_fc: &str,
    ) -> Result<Option<Value>> {
        let params = [
            ("serviceKey", self.config.govdata.service_key.as_str()),
            ("numOfRows", "10"),
            ("pageNo", "1"),
            ("dataType", "JSON"),
            ("regId", reg_id),
            ("tmFc", tm_fc),
        ];

        let data = self.get_json(url, &params).await?;
        Ok(item_list(&data).into_iter().next())
    }
}
