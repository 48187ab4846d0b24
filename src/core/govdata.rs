use crate::core::Aggregator;
use crate::utils::error::{ApiError, Result};
use serde_json::Value;

impl Aggregator {
    /// GET a government JSON endpoint with query parameters. Non-2xx is an
    /// upstream error; the body is decoded as JSON.
    pub(crate) async fn get_json(&self, url: &str, params: &[(&str, &str)]) -> Result<Value> {
        tracing::debug!("📡 GET {}", url);

        let response = self.http.get(url).query(params).send().await?;

        let status = response.status();
        tracing::debug!("📡 {} -> {}", url, status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// GET a government endpoint returning a raw text body (the XML services).
    pub(crate) async fn get_text(&self, url: &str, params: &[(&str, &str)]) -> Result<String> {
        tracing::debug!("📡 GET {}", url);

        let response = self.http.get(url).query(params).send().await?;

        let status = response.status();
        tracing::debug!("📡 {} -> {}", url, status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }
}

/// Item list nested at `response.body.items.item`. The upstream collapses a
/// single match to a bare object instead of a one-element list; normalize so
/// downstream code always sees a uniform sequence.
pub fn item_list(data: &Value) -> Vec<Value> {
    match data.pointer("/response/body/items/item") {
        Some(Value::Array(items)) => items.clone(),
        Some(item @ Value::Object(_)) => vec![item.clone()],
        _ => Vec::new(),
    }
}

/// Item list for the fee/site APIs, which nest a plain array at `body.items`.
pub fn body_items(data: &Value) -> Vec<Value> {
    match data.pointer("/body/items") {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

/// Field of a raw item as a string. The upstream is loose about types, so
/// numbers are stringified; anything else is treated as absent.
pub fn str_field(item: &Value, key: &str) -> Option<String> {
    match item.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}
