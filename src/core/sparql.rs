use crate::utils::error::{ApiError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Escape a string for embedding in a double-quoted SPARQL literal.
/// Backslash must be replaced before the quote, otherwise the escape
/// character itself gets double-escaped.
pub fn escape_literal(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// An escaped, quoted SPARQL string literal. The only constructor runs
/// `escape_literal`, so query text built with `SparqlLit` cannot carry an
/// unescaped user value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparqlLit(String);

impl SparqlLit {
    pub fn new(raw: &str) -> Self {
        Self(escape_literal(raw))
    }
}

impl fmt::Display for SparqlLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

/// SPARQL Results JSON format (W3C standard).
/// See: https://www.w3.org/TR/sparql11-results-json/
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub head: ResultsHead,
    pub results: ResultsBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultsHead {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultsBody {
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

/// One result row: variable name to typed value.
pub type Binding = HashMap<String, BindingValue>;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BindingValue {
    Uri {
        value: String,
    },
    Literal {
        value: String,
        #[serde(default)]
        datatype: Option<String>,
        #[serde(default, rename = "xml:lang")]
        lang: Option<String>,
    },
    Bnode {
        value: String,
    },
}

impl BindingValue {
    pub fn value(&self) -> &str {
        match self {
            BindingValue::Uri { value } => value,
            BindingValue::Literal { value, .. } => value,
            BindingValue::Bnode { value } => value,
        }
    }
}

/// Value of a variable in a result row, `None` when unbound.
pub fn bound<'a>(row: &'a Binding, var: &str) -> Option<&'a str> {
    row.get(var).map(BindingValue::value)
}

/// HTTP client for the triple-store SPARQL endpoint.
pub struct SparqlClient {
    endpoint: String,
    client: Client,
}

impl SparqlClient {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { endpoint, client })
    }

    /// Run a SELECT query and return its bindings. Non-2xx status or an
    /// unparseable body is an upstream error; the caller does not retry.
    pub async fn select(&self, query: &str) -> Result<Vec<Binding>> {
        tracing::debug!("SPARQL query to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/sparql-results+json")
            .form(&[("query", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let results: SparqlResults = response.json().await?;
        tracing::debug!("SPARQL returned {} bindings", results.results.bindings.len());

        Ok(results.results.bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain_text_unchanged() {
        assert_eq!(escape_literal("세무사"), "세무사");
        assert_eq!(escape_literal(""), "");
    }

    #[test]
    fn test_escape_quote_and_backslash() {
        assert_eq!(escape_literal(r#"a"b"#), r#"a\"b"#);
        assert_eq!(escape_literal(r"a\b"), r"a\\b");
        // Backslash escaped first: the quote's escape backslash is not doubled
        assert_eq!(escape_literal(r#"\""#), r#"\\\""#);
    }

    #[test]
    fn test_escape_leaves_no_lone_trailing_backslash() {
        let escaped = escape_literal(r"ends with \");
        assert!(escaped.ends_with(r"\\"));
        assert_eq!(escaped.chars().rev().take_while(|c| *c == '\\').count() % 2, 0);
    }

    #[test]
    fn test_sparql_lit_renders_quoted() {
        assert_eq!(SparqlLit::new("경기도").to_string(), "\"경기도\"");
        assert_eq!(SparqlLit::new(r#"x"y"#).to_string(), r#""x\"y""#);
    }

    #[test]
    fn test_parse_bindings_with_uri_and_literal() {
        let json = r#"{
            "head": { "vars": ["license", "label"] },
            "results": {
                "bindings": [
                    {
                        "license": { "type": "uri", "value": "http://example.org/lic/1" },
                        "label": { "type": "literal", "value": "세무사", "xml:lang": "ko" }
                    }
                ]
            }
        }"#;

        let results: SparqlResults = serde_json::from_str(json).unwrap();
        let rows = results.results.bindings;
        assert_eq!(rows.len(), 1);
        assert_eq!(bound(&rows[0], "license"), Some("http://example.org/lic/1"));
        assert_eq!(bound(&rows[0], "label"), Some("세무사"));
        assert_eq!(bound(&rows[0], "desc"), None);
    }

    #[test]
    fn test_parse_empty_result() {
        let json = r#"{ "head": { "vars": [] }, "results": { "bindings": [] } }"#;
        let results: SparqlResults = serde_json::from_str(json).unwrap();
        assert!(results.results.bindings.is_empty());
    }

    #[test]
    fn test_parse_typed_literal() {
        let json = r#"{
            "head": { "vars": ["seq"] },
            "results": {
                "bindings": [
                    {
                        "seq": {
                            "type": "literal",
                            "value": "3",
                            "datatype": "http://www.w3.org/2001/XMLSchema#integer"
                        }
                    }
                ]
            }
        }"#;

        let results: SparqlResults = serde_json::from_str(json).unwrap();
        assert_eq!(bound(&results.results.bindings[0], "seq"), Some("3"));
    }
}
