use crate::core::govdata::body_items;
use crate::core::sparql::{bound, SparqlLit};
use crate::core::Aggregator;
use crate::domain::model::{CodedItemsResponse, LicenseCodes, LicenseHit, LicenseSearchResponse};
use crate::utils::error::{ApiError, Result};

fn search_query(keyword: &SparqlLit) -> String {
    format!(
        r#"
PREFIX skos: <http://www.w3.org/2004/02/skos/core#>
PREFIX koqu: <http://knowledgemap.kr/koqu/def/>
PREFIX dcterms: <http://purl.org/dc/terms/>

SELECT ?license ?label ?desc
WHERE {{
  ?license a skos:Concept ;
           skos:inScheme koqu:QualificationScheme ;
           skos:prefLabel ?label .
  OPTIONAL {{ ?license dcterms:description ?desc . }}
  FILTER(CONTAINS(STR(?label), {keyword}))
}}
LIMIT 20
"#
    )
}

/// The upstream ontology is not consistent about which predicate carries the
/// license name or its codes, so the lookup ORs over the usual candidates.
fn codes_query(name: &SparqlLit) -> String {
    format!(
        r#"
PREFIX ns: <http://example.org/ontology#>
PREFIX koqu: <https://knowledgemap.kr/koqu/def/>
PREFIX schema: <http://schema.org/>
PREFIX dcterms: <http://purl.org/dc/terms/>

SELECT ?qualgbCd ?jmCd
WHERE {{
  ?s ?pName {name} .
  VALUES ?pName {{ ns:name schema:name dcterms:title koqu:name }}

  OPTIONAL {{ ?s ns:qualgbCd ?qualgbCd . }}
  OPTIONAL {{ ?s koqu:qualgbCd ?qualgbCd . }}
  OPTIONAL {{ ?s schema:categoryCode ?qualgbCd . }}

  OPTIONAL {{ ?s ns:jmCd ?jmCd . }}
  OPTIONAL {{ ?s koqu:jmCd ?jmCd . }}
  OPTIONAL {{ ?s schema:identifier ?jmCd . }}
}}
LIMIT 1
"#
    )
}

impl Aggregator {
    /// Substring search over license labels in the graph, capped at 20 hits.
    pub async fn search_licenses(&self, q: &str) -> Result<LicenseSearchResponse> {
        if q.is_empty() {
            return Err(ApiError::invalid_input("q must not be empty"));
        }

        let query = search_query(&SparqlLit::new(q));
        let rows = self.sparql.select(&query).await?;

        let results: Vec<LicenseHit> = rows
            .iter()
            .filter_map(|row| {
                Some(LicenseHit {
                    uri: bound(row, "license")?.to_string(),
                    label: bound(row, "label")?.to_string(),
                    desc: bound(row, "desc").map(String::from),
                })
            })
            .collect();

        Ok(LicenseSearchResponse {
            query: q.to_string(),
            count: results.len(),
            results,
        })
    }

    /// (qualgbCd, jmCd) for a license name, `None` when the graph has no
    /// matching entity.
    pub(crate) async fn license_codes(&self, name: &str) -> Result<Option<LicenseCodes>> {
        let query = codes_query(&SparqlLit::new(name));
        let rows = self.sparql.select(&query).await?;

        Ok(rows.first().map(|row| LicenseCodes {
            qualgb_cd: bound(row, "qualgbCd").map(String::from),
            jm_cd: bound(row, "jmCd").map(String::from),
        }))
    }

    pub async fn license_fee(&self, name: &str) -> Result<CodedItemsResponse> {
        self.coded_items(name, &self.config.govdata.exam_fee_url)
            .await
    }

    pub async fn license_sites(&self, name: &str) -> Result<CodedItemsResponse> {
        self.coded_items(name, &self.config.govdata.exam_site_url)
            .await
    }

    /// Shared fee/site flow: resolve codes from the graph, then pass the
    /// upstream item list through. Missing graph metadata is an expected
    /// outcome and returns the empty `has_data: false` envelope.
    async fn coded_items(&self, name: &str, url: &str) -> Result<CodedItemsResponse> {
        let (qualgb_cd, jm_cd) = match self.license_codes(name).await? {
            Some(LicenseCodes {
                qualgb_cd: Some(qualgb_cd),
                jm_cd: Some(jm_cd),
            }) => (qualgb_cd, jm_cd),
            _ => {
                tracing::debug!("no graph codes for license '{}'", name);
                return Ok(CodedItemsResponse::no_data(name.to_string()));
            }
        };

        let params = [
            ("serviceKey", self.config.govdata.service_key.as_str()),
            ("qualgbCd", qualgb_cd.as_str()),
            ("jmCd", jm_cd.as_str()),
        ];
        let data = self.get_json(url, &params).await?;
        let results = body_items(&data);

        Ok(CodedItemsResponse::Found {
            name: name.to_string(),
            qualgb_cd,
            jm_cd,
            count: results.len(),
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_embeds_escaped_literal() {
        let query = search_query(&SparqlLit::new("세무사"));
        assert!(query.contains(r#"CONTAINS(STR(?label), "세무사")"#));
        assert!(query.contains("LIMIT 20"));
    }

    #[test]
    fn test_search_query_cannot_be_broken_out_of() {
        // A quote in the user input stays inside the literal
        let query = search_query(&SparqlLit::new(r#"x") } #"#));
        assert!(query.contains(r#""x\") } #""#));
        assert!(!query.contains(r#"STR(?label), "x")"#));
    }

    #[test]
    fn test_codes_query_lists_candidate_predicates() {
        let query = codes_query(&SparqlLit::new("세무사"));
        assert!(query.contains("VALUES ?pName { ns:name schema:name dcterms:title koqu:name }"));
        assert!(query.contains(r#"?s ?pName "세무사" ."#));
        assert!(query.contains("LIMIT 1"));
    }
}
