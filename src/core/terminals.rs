use crate::core::sparql::{bound, SparqlLit};
use crate::core::Aggregator;
use crate::domain::model::{
    TerminalListResponse, TerminalLocalitiesResponse, TerminalRegionsResponse, TerminalRow,
};
use crate::utils::error::Result;

// Region/locality/neighborhood values are URI-shaped in the graph; the
// queries strip everything before the last '/' to get display names. An
// unbound neighborhood is bound to the empty string.

const REGIONS_QUERY: &str = r#"
PREFIX koqu: <https://knowledgemap.kr/koqu/def/>
PREFIX schema: <http://schema.org/>

SELECT DISTINCT ?regionName
WHERE {
  ?terminal a koqu:Terminal ;
            schema:addressRegion ?region .
  BIND(REPLACE(STR(?region), ".*/", "") AS ?regionName)
}
ORDER BY ?regionName
"#;

fn localities_query(sido: &SparqlLit) -> String {
    format!(
        r#"
PREFIX koqu: <https://knowledgemap.kr/koqu/def/>
PREFIX schema: <http://schema.org/>

SELECT DISTINCT ?localName
WHERE {{
  ?terminal a koqu:Terminal ;
            schema:addressRegion ?region ;
            schema:addressLocality ?locality .
  BIND(REPLACE(STR(?region), ".*/", "") AS ?regionName)
  BIND(REPLACE(STR(?locality), ".*/", "") AS ?localName)
  FILTER(?regionName = {sido})
}}
ORDER BY ?localName
"#
    )
}

fn terminals_query(sido: &SparqlLit, locality: Option<&SparqlLit>) -> String {
    let filter_clause = match locality {
        Some(locality) => format!("FILTER(?regionName = {sido} && ?localName = {locality})"),
        None => format!("FILTER(?regionName = {sido})"),
    };

    format!(
        r#"
PREFIX koqu: <https://knowledgemap.kr/koqu/def/>
PREFIX schema: <http://schema.org/>

SELECT ?terminal ?id ?name ?street ?regionName ?localName ?neighborhoodName ?tel ?url
WHERE {{
  ?terminal a koqu:Terminal ;
            schema:identifier ?id ;
            schema:name ?name ;
            schema:streetAddress ?street ;
            schema:addressRegion ?region ;
            schema:addressLocality ?locality .
  OPTIONAL {{ ?terminal schema:addressNeighborhood ?neighborhood . }}
  OPTIONAL {{ ?terminal schema:telephone ?tel . }}
  OPTIONAL {{ ?terminal schema:url ?url . }}

  BIND(REPLACE(STR(?region), ".*/", "") AS ?regionName)
  BIND(REPLACE(STR(?locality), ".*/", "") AS ?localName)
  BIND(IF(BOUND(?neighborhood),
          REPLACE(STR(?neighborhood), ".*/", ""),
          ""
  ) AS ?neighborhoodName)

  {filter_clause}
}}
ORDER BY ?name
"#
    )
}

/// Join the non-empty address parts with single spaces; absent parts leave
/// no gap.
pub fn join_address(parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

impl Aggregator {
    /// Provinces (시/도) that have at least one terminal.
    pub async fn terminal_regions(&self) -> Result<TerminalRegionsResponse> {
        let rows = self.sparql.select(REGIONS_QUERY).await?;
        let regions: Vec<String> = rows
            .iter()
            .filter_map(|row| bound(row, "regionName").map(String::from))
            .collect();

        Ok(TerminalRegionsResponse {
            count: regions.len(),
            regions,
        })
    }

    /// Cities/districts (시/군/구) with terminals inside the given province.
    pub async fn terminal_localities(&self, sido: &str) -> Result<TerminalLocalitiesResponse> {
        let query = localities_query(&SparqlLit::new(sido));
        let rows = self.sparql.select(&query).await?;
        let localities: Vec<String> = rows
            .iter()
            .filter_map(|row| bound(row, "localName").map(String::from))
            .collect();

        Ok(TerminalLocalitiesResponse {
            sido: sido.to_string(),
            count: localities.len(),
            localities,
        })
    }

    /// Terminal listing by province, optionally narrowed to one locality.
    pub async fn terminals_by_region(
        &self,
        sido: &str,
        locality: Option<&str>,
    ) -> Result<TerminalListResponse> {
        let sido_lit = SparqlLit::new(sido);
        let locality_lit = locality.map(SparqlLit::new);
        let query = terminals_query(&sido_lit, locality_lit.as_ref());

        let rows = self.sparql.select(&query).await?;

        let results: Vec<TerminalRow> = rows
            .iter()
            .filter_map(|row| {
                let street = bound(row, "street")?.to_string();
                let sido_name = bound(row, "regionName").map(String::from);
                let locality_name = bound(row, "localName").map(String::from);
                let neighborhood = bound(row, "neighborhoodName")
                    .filter(|n| !n.is_empty())
                    .map(String::from);

                let address = join_address(&[
                    sido_name.as_deref(),
                    locality_name.as_deref(),
                    neighborhood.as_deref(),
                    Some(street.as_str()),
                ]);

                Some(TerminalRow {
                    uri: bound(row, "terminal")?.to_string(),
                    id: bound(row, "id")?.to_string(),
                    name: bound(row, "name")?.to_string(),
                    street_address: street,
                    address,
                    sido: sido_name,
                    locality: locality_name,
                    neighborhood,
                    telephone: bound(row, "tel").map(String::from),
                    url: bound(row, "url").map(String::from),
                    kind: "버스터미널".to_string(),
                    lat: None,
                    lon: None,
                    routes: None,
                })
            })
            .collect();

        Ok(TerminalListResponse {
            sido: sido.to_string(),
            locality: locality.map(str::to_string),
            count: results.len(),
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_address_skips_missing_neighborhood() {
        let address = join_address(&[Some("경기도"), Some("수원시"), None, Some("OO로 1")]);
        assert_eq!(address, "경기도 수원시 OO로 1");
    }

    #[test]
    fn test_join_address_skips_empty_parts() {
        let address = join_address(&[Some("경기도"), Some(""), Some("매산로 18")]);
        assert_eq!(address, "경기도 매산로 18");
        assert_eq!(join_address(&[None, None]), "");
    }

    #[test]
    fn test_terminals_query_filters() {
        let sido = SparqlLit::new("경기도");

        let query = terminals_query(&sido, None);
        assert!(query.contains(r#"FILTER(?regionName = "경기도")"#));

        let locality = SparqlLit::new("수원시");
        let query = terminals_query(&sido, Some(&locality));
        assert!(query.contains(r#"FILTER(?regionName = "경기도" && ?localName = "수원시")"#));
    }

    #[test]
    fn test_localities_query_escapes_user_input() {
        let query = localities_query(&SparqlLit::new(r#"경기도") }"#));
        assert!(query.contains(r#"FILTER(?regionName = "경기도\") }")"#));
    }
}
