use serde::{Deserialize, Serialize};

use crate::config::TavilyConfig;
use crate::provider::{ResearchQuery, ResearchSummary, Source};

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchPayload {
    api_key: String,
    query: String,
    search_depth: String,
    include_answer: bool,
    max_results: u32,
}

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SearchResponse {
    pub answer: Option<String>,
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    pub url: Option<String>,
    #[serde(default)]
    pub content: String,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_payload(
    query: &ResearchQuery,
    config: &TavilyConfig,
) -> SearchPayload {
    SearchPayload {
        api_key: config.api_key.clone(),
        query: query.query.clone(),
        search_depth: config.search_depth.clone(),
        include_answer: true,
        max_results: config.max_results,
    }
}

impl SearchResponse {
    #[inline]
    pub fn into_summary(self) -> ResearchSummary {
        ResearchSummary {
            answer: self.answer,
            sources: self
                .results
                .into_iter()
                .map(|result| Source {
                    title: result.title,
                    url: result.url,
                    content: result.content,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TavilyConfigBuilder;

    #[test]
    fn test_payload_wire_shape() {
        let config = TavilyConfigBuilder::with_api_key("tvly-xxx").build();
        let payload = create_payload(
            &ResearchQuery::for_topic("Salesforce"),
            &config,
        );
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["api_key"], "tvly-xxx");
        assert_eq!(
            json["query"],
            "Salesforce latest information trends facts"
        );
        assert_eq!(json["search_depth"], "basic");
        assert_eq!(json["include_answer"], true);
        assert_eq!(json["max_results"], 5);
    }

    #[test]
    fn test_parse_response() {
        let body: SearchResponse = serde_json::from_str(
            r#"{
                "answer": "Salesforce is a CRM platform.",
                "results": [
                    {
                        "title": "Salesforce in 2026",
                        "url": "https://example.com/sf",
                        "content": "Recent developments."
                    },
                    {
                        "title": "No link here"
                    }
                ]
            }"#,
        )
        .unwrap();
        let summary = body.into_summary();
        assert_eq!(summary.answer.as_deref(), Some("Salesforce is a CRM platform."));
        assert_eq!(summary.sources.len(), 2);
        assert_eq!(summary.sources[0].url.as_deref(), Some("https://example.com/sf"));
        assert_eq!(summary.sources[1].url, None);
        assert_eq!(summary.sources[1].content, "");
    }

    #[test]
    fn test_parse_empty_response() {
        let body: SearchResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(body.into_summary(), ResearchSummary::default());
    }
}
