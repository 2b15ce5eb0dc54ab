use std::error::Error;

/// The error type for a research provider.
pub trait ResearchProviderError: Error + Send + Sync + 'static {}

/// A type that represents a research backend.
///
/// Once the provider is created, it should behave like a stateless object.
/// It can still have internal state, but callers should not rely on it,
/// and the provider should be prepared for being dropped anytime.
pub trait ResearchProvider: Send + Sync {
    /// The error type that may be returned by the provider.
    type Error: ResearchProviderError;

    /// Sends a query to the research backend.
    fn send_query(
        &self,
        query: &ResearchQuery,
    ) -> impl Future<Output = Result<ResearchSummary, Self::Error>> + Send + 'static;
}

/// A query to be sent to the research backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResearchQuery {
    /// The raw query string.
    pub query: String,
}

impl ResearchQuery {
    /// Creates the standard lookup query for a content topic.
    #[inline]
    pub fn for_topic(topic: &str) -> Self {
        Self {
            query: format!("{topic} latest information trends facts"),
        }
    }
}

/// The outcome of a research lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResearchSummary {
    /// The backend's synthesized answer, if it produced one.
    pub answer: Option<String>,
    /// The sources backing the answer, best match first.
    pub sources: Vec<Source>,
}

/// One source returned by the research backend.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Source {
    /// Title of the page.
    pub title: String,
    /// URL of the page, when the backend reported one.
    pub url: Option<String>,
    /// Extracted page content.
    pub content: String,
}

impl ResearchSummary {
    /// Renders the summary as the research text embedded into generation
    /// prompts: the answer, a blank line, then one line per source (up to
    /// `max_sources` of them).
    pub fn digest(&self, max_sources: usize) -> String {
        let mut digest = self.answer.clone().unwrap_or_default();
        digest.push_str("\n\n");
        for source in self.sources.iter().take(max_sources) {
            let url = source.url.as_deref().unwrap_or("N/A");
            digest.push_str(&format!(
                "- {} (URL: {}): {}\n",
                source.title, url, source.content
            ));
        }
        digest
    }
}
