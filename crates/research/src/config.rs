use std::fmt::Debug;

/// Builder for [`TavilyConfig`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TavilyConfigBuilder {
    api_key: String,
    base_url: Option<String>,
    search_depth: Option<String>,
    max_results: Option<u32>,
}

impl TavilyConfigBuilder {
    /// Creates a builder with the given API key.
    #[inline]
    pub fn with_api_key<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            search_depth: None,
            max_results: None,
        }
    }

    /// Sets a custom base URL.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the search depth.
    #[inline]
    pub fn with_search_depth<S: Into<String>>(mut self, depth: S) -> Self {
        self.search_depth = Some(depth.into());
        self
    }

    /// Sets the max number of results to request.
    #[inline]
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> TavilyConfig {
        TavilyConfig {
            api_key: self.api_key,
            base_url: self
                .base_url
                .unwrap_or_else(|| "https://api.tavily.com".to_string()),
            search_depth: self
                .search_depth
                .unwrap_or_else(|| "basic".to_string()),
            max_results: self.max_results.unwrap_or(5),
        }
    }
}

impl Debug for TavilyConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavilyConfigBuilder")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("search_depth", &self.search_depth)
            .field("max_results", &self.max_results)
            .finish()
    }
}

/// Configuration for the Tavily provider.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TavilyConfig {
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) search_depth: String,
    pub(crate) max_results: u32,
}

impl Debug for TavilyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavilyConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("search_depth", &self.search_depth)
            .field("max_results", &self.max_results)
            .finish()
    }
}
