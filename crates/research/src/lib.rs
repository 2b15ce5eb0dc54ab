//! Web research lookups for content generation.
//!
//! The [`ResearchProvider`] trait plays the same role for search backends
//! that the model abstraction plays for LLMs: the turn pipeline talks to
//! the trait, and a backend crate module implements it. The bundled
//! [`TavilyProvider`] performs a single POST against the Tavily search
//! API. There is no retry and no backoff; a failed lookup is reported to
//! the caller, which substitutes its own placeholder text.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod config;
mod proto;
mod provider;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use reqwest::Client;

pub use config::{TavilyConfig, TavilyConfigBuilder};
pub use provider::{
    ResearchProvider, ResearchProviderError, ResearchQuery, ResearchSummary,
    Source,
};

/// Error type for [`TavilyProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
}

impl Error {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ResearchProviderError for Error {}

/// Tavily search API provider.
#[derive(Clone, Debug)]
pub struct TavilyProvider {
    client: Client,
    config: Arc<TavilyConfig>,
}

impl TavilyProvider {
    /// Creates a new `TavilyProvider` with the given configuration.
    #[inline]
    pub fn new(config: TavilyConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

impl ResearchProvider for TavilyProvider {
    type Error = Error;

    fn send_query(
        &self,
        query: &ResearchQuery,
    ) -> impl Future<Output = Result<ResearchSummary, Self::Error>> + Send + 'static
    {
        let payload = proto::create_payload(query, &self.config);
        let resp_fut = self
            .client
            .post(format!("{}{}", self.config.base_url, "/search"))
            .json(&payload)
            .send();

        async move {
            let resp = match resp_fut.await {
                Ok(resp) => resp,
                Err(err) => return Err(Error::new(format!("{err}"))),
            };
            let resp = match resp.error_for_status() {
                Ok(resp) => resp,
                Err(err) => return Err(Error::new(format!("{err}"))),
            };

            let body: proto::SearchResponse = resp
                .json()
                .await
                .map_err(|err| Error::new(format!("{err}")))?;
            debug!(results = body.results.len(), "search completed");
            Ok(body.into_summary())
        }
    }
}
