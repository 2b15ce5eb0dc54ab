use std::pin::Pin;
use std::sync::Arc;

use quill_research::{
    ResearchProvider, ResearchProviderError, ResearchQuery, ResearchSummary,
};
use tracing::Instrument;

type SendQueryResult = Result<ResearchSummary, Box<dyn ResearchProviderError>>;
type BoxedSendQueryFuture =
    Pin<Box<dyn Future<Output = SendQueryResult> + Send>>;
type HandlerFn =
    Arc<dyn Fn(ResearchQuery) -> BoxedSendQueryFuture + Send + Sync>;

/// A type-erased wrapper around a research provider, the counterpart of
/// [`crate::model_client::ModelClient`] for the research lookup.
#[derive(Clone)]
pub struct ResearchClient {
    handler_fn: HandlerFn,
}

impl ResearchClient {
    #[inline]
    pub fn new<P: ResearchProvider + 'static>(provider: P) -> Self {
        let handler_fn: HandlerFn = Arc::new(move |query| {
            let fut = provider.send_query(&query);
            Box::pin(
                async move {
                    trace!("got a query: {:?}", query);
                    match fut.await {
                        Ok(summary) => Ok(summary),
                        Err(err) => {
                            error!("got an error: {err:?}");
                            Err(Box::new(err) as Box<dyn ResearchProviderError>)
                        }
                    }
                }
                .instrument(trace_span!("research client query")),
            )
        });
        Self { handler_fn }
    }

    /// Sends a query and returns the research summary.
    #[inline]
    pub async fn send_query(&self, query: ResearchQuery) -> SendQueryResult {
        (self.handler_fn)(query).await
    }
}
