use std::sync::Arc;

use quill_model::ModelProvider;
use quill_research::ResearchProvider;

use super::{Assistant, TranscriptFn};
use crate::model_client::ModelClient;
use crate::research_client::ResearchClient;

/// [`Assistant`] builder.
pub struct AssistantBuilder {
    pub(crate) model_client: ModelClient,
    pub(crate) research_client: Option<ResearchClient>,
    pub(crate) on_transcript: Option<TranscriptFn>,
}

impl AssistantBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            research_client: None,
            on_transcript: None,
        }
    }

    /// Attaches a research backend for content requests.
    ///
    /// Without one, generation proceeds with the unavailability
    /// placeholder as its research text.
    #[inline]
    pub fn with_research_provider<P: ResearchProvider + 'static>(
        mut self,
        provider: P,
    ) -> Self {
        self.research_client = Some(ResearchClient::new(provider));
        self
    }

    /// Attaches a callback to be invoked with every streamed reply delta.
    #[inline]
    pub fn on_transcript(
        mut self,
        on_transcript: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        self.on_transcript = Some(Arc::new(on_transcript));
        self
    }

    /// Builds the assistant.
    #[inline]
    pub fn build(self) -> Assistant {
        Assistant::from_builder(self)
    }
}
