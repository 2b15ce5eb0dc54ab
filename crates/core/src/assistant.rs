mod builder;
#[cfg(test)]
mod tests;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use quill_model::{ModelProviderError, ModelRequest};
use quill_research::ResearchQuery;

use crate::conversation::Conversation;
use crate::intent::{self, ContentKind, Intent};
use crate::model_client::ModelClient;
use crate::prompt;
use crate::research_client::ResearchClient;
pub use builder::AssistantBuilder;

/// How many transcript turns the classifier and related-query prompts see.
const CLASSIFIER_HISTORY_TURNS: usize = 6;
/// How many transcript turns the select-best and edit prompts see.
const CONTEXT_HISTORY_TURNS: usize = 4;
/// How many sources survive into the research digest.
const DIGEST_SOURCES: usize = 3;

pub(crate) type TranscriptFn = Arc<dyn Fn(&str) + Send + Sync>;

/// A conversational content-generation assistant.
///
/// The assistant owns the conversation record (transcript, pending
/// topic, pending content kind, last research text) and runs one turn
/// at a time: short-circuit checks, intent classification, an optional
/// research lookup, and a generation call, in that order. There is no
/// internal concurrency; a turn is a single `await`.
pub struct Assistant {
    model_client: ModelClient,
    research_client: Option<ResearchClient>,
    on_transcript: Option<TranscriptFn>,
    conversation: Conversation,
    topic: Option<String>,
    kind: Option<ContentKind>,
    research_text: Option<String>,
}

/// The error returned when a model call inside a turn fails.
#[derive(Debug)]
pub struct TurnError(Box<dyn ModelProviderError>);

impl Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "model request failed: {}", self.0)
    }
}

impl StdError for TurnError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.0.as_ref())
    }
}

impl Assistant {
    pub(crate) fn from_builder(builder: AssistantBuilder) -> Self {
        let AssistantBuilder {
            model_client,
            research_client,
            on_transcript,
        } = builder;
        Self {
            model_client,
            research_client,
            on_transcript,
            conversation: Conversation::default(),
            topic: None,
            kind: None,
            research_text: None,
        }
    }

    /// Runs one user turn through the pipeline and returns the reply.
    ///
    /// On success the input and the reply are appended to the transcript.
    /// On error the conversation record is left untouched, so the turn
    /// can be retried by the caller.
    pub async fn handle_turn(&mut self, input: &str) -> Result<String, TurnError> {
        let input = input.trim();
        let reply = self.run_turn(input).await?;
        self.conversation.push_user(input);
        self.conversation.push_assistant(reply.as_str());
        Ok(reply)
    }

    /// Returns the conversation transcript.
    #[inline]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Returns the topic of the partially-specified content request, if
    /// any.
    #[inline]
    pub fn pending_topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// Returns the kind of the partially-specified content request, if
    /// any.
    #[inline]
    pub fn pending_kind(&self) -> Option<ContentKind> {
        self.kind
    }

    /// Returns the research text from the most recent lookup, if any.
    #[inline]
    pub fn last_research(&self) -> Option<&str> {
        self.research_text.as_deref()
    }

    async fn run_turn(&mut self, input: &str) -> Result<String, TurnError> {
        if let Some(intent) =
            intent::short_circuit(input, self.topic.as_deref(), self.kind)
        {
            debug!(?intent, "short-circuited classification");
            return self.dispatch(intent, input).await;
        }

        let classifier_prompt = prompt::classifier(
            &self.conversation.render_tail(CLASSIFIER_HISTORY_TURNS),
            input,
            self.topic.as_deref(),
            self.kind,
        );
        let reply = self.complete(classifier_prompt).await?;
        let intent = intent::parse_reply(&reply);
        debug!(?intent, "classified user turn");
        self.dispatch(intent, input).await
    }

    async fn dispatch(
        &mut self,
        intent: Intent,
        input: &str,
    ) -> Result<String, TurnError> {
        match intent {
            Intent::Quit => Ok(prompt::GOODBYE.to_owned()),
            Intent::ContentRequest { topic, kind } => {
                self.generate_content(topic, kind).await
            }
            Intent::AskType { topic } => {
                let reply = prompt::ask_type(&topic);
                self.topic = Some(topic);
                Ok(reply)
            }
            Intent::AskTopic { kind } => {
                self.kind = Some(kind);
                Ok(prompt::ask_topic(kind))
            }
            Intent::AskBoth => Ok(prompt::ASK_BOTH.to_owned()),
            Intent::RelatedQuery => {
                let related_prompt = prompt::related_query(
                    &self.conversation.render_tail(CLASSIFIER_HISTORY_TURNS),
                    input,
                );
                self.complete(related_prompt).await
            }
            Intent::Greeting(text) => Ok(text),
            Intent::SelectBest => {
                let select_prompt = prompt::select_best(
                    &self.conversation.render_tail(CONTEXT_HISTORY_TURNS),
                    input,
                );
                let reply = self.complete(select_prompt).await?;
                self.clear_pending();
                Ok(reply)
            }
            Intent::EditContent => {
                let edit_prompt = prompt::edit_content(
                    &self.conversation.render_tail(CONTEXT_HISTORY_TURNS),
                    input,
                );
                let reply = self.complete(edit_prompt).await?;
                self.clear_pending();
                Ok(reply)
            }
            Intent::ProvideReferences => {
                let research = self
                    .research_text
                    .as_deref()
                    .unwrap_or(prompt::NO_RESEARCH_DATA);
                let references_prompt = prompt::references(input, research);
                let reply = self.complete(references_prompt).await?;
                self.clear_pending();
                Ok(reply)
            }
            Intent::OffTopic => Ok(prompt::OFF_TOPIC.to_owned()),
            Intent::Verbatim(reply) => Ok(reply),
        }
    }

    async fn generate_content(
        &mut self,
        topic: String,
        kind: ContentKind,
    ) -> Result<String, TurnError> {
        let research = self.research(&topic).await;
        self.research_text = Some(research.clone());

        let generation_prompt = prompt::generation(kind, &topic, &research);
        let reply = self.complete(generation_prompt).await?;
        self.clear_pending();
        Ok(reply)
    }

    async fn research(&self, topic: &str) -> String {
        let Some(research_client) = &self.research_client else {
            return prompt::RESEARCH_UNAVAILABLE.to_owned();
        };
        debug!(%topic, "researching topic");
        match research_client
            .send_query(ResearchQuery::for_topic(topic))
            .await
        {
            Ok(summary) => summary.digest(DIGEST_SOURCES),
            Err(err) => {
                warn!("research lookup failed: {err}");
                prompt::RESEARCH_UNAVAILABLE.to_owned()
            }
        }
    }

    async fn complete(&self, prompt: String) -> Result<String, TurnError> {
        let on_transcript: Box<dyn Fn(String) + Send + 'static> =
            match &self.on_transcript {
                Some(callback) => {
                    let callback = Arc::clone(callback);
                    Box::new(move |delta: String| callback(&delta))
                }
                None => Box::new(|_| {}),
            };
        let resp = self
            .model_client
            .send_request(ModelRequest::from_prompt(prompt), on_transcript)
            .await
            .map_err(TurnError)?;
        Ok(resp.transcript)
    }

    // Topic and kind always leave together once content has been
    // produced, so a later unrelated turn cannot inherit a stale
    // request.
    fn clear_pending(&mut self) {
        self.topic = None;
        self.kind = None;
    }
}
