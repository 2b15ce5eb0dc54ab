use quill_core::{Assistant, AssistantBuilder, TurnError};
use quill_model::ModelProvider;
use quill_research::ResearchProvider;

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    assistant_builder: AssistantBuilder,
}

impl SessionBuilder {
    /// Creates a session builder with a specified model provider.
    pub fn with_model_provider<M: ModelProvider + 'static>(
        provider: M,
    ) -> Self {
        let assistant_builder =
            AssistantBuilder::with_model_provider(provider);
        Self { assistant_builder }
    }

    /// Attaches a research backend for content requests.
    #[inline]
    pub fn with_research_provider<R: ResearchProvider + 'static>(
        mut self,
        provider: R,
    ) -> Self {
        self.assistant_builder =
            self.assistant_builder.with_research_provider(provider);
        self
    }

    /// Attaches a callback to be invoked with every streamed reply delta.
    #[inline]
    pub fn on_transcript(
        mut self,
        on_transcript: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        self.assistant_builder =
            self.assistant_builder.on_transcript(on_transcript);
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Session {
        Session {
            assistant: self.assistant_builder.build(),
        }
    }
}

/// A chat session, like a window that displays messages and has a input
/// box.
///
/// The session holds a fully configured assistant that you can use
/// directly, and it is basically a wrapper around [`Assistant`].
pub struct Session {
    assistant: Assistant,
}

impl Session {
    /// Sends a message to the session and returns the assistant's reply.
    #[inline]
    pub async fn send_message(
        &mut self,
        message: &str,
    ) -> Result<String, TurnError> {
        self.assistant.handle_turn(message).await
    }

    /// Returns the underlying assistant.
    #[inline]
    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }
}

#[cfg(test)]
mod tests {
    use quill_test_model::{PresetResponse, TestModelProvider};

    use super::*;

    #[tokio::test]
    async fn test_session_round_trip() {
        let model = TestModelProvider::default();
        model.enqueue_response(PresetResponse::with_reply(
            "GREETING: Hello!",
        ));

        let mut session = SessionBuilder::with_model_provider(model).build();
        let reply = session.send_message("hi").await.unwrap();
        assert_eq!(reply, "Hello!");
        assert_eq!(session.assistant().conversation().turns().len(), 2);
    }
}
