use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::future::ready;
use std::sync::{Arc, Mutex};

use quill_research::{
    ResearchProvider, ResearchProviderError, ResearchQuery, ResearchSummary,
    Source,
};
use quill_test_model::{PresetResponse, TestModelProvider};

use crate::AssistantBuilder;
use crate::intent::ContentKind;
use crate::prompt;

#[derive(Debug)]
struct FakeResearchError;

impl Display for FakeResearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "lookup failed")
    }
}

impl Error for FakeResearchError {}
impl ResearchProviderError for FakeResearchError {}

/// A research backend that replays a canned summary and records the
/// queries it receives. A provider without a summary always fails.
#[derive(Clone, Default)]
struct FakeResearchProvider {
    summary: Option<ResearchSummary>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl FakeResearchProvider {
    fn with_answer(answer: &str) -> Self {
        Self {
            summary: Some(ResearchSummary {
                answer: Some(answer.to_owned()),
                sources: vec![Source {
                    title: "Example".to_owned(),
                    url: Some("https://example.com".to_owned()),
                    content: "details".to_owned(),
                }],
            }),
            queries: Default::default(),
        }
    }

    fn failing() -> Self {
        Self::default()
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl ResearchProvider for FakeResearchProvider {
    type Error = FakeResearchError;

    fn send_query(
        &self,
        query: &ResearchQuery,
    ) -> impl Future<Output = Result<ResearchSummary, Self::Error>> + Send + 'static
    {
        self.queries.lock().unwrap().push(query.query.clone());
        ready(self.summary.clone().ok_or(FakeResearchError))
    }
}

#[tokio::test]
async fn test_content_request_runs_research_and_generation() {
    let model = TestModelProvider::default();
    model.enqueue_response(PresetResponse::with_reply(
        "CONTENT_REQUEST: Salesforce | BLOG",
    ));
    model.enqueue_response(PresetResponse::with_reply(
        "Here is your blog post.",
    ));
    let research = FakeResearchProvider::with_answer("Salesforce news.");

    let mut assistant = AssistantBuilder::with_model_provider(model.clone())
        .with_research_provider(research.clone())
        .build();
    let reply = assistant
        .handle_turn("give blog for salesforce")
        .await
        .unwrap();
    assert_eq!(reply, "Here is your blog post.");

    assert_eq!(
        research.queries(),
        vec!["Salesforce latest information trends facts".to_owned()]
    );

    let requests = model.requests();
    assert_eq!(requests.len(), 2);
    let generation_prompt = requests[1].messages[0].text();
    assert!(generation_prompt
        .starts_with("Create a comprehensive blog post about Salesforce."));
    assert!(generation_prompt.contains("Salesforce news."));
    assert!(generation_prompt.contains("https://example.com"));

    // The digest is retained for a later references request, while the
    // pending request state is cleared together.
    assert!(assistant.last_research().unwrap().contains("Salesforce news."));
    assert_eq!(assistant.pending_topic(), None);
    assert_eq!(assistant.pending_kind(), None);

    let turns = assistant.conversation().turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].text(), "give blog for salesforce");
    assert_eq!(turns[1].text(), "Here is your blog post.");
}

#[tokio::test]
async fn test_ask_type_then_keyword_follow_up() {
    let model = TestModelProvider::default();
    model.enqueue_response(PresetResponse::with_reply(
        "ASK_TYPE: project manager",
    ));
    model.enqueue_response(PresetResponse::with_reply("Your blog post."));

    let mut assistant =
        AssistantBuilder::with_model_provider(model.clone()).build();

    let reply = assistant
        .handle_turn("create content for project manager")
        .await
        .unwrap();
    assert!(reply.contains("create content about project manager"));
    assert_eq!(assistant.pending_topic(), Some("project manager"));
    assert_eq!(assistant.pending_kind(), None);

    // The type keyword answers the pending question without another
    // classifier call.
    let reply = assistant.handle_turn("a blog please").await.unwrap();
    assert_eq!(reply, "Your blog post.");

    let requests = model.requests();
    assert_eq!(requests.len(), 2);
    let generation_prompt = requests[1].messages[0].text();
    assert!(generation_prompt.starts_with(
        "Create a comprehensive blog post about project manager."
    ));
    // No research backend configured, so the placeholder is embedded.
    assert!(generation_prompt.contains(prompt::RESEARCH_UNAVAILABLE));

    assert_eq!(assistant.pending_topic(), None);
    assert_eq!(assistant.pending_kind(), None);
}

#[tokio::test]
async fn test_ask_topic_then_short_topic_follow_up() {
    let model = TestModelProvider::default();
    model.enqueue_response(PresetResponse::with_reply("ASK_TOPIC: VIDEO"));
    model.enqueue_response(PresetResponse::with_reply("Your video script."));

    let mut assistant =
        AssistantBuilder::with_model_provider(model.clone()).build();

    let reply = assistant.handle_turn("create a video").await.unwrap();
    assert!(reply.contains("create a video"));
    assert_eq!(assistant.pending_kind(), Some(ContentKind::Video));

    let reply = assistant.handle_turn("rust programming").await.unwrap();
    assert_eq!(reply, "Your video script.");

    let requests = model.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].messages[0]
        .text()
        .starts_with("Create a video script about rust programming."));
}

#[tokio::test]
async fn test_quit_needs_no_model_call() {
    let model = TestModelProvider::default();
    let mut assistant =
        AssistantBuilder::with_model_provider(model.clone()).build();

    let reply = assistant.handle_turn("  QUIT  ").await.unwrap();
    assert_eq!(reply, "Goodbye! Have a great day!");
    assert!(model.requests().is_empty());
}

#[tokio::test]
async fn test_off_topic_gets_canned_reply() {
    let model = TestModelProvider::default();
    model.enqueue_response(PresetResponse::with_reply(
        "OFF_TOPIC: what's the weather like?",
    ));
    let mut assistant =
        AssistantBuilder::with_model_provider(model.clone()).build();

    let reply = assistant
        .handle_turn("what's the weather like?")
        .await
        .unwrap();
    assert_eq!(reply, prompt::OFF_TOPIC);
}

#[tokio::test]
async fn test_greeting_forwards_model_text() {
    let model = TestModelProvider::default();
    model.enqueue_response(PresetResponse::with_reply(
        "GREETING: Hello! How can I help you create content today?",
    ));
    let mut assistant =
        AssistantBuilder::with_model_provider(model.clone()).build();

    let reply = assistant.handle_turn("hi there").await.unwrap();
    assert_eq!(reply, "Hello! How can I help you create content today?");
}

#[tokio::test]
async fn test_unmatched_reply_is_forwarded_verbatim() {
    let model = TestModelProvider::default();
    model.enqueue_response(PresetResponse::with_reply(
        "I'm not sure what you mean.",
    ));
    let mut assistant =
        AssistantBuilder::with_model_provider(model.clone()).build();

    let reply = assistant.handle_turn("hmm").await.unwrap();
    assert_eq!(reply, "I'm not sure what you mean.");
}

#[tokio::test]
async fn test_failed_research_uses_placeholder() {
    let model = TestModelProvider::default();
    model.enqueue_response(PresetResponse::with_reply(
        "CONTENT_REQUEST: Salesforce | EMAIL",
    ));
    model.enqueue_response(PresetResponse::with_reply("Your email."));

    let mut assistant = AssistantBuilder::with_model_provider(model.clone())
        .with_research_provider(FakeResearchProvider::failing())
        .build();
    let reply = assistant
        .handle_turn("email about salesforce")
        .await
        .unwrap();
    assert_eq!(reply, "Your email.");

    let generation_prompt = model.requests()[1].messages[0].text().to_owned();
    assert!(generation_prompt
        .starts_with("Create a professional email about Salesforce."));
    assert!(generation_prompt.contains(prompt::RESEARCH_UNAVAILABLE));
    assert_eq!(
        assistant.last_research(),
        Some(prompt::RESEARCH_UNAVAILABLE)
    );
}

#[tokio::test]
async fn test_references_without_research() {
    let model = TestModelProvider::default();
    model.enqueue_response(PresetResponse::with_reply(
        "PROVIDE_REFERENCES: show me the sources",
    ));
    model.enqueue_response(PresetResponse::with_reply(
        "I don't have sources on file yet.",
    ));
    let mut assistant =
        AssistantBuilder::with_model_provider(model.clone()).build();

    let reply = assistant.handle_turn("show me the sources").await.unwrap();
    assert_eq!(reply, "I don't have sources on file yet.");

    let references_prompt = model.requests()[1].messages[0].text().to_owned();
    assert!(references_prompt.contains(prompt::NO_RESEARCH_DATA));
}

#[tokio::test]
async fn test_select_best_uses_context_and_clears_pending() {
    let model = TestModelProvider::default();
    model.enqueue_response(PresetResponse::with_reply("ASK_TYPE: houseplants"));
    model.enqueue_response(PresetResponse::with_reply(
        "SELECT_BEST: pick the best one",
    ));
    model.enqueue_response(PresetResponse::with_reply(
        "The second option is the strongest.",
    ));
    let mut assistant =
        AssistantBuilder::with_model_provider(model.clone()).build();

    assistant
        .handle_turn("content about houseplants")
        .await
        .unwrap();
    assert_eq!(assistant.pending_topic(), Some("houseplants"));

    let reply = assistant.handle_turn("pick the best one").await.unwrap();
    assert_eq!(reply, "The second option is the strongest.");

    let select_prompt = model.requests()[2].messages[0].text().to_owned();
    assert!(select_prompt.contains("pick the best option"));
    assert!(select_prompt.contains("User: content about houseplants"));

    // Selection counts as produced content: the pending request is gone.
    assert_eq!(assistant.pending_topic(), None);
    assert_eq!(assistant.pending_kind(), None);
}

#[tokio::test]
async fn test_classifier_sees_a_bounded_history_window() {
    let model = TestModelProvider::default();
    for idx in 0..5 {
        model.enqueue_response(PresetResponse::with_reply(format!(
            "reply {idx}"
        )));
    }
    let mut assistant =
        AssistantBuilder::with_model_provider(model.clone()).build();

    for idx in 0..5 {
        assistant
            .handle_turn(&format!("message {idx}"))
            .await
            .unwrap();
    }

    // The fifth classifier prompt sees eight transcript turns but only
    // the last six fit the window.
    let classifier_prompt = model.requests()[4].messages[0].text().to_owned();
    assert!(classifier_prompt.contains("User: message 3"));
    assert!(classifier_prompt.contains("AI: reply 3"));
    assert!(!classifier_prompt.contains("message 0"));
    assert!(!classifier_prompt.contains("reply 0"));
}

#[tokio::test]
async fn test_model_error_leaves_conversation_untouched() {
    let model = TestModelProvider::default();
    model.enqueue_response(PresetResponse::failure());
    let mut assistant =
        AssistantBuilder::with_model_provider(model.clone()).build();

    let result = assistant.handle_turn("hello").await;
    assert!(result.is_err());
    assert!(assistant.conversation().is_empty());
}

#[tokio::test]
async fn test_transcript_callback_receives_deltas() {
    let model = TestModelProvider::default();
    model.enqueue_response(PresetResponse::with_reply(
        "GREETING: Hi, welcome back!",
    ));
    let deltas = Arc::new(Mutex::new(String::new()));
    let mut assistant = AssistantBuilder::with_model_provider(model)
        .on_transcript({
            let deltas = Arc::clone(&deltas);
            move |delta| deltas.lock().unwrap().push_str(delta)
        })
        .build();

    assistant.handle_turn("hi").await.unwrap();
    assert_eq!(&*deltas.lock().unwrap(), "GREETING: Hi, welcome back!");
}
