use serde::{Deserialize, Serialize};

/// The events in a preset response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetEvent {
    #[serde(rename = "message_delta")]
    MessageDelta(String),
}

/// A preset response for one model request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// Events in this response.
    pub events: Vec<PresetEvent>,
    /// If set, the response fails instead of producing its events.
    pub failing: bool,
}

impl PresetResponse {
    /// Creates a `PresetResponse` with the specified events.
    #[inline]
    pub fn with_events(events: impl Into<Vec<PresetEvent>>) -> Self {
        Self {
            events: events.into(),
            failing: false,
        }
    }

    /// Creates a `PresetResponse` that delivers `reply` as a single delta.
    ///
    /// Most tests only care about the full reply text, not how it was
    /// split into deltas.
    #[inline]
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self::with_events([PresetEvent::MessageDelta(reply.into())])
    }

    /// Creates a `PresetResponse` that always fails.
    #[inline]
    pub fn failure() -> Self {
        Self {
            events: vec![],
            failing: true,
        }
    }
}
