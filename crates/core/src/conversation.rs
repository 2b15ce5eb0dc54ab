//! Conversation-related types.

/// Represents a conversation transcript.
///
/// The transcript is append-only: every handled turn adds the user input
/// and the assistant reply, and nothing is ever rewritten.
#[derive(Clone, Default, Debug)]
pub struct Conversation {
    turns: Vec<Turn>,
}

/// A single turn in the conversation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    speaker: Speaker,
    text: String,
}

/// Who produced a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speaker {
    /// The human side of the conversation.
    User,
    /// The assistant side of the conversation.
    Assistant,
}

impl Turn {
    /// Returns the transcript line for this turn, e.g. `User: hello`.
    pub fn transcript(&self) -> String {
        let prefix = match self.speaker {
            Speaker::User => "User",
            Speaker::Assistant => "AI",
        };
        format!("{prefix}: {}", self.text)
    }

    /// Returns the raw text of this turn.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns who produced this turn.
    #[inline]
    pub fn speaker(&self) -> Speaker {
        self.speaker
    }
}

impl Conversation {
    /// Appends a user turn.
    pub fn push_user<S: Into<String>>(&mut self, text: S) {
        self.turns.push(Turn {
            speaker: Speaker::User,
            text: text.into(),
        });
    }

    /// Appends an assistant turn.
    pub fn push_assistant<S: Into<String>>(&mut self, text: S) {
        self.turns.push(Turn {
            speaker: Speaker::Assistant,
            text: text.into(),
        });
    }

    /// Returns all turns in order.
    #[inline]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns `true` when no turn has been recorded yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Renders the last `max_turns` turns as newline-joined transcript
    /// lines, oldest first. Prompt templates embed this as their history
    /// window.
    pub fn render_tail(&self, max_turns: usize) -> String {
        let skip = self.turns.len().saturating_sub(max_turns);
        let mut tail = String::new();
        for turn in &self.turns[skip..] {
            if !tail.is_empty() {
                tail.push('\n');
            }
            tail.push_str(&turn.transcript());
        }
        tail
    }
}
