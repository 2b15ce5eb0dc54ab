//! Intent classification for user turns.
//!
//! Classification is delegated to the model: the classifier prompt asks
//! for exactly one of a fixed set of reply formats, and [`parse_reply`]
//! maps the reply back to an [`Intent`] with mutually exclusive
//! string-prefix checks. A few cases need no model call at all and are
//! handled by [`short_circuit`] first.

/// The kind of content the assistant can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
    /// A blog post.
    Blog,
    /// A professional email.
    Email,
    /// A video script.
    Video,
}

impl ContentKind {
    /// Detects a content kind mentioned in free-form user text.
    pub fn from_keyword(text: &str) -> Option<Self> {
        let text = text.to_lowercase();
        if text.contains("blog") {
            Some(ContentKind::Blog)
        } else if text.contains("email") {
            Some(ContentKind::Email)
        } else if text.contains("video") {
            Some(ContentKind::Video)
        } else {
            None
        }
    }

    /// Maps a classifier type label to a content kind.
    ///
    /// Labels are matched by substring so minor variations (`BLOG POST`,
    /// `YOUTUBE VIDEO`) still resolve; anything unrecognized defaults to
    /// a blog post.
    pub fn from_label(label: &str) -> Self {
        let label = label.to_uppercase();
        if label.contains("BLOG") {
            ContentKind::Blog
        } else if label.contains("EMAIL") {
            ContentKind::Email
        } else if label.contains("VIDEO") || label.contains("YOUTUBE") {
            ContentKind::Video
        } else {
            ContentKind::Blog
        }
    }

    /// Returns the canonical classifier label, e.g. `BLOG`.
    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Blog => "BLOG",
            ContentKind::Email => "EMAIL",
            ContentKind::Video => "VIDEO",
        }
    }

    /// Returns the lowercase noun used in user-facing replies.
    pub fn noun(self) -> &'static str {
        match self {
            ContentKind::Blog => "blog",
            ContentKind::Email => "email",
            ContentKind::Video => "video",
        }
    }
}

/// A classified user intent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// The user is done with the conversation.
    Quit,
    /// A complete content request: topic and kind are both known.
    ContentRequest {
        /// What the content should be about.
        topic: String,
        /// Which template to generate with.
        kind: ContentKind,
    },
    /// A topic without a kind; the assistant must ask for the kind.
    AskType {
        /// The topic the user mentioned.
        topic: String,
    },
    /// A kind without a topic; the assistant must ask for the topic.
    AskTopic {
        /// The kind the user mentioned.
        kind: ContentKind,
    },
    /// A content request with neither topic nor kind.
    AskBoth,
    /// A follow-up question about the current work.
    RelatedQuery,
    /// A greeting, carrying the greeting text to reply with.
    Greeting(String),
    /// A request to pick the best of previous results.
    SelectBest,
    /// A request to edit or adjust previous content.
    EditContent,
    /// A request for research references and sources.
    ProvideReferences,
    /// A message unrelated to content creation.
    OffTopic,
    /// A classifier reply that matched no known format; forwarded as-is.
    Verbatim(String),
}

/// Resolves the intents that need no model call.
///
/// Three cases are decided locally: the exact `QUIT` command, a type
/// keyword answering a pending "which type?" question, and a short reply
/// answering a pending "which topic?" question.
pub fn short_circuit(
    input: &str,
    topic: Option<&str>,
    kind: Option<ContentKind>,
) -> Option<Intent> {
    if input == "QUIT" {
        return Some(Intent::Quit);
    }

    // We had a topic, now we get a type.
    if let Some(topic) = topic {
        if kind.is_none() {
            if let Some(kind) = ContentKind::from_keyword(input) {
                return Some(Intent::ContentRequest {
                    topic: topic.to_owned(),
                    kind,
                });
            }
        }
    }

    // We had a type, now we get a topic. A short message is assumed to
    // be the topic rather than a new command.
    if let Some(kind) = kind {
        if topic.is_none() && input.split_whitespace().count() < 10 {
            return Some(Intent::ContentRequest {
                topic: input.to_owned(),
                kind,
            });
        }
    }

    None
}

/// Parses the classifier's reply into an intent.
///
/// The reply formats are mutually exclusive prefixes. A reply that
/// matches none of them (or a content request whose payload cannot be
/// split into topic and type) is forwarded verbatim; there is no
/// fallback and no retry.
pub fn parse_reply(reply: &str) -> Intent {
    let reply = reply.trim();

    if let Some(payload) = reply.strip_prefix("CONTENT_REQUEST:") {
        let Some((topic, label)) = payload.split_once('|') else {
            debug!("unparseable content request: {reply}");
            return Intent::Verbatim(reply.to_owned());
        };
        return Intent::ContentRequest {
            topic: topic.trim().to_owned(),
            kind: ContentKind::from_label(label.trim()),
        };
    }
    if let Some(topic) = reply.strip_prefix("ASK_TYPE:") {
        return Intent::AskType {
            topic: topic.trim().to_owned(),
        };
    }
    if let Some(label) = reply.strip_prefix("ASK_TOPIC:") {
        return Intent::AskTopic {
            kind: ContentKind::from_label(label.trim()),
        };
    }
    if reply.starts_with("ASK_BOTH") {
        return Intent::AskBoth;
    }
    if reply.starts_with("RELATED_QUERY:") {
        return Intent::RelatedQuery;
    }
    if let Some(greeting) = reply.strip_prefix("GREETING:") {
        return Intent::Greeting(greeting.trim().to_owned());
    }
    if reply.starts_with("SELECT_BEST") {
        return Intent::SelectBest;
    }
    if reply.starts_with("EDIT_CONTENT") {
        return Intent::EditContent;
    }
    if reply.starts_with("PROVIDE_REFERENCES") {
        return Intent::ProvideReferences;
    }
    if reply.starts_with("OFF_TOPIC:") {
        return Intent::OffTopic;
    }

    Intent::Verbatim(reply.to_owned())
}
