//! Prompt templates and canned replies.
//!
//! Every text the pipeline sends to the model or to the user lives here,
//! so the turn logic stays free of string literals.

use crate::intent::ContentKind;

pub(crate) const GOODBYE: &str = "Goodbye! Have a great day!";

pub(crate) const OFF_TOPIC: &str = "I apologize, but I can only assist with \
    content creation or topics related to our current project. How can I \
    help you create content today?";

pub(crate) const ASK_BOTH: &str = "I'd love to help you create some content! \
    To get started, could you tell me:\n1. What topic would you like to \
    cover?\n2. What type of content do you need (Blog post, Email, or Video \
    script)?";

/// Substituted for the research text when the lookup fails or no research
/// backend is configured.
pub(crate) const RESEARCH_UNAVAILABLE: &str = "Research data unavailable";

/// Substituted into the references prompt when no lookup has happened yet.
pub(crate) const NO_RESEARCH_DATA: &str = "No recent research data available.";

pub(crate) fn ask_type(topic: &str) -> String {
    format!(
        "I'd be happy to help you create content about {topic}! What type \
         of content would you like me to create?\n\n1. Blog post\n2. Email\n\
         3. Video script\n\nPlease specify which type you'd prefer."
    )
}

pub(crate) fn ask_topic(kind: ContentKind) -> String {
    let noun = kind.noun();
    format!(
        "I can definitely help you create a {noun}! What topic should I \
         cover in this {noun}?"
    )
}

pub(crate) fn classifier(
    history_tail: &str,
    input: &str,
    topic: Option<&str>,
    kind: Option<ContentKind>,
) -> String {
    let topic = topic.unwrap_or("None");
    let kind = kind.map(ContentKind::label).unwrap_or("None");
    format!(
        r#"Conversation History:
{history_tail}

Latest User Message: "{input}"

Current State: Topic={topic}, Content Type={kind}

Analyze the message based on the rules below.

RULES:
1. If user mentions specific topic AND specific type (blog/email/video): "CONTENT_REQUEST: [topic] | [TYPE]"
   - "give blog for salesforce" -> "CONTENT_REQUEST: Salesforce | BLOG"
2. If user mentions specific topic but NO type: "ASK_TYPE: [topic]"
   - "create content for project manager" -> "ASK_TYPE: project manager"
3. If user mentions specific type (blog/email/video) but NO topic: "ASK_TOPIC: [TYPE]"
   - "create a blog" -> "ASK_TOPIC: BLOG"
4. If user wants content but NO topic and NO type: "ASK_BOTH"
   - "need content creation" -> "ASK_BOTH"
5. If the message is a FOLLOW-UP question or comment RELATED to the previous AI response or current state: "RELATED_QUERY: [user_input]"
6. If user says a greeting (hi, hello, etc.): "GREETING: [polite greeting]"
7. If user asks to PICK or SELECT from previous results: "SELECT_BEST: [user_input]"
8. If user asks to EDIT, ADJUST, or MODIFY previous content: "EDIT_CONTENT: [user_input]"
9. If user asks for RESEARCH REFERENCES: "PROVIDE_REFERENCES: [user_input]"
10. If the message is NOT about content creation or the current conversation topic: "OFF_TOPIC: [message]"

Respond with EXACTLY one of the formats above."#
    )
}

pub(crate) fn related_query(history_tail: &str, input: &str) -> String {
    format!(
        "Based on our conversation history:\n{history_tail}\n\nUser asked: \
         {input}\n\nPlease provide a helpful answer related to our current \
         work."
    )
}

pub(crate) fn select_best(history_tail: &str, input: &str) -> String {
    format!(
        "Review the user's request: \"{input}\"\n\nPrevious conversation \
         context:\n{history_tail}\n\nThe user is asking to pick the best \
         option or select one from previous results.\nAnalyze the previous \
         options discussed and recommend the best one with a clear \
         justification."
    )
}

pub(crate) fn edit_content(history_tail: &str, input: &str) -> String {
    format!(
        "Review the user's request to edit or adjust the content: \
         \"{input}\"\n\nPrevious conversation context:\n{history_tail}\n\n\
         Please provide the edited or adjusted content based on the user's \
         instructions. Keep the same format as the original content unless \
         requested otherwise."
    )
}

pub(crate) fn references(input: &str, research: &str) -> String {
    format!(
        "The user is asking for research references, sources, or links for \
         the previous topic.\nUser request: \"{input}\"\n\nHere is the most \
         recent research data containing sources and URLs:\n{research}\n\n\
         Please provide a polite response sharing the reference URLs and \
         sources from the research data above. Do not hallucinate links not \
         present in the research data."
    )
}

pub(crate) fn generation(
    kind: ContentKind,
    topic: &str,
    research: &str,
) -> String {
    match kind {
        ContentKind::Blog => format!(
            "Create a comprehensive blog post about {topic}.\n\nResearch \
             Data:\n{research}\n\nInclude:\n- Engaging title\n- Introduction\n\
             - 3-4 main sections with subheadings\n- Conclusion\n- Use the \
             research data to make it current and accurate"
        ),
        ContentKind::Email => format!(
            "Create a professional email about {topic}.\n\nResearch Data:\n\
             {research}\n\nInclude:\n- Subject line\n- Professional greeting\n\
             - Clear and concise body with key points\n- Call to action\n\
             - Professional closing\n- Use the research data for accuracy"
        ),
        ContentKind::Video => format!(
            "Create a video script about {topic}.\n\nResearch Data:\n\
             {research}\n\nInclude:\n- Hook (first 10 seconds)\n\
             - Introduction\n- Main content points (3-4 key points)\n\
             - Conclusion with call to action\n- Estimated timing for each \
             section\n- Use the research data for current information"
        ),
    }
}
