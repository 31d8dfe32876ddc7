use crate::session::Message;

macro_rules! answer_style {
    () => {
        "For simple questions like math, general knowledge, or casual conversation, \
provide direct answers without code examples unless specifically requested. \
Only use code formatting and step-by-step technical explanations \
for programming or technical questions."
    };
}

/// Instructions appended after a transcript of prior messages.
pub const CONTINUATION_INSTRUCTIONS: &str = concat!(
    "Please continue this conversation and stay on topic. ",
    "Respond naturally based on the type of question. ",
    answer_style!()
);

/// Instructions appended to the opening message of a conversation.
pub const FIRST_MESSAGE_INSTRUCTIONS: &str = concat!(
    "Please respond naturally based on the type of question. ",
    answer_style!()
);

/// Build the single text payload sent to the model.
///
/// With history, the payload is a role-tagged transcript followed by the new
/// utterance as a `User:` line and [`CONTINUATION_INSTRUCTIONS`]. Without
/// history, the utterance is sent bare, followed by
/// [`FIRST_MESSAGE_INSTRUCTIONS`].
pub fn format_context(text: &str, history: &[Message]) -> String {
    if history.is_empty() {
        return format!("{}\n\n{}", text, FIRST_MESSAGE_INSTRUCTIONS);
    }

    let mut context = history
        .iter()
        .map(|m| format!("{}: {}", m.role.label(), m.content))
        .collect::<Vec<_>>()
        .join("\n");

    context.push_str(&format!("\nUser: {}\n\n", text));
    context.push_str(CONTINUATION_INSTRUCTIONS);
    context
}
