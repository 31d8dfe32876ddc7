mod formatter;

pub use formatter::{format_context, CONTINUATION_INSTRUCTIONS, FIRST_MESSAGE_INSTRUCTIONS};
