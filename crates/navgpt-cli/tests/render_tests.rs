use navgpt_cli::render::{render_conversation_list, render_message, render_reply, short_id};
use navgpt_core::{ConversationSummary, Message, RecencyGroup};

#[test]
fn test_render_plain_reply() {
    assert_eq!(render_reply("4"), "4\n");
}

#[test]
fn test_render_code_block() {
    let out = render_reply("Try:\n```python\nprint(1)\nprint(2)\n```");
    assert_eq!(out, "Try:\n┌─ python\n│ print(1)\n│ print(2)\n└─\n");
}

#[test]
fn test_render_steps() {
    let out = render_reply("Setup:\nStep 1: Install.\nStep 2: Run.");
    assert_eq!(out, "Setup:\n  1. Install.\n  2. Run.\n");
}

#[test]
fn test_render_messages_by_role() {
    assert_eq!(render_message(&Message::user("hi")), "You:\nhi\n");
    assert_eq!(render_message(&Message::assistant("hello")), "NavGPT:\nhello\n");
}

#[test]
fn test_render_empty_list() {
    assert_eq!(render_conversation_list(&[], None), "No chats yet\n");
}

#[test]
fn test_render_list_marks_current() {
    let groups = vec![(
        RecencyGroup::Today,
        vec![
            ConversationSummary {
                id: "aaaaaaaa1111".to_string(),
                title: "First".to_string(),
                created_at: 0,
                message_count: 2,
            },
            ConversationSummary {
                id: "bbbbbbbb2222".to_string(),
                title: "Second".to_string(),
                created_at: 0,
                message_count: 0,
            },
        ],
    )];
    let out = render_conversation_list(&groups, Some("bbbbbbbb2222"));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Today");
    assert!(lines[1].starts_with("   aaaaaaaa  First (2 messages"));
    assert!(lines[2].starts_with(" * bbbbbbbb  Second (0 messages"));
}

#[test]
fn test_short_id() {
    assert_eq!(short_id("0123456789abcdef"), "01234567");
    assert_eq!(short_id("abc"), "abc");
}
