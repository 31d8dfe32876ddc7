use navgpt_cli::{App, Flow};
use navgpt_core::preferences::chat_namespace;
use navgpt_core::*;
use std::sync::Arc;
use tempfile::TempDir;

struct EchoRelay;

#[async_trait::async_trait]
impl Relay for EchoRelay {
    async fn send(&self, prompt: &str) -> RelayOutcome {
        let first_line = prompt.lines().next().unwrap_or_default().to_string();
        RelayOutcome::Success(format!("echo: {first_line}"))
    }
}

fn app_with(snapshots: Arc<dyn SnapshotStore>) -> App<EchoRelay> {
    let prefs = PreferencesStore::load(snapshots.clone()).unwrap();
    App::with_relay(snapshots, prefs, EchoRelay).unwrap()
}

async fn run(app: &mut App<EchoRelay>, line: &str) -> String {
    let mut out = String::new();
    assert_eq!(app.handle_line(line, &mut out).await.unwrap(), Flow::Continue);
    out
}

#[tokio::test]
async fn test_startup_creates_current_conversation() {
    let app = app_with(Arc::new(MemorySnapshotStore::new()));
    assert_eq!(app.chat().store().len(), 1);
    assert!(app.chat().store().current_id().is_some());
}

#[tokio::test]
async fn test_chat_turn_renders_reply() {
    let mut app = app_with(Arc::new(MemorySnapshotStore::new()));
    let out = run(&mut app, "hello there").await;
    assert_eq!(out, "echo: hello there\n");
    assert_eq!(app.chat().store().current().unwrap().messages.len(), 2);
}

#[tokio::test]
async fn test_quit() {
    let mut app = app_with(Arc::new(MemorySnapshotStore::new()));
    let mut out = String::new();
    assert_eq!(app.handle_line("/quit", &mut out).await.unwrap(), Flow::Quit);
}

#[tokio::test]
async fn test_new_switch_and_list() {
    let mut app = app_with(Arc::new(MemorySnapshotStore::new()));
    let first = app.chat().store().current_id().unwrap().to_string();

    run(&mut app, "/new").await;
    assert_ne!(app.chat().store().current_id(), Some(first.as_str()));
    assert_eq!(app.chat().store().len(), 2);

    let out = run(&mut app, &format!("/switch {}", &first[..10])).await;
    assert_eq!(app.chat().store().current_id(), Some(first.as_str()));
    assert!(out.contains("New Chat"));

    let listing = run(&mut app, "/list").await;
    assert!(listing.starts_with("Today\n"));
    assert_eq!(listing.matches('*').count(), 1);

    let out = run(&mut app, "/switch zzzz").await;
    assert!(out.contains("No conversation matches 'zzzz'"));
}

#[tokio::test]
async fn test_ambiguous_prefix_is_reported() {
    let mut app = app_with(Arc::new(MemorySnapshotStore::new()));
    // 17 hex ids cannot all start with distinct characters.
    for _ in 0..16 {
        run(&mut app, "/new").await;
    }
    let current = app.chat().store().current_id().unwrap().to_string();
    let ids: Vec<String> = app.chat().store().list().into_iter().map(|s| s.id).collect();
    assert_eq!(ids.len(), 17);
    let prefix = ids
        .iter()
        .map(|id| &id[..1])
        .find(|p| ids.iter().filter(|id| id.starts_with(*p)).count() > 1)
        .unwrap()
        .to_string();
    let shared = ids.iter().filter(|id| id.starts_with(&prefix)).count();

    let out = run(&mut app, &format!("/switch {prefix}")).await;
    assert!(out.contains(&format!("'{prefix}' matches {shared} conversations")), "{out}");
    assert!(!out.contains("No conversation matches"));
    assert_eq!(app.chat().store().current_id(), Some(current.as_str()));

    let out = run(&mut app, &format!("/delete {prefix}")).await;
    assert!(out.contains("use a longer id prefix"), "{out}");
    assert_eq!(app.chat().store().len(), 17);
}

#[tokio::test]
async fn test_delete_current_selects_replacement() {
    let mut app = app_with(Arc::new(MemorySnapshotStore::new()));
    let only = app.chat().store().current_id().unwrap().to_string();

    run(&mut app, "/delete").await;
    let store = app.chat().store();
    assert_eq!(store.len(), 1);
    let replacement = store.current_id().unwrap();
    assert_ne!(replacement, only);

    run(&mut app, "/new").await;
    let newest = app.chat().store().current_id().unwrap().to_string();
    run(&mut app, "/delete").await;
    // Falls back to the newest remaining conversation.
    assert_eq!(app.chat().store().len(), 1);
    assert_ne!(app.chat().store().current_id(), Some(newest.as_str()));
}

#[tokio::test]
async fn test_rename_current() {
    let mut app = app_with(Arc::new(MemorySnapshotStore::new()));
    let out = run(&mut app, "/rename Weekend plans").await;
    assert_eq!(out, "Renamed to Weekend plans\n");
    assert_eq!(app.chat().store().current().unwrap().title, "Weekend plans");

    let out = run(&mut app, "/rename Weekend plans").await;
    assert_eq!(out, "Title unchanged\n");
}

#[tokio::test]
async fn test_preferences_persist_across_restart() {
    let temp_dir = TempDir::new().unwrap();
    let snapshots: Arc<dyn SnapshotStore> =
        Arc::new(FileSnapshotStore::with_dir(temp_dir.path()).unwrap());

    let conversation_id = {
        let mut app = app_with(snapshots.clone());
        run(&mut app, "/theme light").await;
        run(&mut app, "remember me").await;
        app.chat().store().current_id().unwrap().to_string()
    };

    let app = app_with(snapshots.clone());
    assert_eq!(app.preferences().preferences().theme, Theme::Light);
    assert_eq!(chat_namespace(snapshots.as_ref()), app.preferences().user_id());
    assert_eq!(app.chat().store().current_id(), Some(conversation_id.as_str()));
    assert_eq!(
        app.chat().store().current().unwrap().title,
        "remember me"
    );
}
