use navgpt_core::relay::{NO_RESPONSE_MESSAGE, PROCESSING_FAILED_MESSAGE};
use navgpt_core::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Accept one connection, answer it with `status` and `body`, and hand back
/// the request head that was received.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/prompt", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&head).to_string()
    });

    (url, handle)
}

#[tokio::test]
async fn test_success_returns_response_field() {
    let (url, server) = serve_once("200 OK", r#"{"response":"4"}"#).await;
    let relay = HttpRelay::new(url);

    let outcome = relay.send("2+2?").await;
    assert_eq!(outcome, RelayOutcome::Success("4".to_string()));
    assert_eq!(outcome.into_display_text(), "4");

    let head = server.await.unwrap();
    assert!(head.starts_with("GET /prompt?text=2%2B2%3F HTTP/1.1"), "{head}");
    assert!(!head.contains("userId"));
}

#[tokio::test]
async fn test_user_id_and_encoding() {
    let (url, server) = serve_once("200 OK", r#"{"response":"ok"}"#).await;
    let relay = HttpRelay::new(url).with_user_id("abc123");

    let outcome = relay.send("hello world\nUser: hi").await;
    assert!(outcome.is_success());

    let head = server.await.unwrap();
    let request_line = head.lines().next().unwrap();
    assert!(request_line.contains("text=hello%20world%0AUser%3A%20hi"), "{request_line}");
    assert!(request_line.contains("&userId=abc123"), "{request_line}");
    assert!(head.to_lowercase().contains("content-type: application/json"));
}

#[tokio::test]
async fn test_non_success_status_falls_back() {
    let (url, server) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;
    let relay = HttpRelay::new(url);

    let outcome = relay.send("anything").await;
    assert_eq!(outcome, RelayOutcome::Failure(RelayFailure::Status(500)));
    assert_eq!(outcome.into_display_text(), PROCESSING_FAILED_MESSAGE);
    server.await.unwrap();
}

#[tokio::test]
async fn test_missing_response_field() {
    let (url, server) = serve_once("200 OK", r#"{"result":"4"}"#).await;
    let relay = HttpRelay::new(url);

    let outcome = relay.send("2+2?").await;
    assert_eq!(outcome, RelayOutcome::Failure(RelayFailure::MissingResponse));
    assert_eq!(outcome.into_display_text(), NO_RESPONSE_MESSAGE);
    server.await.unwrap();
}

#[tokio::test]
async fn test_invalid_json_falls_back() {
    let (url, server) = serve_once("200 OK", "not json").await;
    let relay = HttpRelay::new(url);

    let outcome = relay.send("2+2?").await;
    assert!(matches!(
        outcome,
        RelayOutcome::Failure(RelayFailure::Malformed(_))
    ));
    assert_eq!(outcome.into_display_text(), PROCESSING_FAILED_MESSAGE);
    server.await.unwrap();
}

#[tokio::test]
async fn test_connection_refused_falls_back() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/prompt", listener.local_addr().unwrap());
    drop(listener);

    let outcome = HttpRelay::new(url).send("2+2?").await;
    assert!(matches!(
        outcome,
        RelayOutcome::Failure(RelayFailure::Transport(_))
    ));
    assert_eq!(outcome.into_display_text(), PROCESSING_FAILED_MESSAGE);
}
