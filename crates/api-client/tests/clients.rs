//! Clients against a throwaway HTTP responder on 127.0.0.1.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use jarvis_api_client::{ChatClient, ClientError, OpsClient, RetryConfig, SlackNotifier};
use jarvis_core::intelligence::Provider;

/// Captured request: request line + headers + body.
type Captured = tokio::sync::oneshot::Receiver<String>;

/// Serve exactly one request with `status` and `body`, returning the base url.
async fn serve_once(status: u16, body: &'static str) -> (String, Captured) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        let response = format!(
            "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();
        let _ = tx.send(request);
    });
    (format!("http://{addr}"), rx)
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|l| {
                    let (k, v) = l.split_once(':')?;
                    k.eq_ignore_ascii_case("content-length")
                        .then(|| v.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[tokio::test]
async fn openai_reply_is_extracted_and_bearer_sent() {
    let (url, captured) = serve_once(
        200,
        r#"{"choices":[{"message":{"role":"assistant","content":"  Frete sobe 3%.  "}}]}"#,
    )
    .await;
    let client = ChatClient::new(Provider::OpenAi, "sk-test", "gpt-4o-mini", Duration::from_secs(5))
        .unwrap()
        .with_base_url(&url);

    let reply = client.complete("sistema", "como está o frete?").await.unwrap();
    assert_eq!(reply, "Frete sobe 3%.");

    let request = captured.await.unwrap();
    assert!(request.starts_with("POST /chat/completions"), "{request}");
    assert!(request.to_ascii_lowercase().contains("authorization: bearer sk-test"));
    assert!(request.contains(r#""model":"gpt-4o-mini""#));
}

#[tokio::test]
async fn anthropic_joins_text_blocks() {
    let (url, captured) = serve_once(
        200,
        r#"{"content":[{"type":"text","text":"Olá"},{"type":"tool_use","id":"x"},{"type":"text","text":"chefe"}]}"#,
    )
    .await;
    let client = ChatClient::new(Provider::Anthropic, "ant", "claude", Duration::from_secs(5))
        .unwrap()
        .with_base_url(&url);

    assert_eq!(client.complete("s", "oi").await.unwrap(), "Olá\nchefe");
    let request = captured.await.unwrap().to_ascii_lowercase();
    assert!(request.starts_with("post /messages"));
    assert!(request.contains("x-api-key: ant"));
    assert!(request.contains("anthropic-version: 2023-06-01"));
}

#[tokio::test]
async fn status_errors_keep_code_and_body() {
    let (url, _) = serve_once(401, r#"{"error":"bad key"}"#).await;
    let client = ChatClient::new(Provider::Perplexity, "k", "sonar", Duration::from_secs(5))
        .unwrap()
        .with_base_url(&url);

    let err = client.complete("s", "oi").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(!err.is_retryable());
    assert!(err.to_string().contains("bad key"));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let ops = OpsClient::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    let err = ops.status().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn slack_client_errors_are_not_retried() {
    let (url, captured) = serve_once(400, "invalid_payload").await;
    let slack = SlackNotifier::new(&url, Duration::from_secs(5))
        .unwrap()
        .with_retry(RetryConfig::default());

    let err = slack.notify("Carga entregue", Some("#ops")).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    let request = captured.await.unwrap();
    assert!(request.contains(r##""channel":"#ops""##), "{request}");
}

#[tokio::test]
async fn slack_without_retries_reports_the_first_server_error() {
    let (url, captured) = serve_once(503, "busy").await;
    let slack = SlackNotifier::new(&url, Duration::from_secs(5))
        .unwrap()
        .with_retry(RetryConfig::none());

    let started = std::time::Instant::now();
    let err = slack.notify("Carga entregue", None).await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(started.elapsed() < Duration::from_secs(1));
    captured.await.unwrap();
}
