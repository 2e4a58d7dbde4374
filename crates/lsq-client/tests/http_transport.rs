//! HTTP transport tests against a throwaway local server.
//!
//! Each test binds a listener on an ephemeral port, answers exactly one
//! request with a scripted raw HTTP response, and hands back what it received.

use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use lsq_client::{ClientConfig, HttpTransport, LogseqClient, RpcTransport};
use lsq_core::error::{LsqError, RpcError};

/// What the fake server saw.
struct Received {
    head: String,
    body: String,
}

/// Serve one request. `None` means accept the connection and never answer.
async fn serve_once(response: Option<String>) -> (String, JoinHandle<Received>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let received = read_request(&mut socket).await;
        match response {
            Some(raw) => {
                socket.write_all(raw.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
            None => tokio::time::sleep(Duration::from_secs(30)).await,
        }
        received
    });

    (url, handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Received {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(split) = text.find("\r\n\r\n") {
            let head = text[..split].to_string();
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    if !name.eq_ignore_ascii_case("content-length") {
                        return None;
                    }
                    value.trim().parse::<usize>().ok()
                })
                .unwrap_or(0);
            let body = &text[split + 4..];
            if body.len() >= content_length {
                return Received {
                    head,
                    body: body.to_string(),
                };
            }
        }
    }
    Received {
        head: String::from_utf8_lossy(&buf).to_string(),
        body: String::new(),
    }
}

fn http_response(status: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn config(url: &str, timeout: Duration) -> ClientConfig {
    ClientConfig::new(url, "test-token", timeout).unwrap()
}

fn transport(url: &str, timeout: Duration) -> HttpTransport {
    HttpTransport::new(config(url, timeout)).unwrap()
}

#[tokio::test]
async fn posts_method_and_args_with_bearer_token() {
    let (url, server) = serve_once(Some(http_response(
        "200 OK",
        r#"{"name":"projects","originalName":"Projects"}"#,
    )))
    .await;

    let client = LogseqClient::http(config(&url, Duration::from_secs(5))).unwrap();
    let page = client.get_page("Projects").await.unwrap().unwrap();
    assert_eq!(page.display_name(), "Projects");

    let received = server.await.unwrap();
    assert!(received.head.starts_with("POST /api "));
    let head = received.head.to_ascii_lowercase();
    assert!(head.contains("authorization: bearer test-token"));
    let body: Value = serde_json::from_str(&received.body).unwrap();
    assert_eq!(
        body,
        json!({"method": "logseq.Editor.getPage", "args": ["Projects"]})
    );
}

#[tokio::test]
async fn non_success_status_carries_status_and_body() {
    let reply = http_response("401 Unauthorized", "Access Denied");
    let (url, server) = serve_once(Some(reply)).await;

    let err = transport(&url, Duration::from_secs(5))
        .call("logseq.Editor.getAllPages", vec![])
        .await
        .unwrap_err();
    server.await.unwrap();

    assert!(
        matches!(err, RpcError::Status { status: 401, .. }),
        "expected status error, got {err:?}"
    );
    assert!(err.to_string().contains("Access Denied"));
}

#[tokio::test]
async fn error_object_in_success_reply_is_remote_failure() {
    let (url, server) = serve_once(Some(http_response(
        "200 OK",
        r#"{"error":"MethodNotExist: logseq.Editor.nope"}"#,
    )))
    .await;

    let err = transport(&url, Duration::from_secs(5))
        .call("logseq.Editor.nope", vec![])
        .await
        .unwrap_err();
    server.await.unwrap();

    assert!(err.to_string().contains("MethodNotExist"));
    assert!(matches!(err, RpcError::Remote { .. }));
}

#[tokio::test]
async fn malformed_reply_is_decode_failure() {
    let (url, server) = serve_once(Some(http_response("200 OK", "<html>oops</html>"))).await;

    let err = transport(&url, Duration::from_secs(5))
        .call("logseq.Editor.getAllPages", vec![])
        .await
        .unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, RpcError::Decode { .. }));
}

#[tokio::test]
async fn silent_server_yields_timeout_error() {
    let (url, server) = serve_once(None).await;

    let err = transport(&url, Duration::from_millis(200))
        .call("logseq.Editor.getAllPages", vec![])
        .await
        .unwrap_err();
    server.abort();

    assert!(
        matches!(err, RpcError::Timeout { .. }),
        "expected timeout, got {err:?}"
    );
    assert!(err.to_string().contains("timed out after 200ms"));
}

#[tokio::test]
async fn unreachable_server_is_transport_failure_not_timeout() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = LogseqClient::http(config(&url, Duration::from_secs(5))).unwrap();
    let err = client.get_all_pages().await.unwrap_err();

    assert!(matches!(err, LsqError::Rpc(RpcError::Transport { .. })));
    assert!(!err.to_string().contains("timed out"));
}
