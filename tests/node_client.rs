mod common;

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use x16rs_stats::node::{FetchError, HeaderSource, NodeClient, NodeConfig};

/// Serve `requests` canned responses; the handler gets the request line
async fn serve(requests: usize, handler: fn(&str) -> (u16, String)) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        for _ in 0..requests {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let request = String::from_utf8_lossy(&buf);
            let line = request.lines().next().unwrap_or_default().to_string();

            let (status, body) = handler(&line);
            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
    });

    format!("http://{}", addr)
}

fn client(url: String) -> NodeClient {
    NodeClient::new(NodeConfig::new(url).with_timeout(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_block_intro() {
    let url = serve(1, |line| {
        assert!(line.starts_with("GET /query/block/intro?height=591819 "), "{}", line);
        let mut body = serde_json::to_value(common::sample_intro(591_819)).unwrap();
        body["ret"] = json!(0);
        (200, body.to_string())
    })
    .await;

    let intro = client(url).fetch(591_819).await.unwrap();
    assert_eq!(intro, common::sample_intro(591_819));
}

#[tokio::test]
async fn test_node_rejection() {
    let url = serve(1, |_| (200, json!({"ret": 1, "err": "block not find"}).to_string())).await;

    let err = client(url).fetch(99_999_999).await.unwrap_err();
    assert!(
        matches!(err, FetchError::Rejected { height: 99_999_999, ref message } if message == "block not find")
    );
}

#[tokio::test]
async fn test_http_error_status() {
    let url = serve(1, |_| (500, "{}".to_string())).await;

    let err = client(url).fetch(1).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { height: 1, status } if status.as_u16() == 500));
}

#[tokio::test]
async fn test_unreachable_node() {
    // Bind then drop to get a port with nothing listening
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(format!("http://{}", addr)).fetch(1).await.unwrap_err();
    assert!(matches!(err, FetchError::Request(_)));
}
