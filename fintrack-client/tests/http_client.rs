use std::io::Write;
use std::time::Duration;

use chrono::NaiveDate;
use fintrack_client::{ApiClient, ApiError, FinTrackApi};
use fintrack_core::TransactionFilter;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Accept one connection, answer with `status` and a JSON `body`, and hand
/// back the raw request text.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        // headers, then as much body as Content-Length announces
        loop {
            let n = sock.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length")
                            .then(|| v.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    break;
                }
            }
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        sock.write_all(response.as_bytes()).await.unwrap();
        sock.shutdown().await.ok();
        String::from_utf8_lossy(&buf).to_string()
    });

    (format!("http://{addr}"), handle)
}

fn client(base: &str) -> ApiClient {
    ApiClient::new(base, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_tolerates_untidy_records() {
    let body = r#"[
        {"_id": "1", "is_transfer": true, "linked_tx_id": 42},
        {"_id": "2", "date": null, "amount": null, "is_transfer": null}
    ]"#;
    let (base, _server) = serve_once("200 OK", body).await;

    let txns = client(&base)
        .fetch_transactions(&TransactionFilter::default())
        .await
        .unwrap();
    assert_eq!(txns.len(), 2);
    assert_eq!(txns[0].transfer_link(), Some("42"));
    assert_eq!(txns[1].date, "");
    assert!(!txns[1].is_transfer);
}

#[tokio::test]
async fn test_fetch_transactions_sends_filters() {
    let body = r#"[
        {"_id": "1", "date": "2025-01-10", "description": "Uber trip", "amount": -18.5,
         "type": "expense", "category": "Transport", "is_transfer": false}
    ]"#;
    let (base, server) = serve_once("200 OK", body).await;

    let filter = TransactionFilter {
        start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
        end_date: None,
        vendor: Some("Uber".to_string()),
        category: None,
    };
    let txns = client(&base).fetch_transactions(&filter).await.unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].category.as_deref(), Some("Transport"));

    let request = server.await.unwrap();
    let request_line = request.lines().next().unwrap();
    assert_eq!(
        request_line,
        "GET /transactions?start_date=2025-01-01&vendor=Uber HTTP/1.1"
    );
}

#[tokio::test]
async fn test_unlink_posts_tx_id() {
    let (base, server) = serve_once("200 OK", r#"{"status": "success"}"#).await;
    client(&base).unlink_transfer("65f0a1").await.unwrap();

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /transfers/unlink HTTP/1.1"));
    assert!(request.ends_with(r#"{"tx_id":"65f0a1"}"#));
}

#[tokio::test]
async fn test_unlink_failure_carries_detail() {
    let (base, server) = serve_once("404 Not Found", r#"{"detail": "Transaction not found"}"#).await;
    let err = client(&base).unlink_transfer("nope").await.unwrap_err();
    server.await.unwrap();

    match err {
        ApiError::Status { status, detail } => {
            assert_eq!(status, 404);
            assert_eq!(detail.as_deref(), Some("Transaction not found"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_chat_round_trip() {
    let (base, server) = serve_once("200 OK", r#"{"response": "You spent $120 on food."}"#).await;
    let reply = client(&base).ask("How much on food?").await.unwrap();
    assert_eq!(reply.response, "You spent $120 on food.");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /chat HTTP/1.1"));
    assert!(request.ends_with(r#"{"message":"How much on food?"}"#));
}

#[tokio::test]
async fn test_upload_sends_multipart_file() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "Date,Description,Amount").unwrap();
    writeln!(file, "2025-01-03,DES: PAYROLL DEPOSIT,2812.50").unwrap();

    let (base, server) = serve_once("200 OK", r#"{"status": "success", "count": 1, "data": []}"#).await;
    let report = client(&base).upload_statement(file.path()).await.unwrap();
    assert_eq!(report.count, 1);

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /upload HTTP/1.1"));
    assert!(request.contains("multipart/form-data; boundary="));
    assert!(request.contains(r#"Content-Disposition: form-data; name="file"; filename=""#));
    assert!(request.contains("Content-Type: text/csv"));
    assert!(request.contains("DES: PAYROLL DEPOSIT"));
}

#[tokio::test]
async fn test_status_message() {
    let (base, server) = serve_once("200 OK", r#"{"message": "FinTrackAI Backend is running"}"#).await;
    let msg = client(&base).status().await.unwrap();
    server.await.unwrap();
    assert_eq!(msg, "FinTrackAI Backend is running");
}
