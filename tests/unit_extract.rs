// Unit tests for the literal, local, and remote extractors.
//
// Remote tests talk to a throwaway HTTP responder on 127.0.0.1, so no
// outside network access is needed.

use std::io::Write;
use std::path::PathBuf;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use wordtally::config::Config;
use wordtally::extract::{
    extractor_for, LiteralExtractor, LocalExtractor, RemoteExtractor, SourceDescriptor,
    TextExtractor,
};

/// Serve one canned HTTP response, then stop. Returns the base URL.
async fn serve_once(status: &'static str, content_type: Option<&'static str>, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // Read until the end of the request headers
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let mut response = format!("HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n", body.len());
        if let Some(ct) = content_type {
            response.push_str(&format!("Content-Type: {ct}\r\n"));
        }
        response.push_str("\r\n");
        response.push_str(&body);

        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    format!("http://{addr}/doc")
}

fn test_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

// ============================================================
// Literal
// ============================================================

#[tokio::test]
async fn literal_returns_text_verbatim() {
    let ex = LiteralExtractor::new("Hello, world!");
    assert_eq!(ex.extract().await.unwrap(), "Hello, world!");
    assert_eq!(ex.label(), "literal text (13 chars)");
}

// ============================================================
// Local
// ============================================================

#[tokio::test]
async fn local_reads_existing_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "line one\nline two").unwrap();

    let ex = LocalExtractor::new(file.path(), 1024);
    assert_eq!(ex.extract().await.unwrap(), "line one\nline two");
}

#[tokio::test]
async fn local_missing_file_fails_with_path() {
    let dir = tempfile::TempDir::new().unwrap();
    let missing = dir.path().join("nope.txt");

    let ex = LocalExtractor::new(&missing, 1024);
    let err = ex.extract().await.unwrap_err();
    assert!(format!("{err:#}").contains("nope.txt"));
}

#[tokio::test]
async fn local_directory_is_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let ex = LocalExtractor::new(dir.path(), 1024);
    assert!(ex.extract().await.is_err());
}

#[tokio::test]
async fn local_oversized_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[b'a'; 64]).unwrap();

    let ex = LocalExtractor::new(file.path(), 16);
    let err = ex.extract().await.unwrap_err();
    assert!(err.to_string().contains("limit"));
}

#[tokio::test]
async fn local_invalid_utf8_is_replaced() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"ok \xff ok").unwrap();

    let text = LocalExtractor::new(file.path(), 1024).extract().await.unwrap();
    assert!(text.starts_with("ok "));
    assert!(text.ends_with(" ok"));
}

// ============================================================
// Remote
// ============================================================

#[tokio::test]
async fn remote_html_keeps_visible_text_only() {
    let body = "<html><head><script>var hidden = 1;</script></head>\
                <body><h1>Title</h1><p>Some body text</p></body></html>"
        .to_string();
    let url = serve_once("200 OK", Some("text/html; charset=utf-8"), body).await;

    let text = RemoteExtractor::new(test_client(), url, 1 << 20)
        .extract()
        .await
        .unwrap();
    let words: Vec<&str> = text.split_whitespace().collect();
    assert_eq!(words, vec!["Title", "Some", "body", "text"]);
}

#[tokio::test]
async fn remote_plain_text_is_verbatim() {
    let url = serve_once("200 OK", Some("text/plain"), "<not> markup".to_string()).await;
    let text = RemoteExtractor::new(test_client(), url, 1 << 20)
        .extract()
        .await
        .unwrap();
    assert_eq!(text, "<not> markup");
}

#[tokio::test]
async fn remote_error_status_fails() {
    let url = serve_once("404 Not Found", Some("text/html"), "<p>gone</p>".to_string()).await;
    let err = RemoteExtractor::new(test_client(), url, 1 << 20)
        .extract()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn remote_oversized_body_fails() {
    let url = serve_once("200 OK", Some("text/plain"), "word ".repeat(100)).await;
    let err = RemoteExtractor::new(test_client(), url, 64)
        .extract()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("limit"));
}

#[tokio::test]
async fn remote_unreachable_host_fails() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let ex = RemoteExtractor::new(test_client(), format!("http://{addr}/"), 1024);
    assert!(ex.extract().await.is_err());
}

// ============================================================
// Descriptor dispatch
// ============================================================

#[tokio::test]
async fn extractor_for_dispatches_by_kind() {
    let config = Config::default();
    let client = test_client();

    let literal = extractor_for(&SourceDescriptor::Literal("a b".to_string()), &client, &config);
    assert_eq!(literal.extract().await.unwrap(), "a b");

    let path = PathBuf::from("/definitely/not/here.txt");
    let local = extractor_for(&SourceDescriptor::Local(path), &client, &config);
    assert_eq!(local.label(), "/definitely/not/here.txt");
    assert!(local.extract().await.is_err());

    let remote = extractor_for(
        &SourceDescriptor::Remote("http://example.invalid/page".to_string()),
        &client,
        &config,
    );
    assert_eq!(remote.label(), "http://example.invalid/page");
}
