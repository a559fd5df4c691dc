use std::path::PathBuf;
use std::sync::Arc;

use shelf::config::Limits;
use shelf::files::listing::DirTemplate;
use shelf::http::connection::Connection;
use shelf::server::SiteContext;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const TEMPLATE: &str = "<ul>{{#each files}}<li><a href=\"{{../dir_name}}/{{this}}\">{{this}}</a></li>{{/each}}</ul>";

/// Throwaway served root under the system temp dir.
struct TempRoot {
    path: PathBuf,
}

impl TempRoot {
    fn new(tag: &str) -> Self {
        let path = std::env::temp_dir().join(format!("shelf-conn-{}-{}", tag, std::process::id()));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).unwrap();
        let path = std::fs::canonicalize(&path).unwrap();
        Self { path }
    }

    fn write(&self, name: &str, content: &[u8]) {
        std::fs::write(self.path.join(name), content).unwrap();
    }

    fn site(&self) -> Arc<SiteContext> {
        Arc::new(SiteContext {
            root: self.path.clone(),
            template: DirTemplate::from_source(TEMPLATE).unwrap(),
            limits: Limits {
                max_header_bytes: 64 * 1024,
                io_timeout_secs: 5,
            },
        })
    }
}

impl Drop for TempRoot {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// Run one request through a full connection and collect the raw response.
async fn exchange(ctx: Arc<SiteContext>, request: &[u8]) -> Vec<u8> {
    let (mut client, server) = tokio::io::duplex(64 * 1024);

    let conn = Connection::new(server, "test-peer".to_string(), ctx);
    let task = tokio::spawn(conn.run());

    client.write_all(request).await.unwrap();

    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();
    task.await.unwrap();

    response
}

/// Split a raw response into its header text and body bytes.
fn split_response(response: &[u8]) -> (String, Vec<u8>) {
    let pos = response
        .windows(2)
        .position(|w| w == b"\n\n")
        .expect("response has no header terminator");
    let head = String::from_utf8(response[..pos + 1].to_vec()).unwrap();
    (head, response[pos + 2..].to_vec())
}

fn header_value<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines()
        .find_map(|l| l.strip_prefix(&format!("{name}: ")))
}

#[tokio::test]
async fn test_serves_file_byte_identical() {
    let root = TempRoot::new("file");
    root.write("index.html", b"hello world\n");

    let response = exchange(
        root.site(),
        b"GET /index.html HTTP/1.1\r\nHost: x\r\n\r\n",
    )
    .await;
    let (head, body) = split_response(&response);

    assert!(head.starts_with("HTTP/1.1 200 OK\n"));
    assert_eq!(header_value(&head, "Size"), Some("12"));
    assert_eq!(header_value(&head, "Content-Type"), Some("text/html"));
    assert_eq!(header_value(&head, "Connection"), Some("close"));
    assert_eq!(body, b"hello world\n");
}

#[tokio::test]
async fn test_missing_file_is_404_without_body() {
    let root = TempRoot::new("missing");

    let response = exchange(
        root.site(),
        b"GET /missing.txt HTTP/1.1\r\nHost: x\r\n\r\n",
    )
    .await;
    let (head, body) = split_response(&response);

    assert!(head.starts_with("HTTP/1.1 404 Not Found\n"));
    assert!(header_value(&head, "Content-Type").is_none());
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_malformed_request_line_is_400() {
    let root = TempRoot::new("badreq");

    let response = exchange(root.site(), b"FOO BAR\r\n\r\n").await;
    let (head, body) = split_response(&response);

    assert!(head.starts_with("HTTP/1.1 400 Bad Request\n"));
    assert!(header_value(&head, "Content-Type").is_none());
    assert!(header_value(&head, "Size").is_none());
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_directory_listing_excludes_dotfiles() {
    let root = TempRoot::new("dir");
    std::fs::create_dir(root.path.join("sub")).unwrap();
    std::fs::write(root.path.join("sub/a.txt"), b"a").unwrap();
    std::fs::write(root.path.join("sub/.hidden"), b"h").unwrap();

    let response = exchange(root.site(), b"GET /sub HTTP/1.1\r\nHost: x\r\n\r\n").await;
    let (head, body) = split_response(&response);

    assert!(head.starts_with("HTTP/1.1 200 OK\n"));
    assert_eq!(header_value(&head, "Content-Type"), Some("text/html"));

    let html = String::from_utf8(body.clone()).unwrap();
    assert!(html.contains("a.txt"));
    assert!(!html.contains(".hidden"));

    // The declared size matches the rendered buffer exactly.
    let size: usize = header_value(&head, "Size").unwrap().parse().unwrap();
    assert_eq!(size, body.len());
}

#[tokio::test]
async fn test_root_listing_links_stay_rooted() {
    let root = TempRoot::new("rootdir");
    root.write("a.txt", b"a");

    let response = exchange(root.site(), b"GET / HTTP/1.1\r\nHost: x\r\n\r\n").await;
    let (head, body) = split_response(&response);

    assert!(head.starts_with("HTTP/1.1 200 OK\n"));
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("<a href=\"/a.txt\">a.txt</a>"));
}

#[tokio::test]
async fn test_percent_encoded_path_resolves() {
    let root = TempRoot::new("percent");
    root.write("hello world.txt", b"hi\n");

    let response = exchange(
        root.site(),
        b"GET /hello%20world.txt HTTP/1.1\r\nHost: x\r\n\r\n",
    )
    .await;
    let (head, body) = split_response(&response);

    assert!(head.starts_with("HTTP/1.1 200 OK\n"));
    assert_eq!(header_value(&head, "Size"), Some("3"));
    assert_eq!(body, b"hi\n");
}

#[tokio::test]
async fn test_irregular_spacing_served_identically() {
    let root = TempRoot::new("spacing");
    root.write("index.html", b"hello world\n");

    let single = exchange(root.site(), b"GET /index.html HTTP/1.1\r\n\r\n").await;
    let padded = exchange(
        root.site(),
        b"GET        /index.html        HTTP/1.1\r\n\r\n",
    )
    .await;

    let (head_a, body_a) = split_response(&single);
    let (head_b, body_b) = split_response(&padded);

    assert_eq!(without_date(&head_a), without_date(&head_b));
    assert_eq!(body_a, body_b);
}

#[tokio::test]
async fn test_repeated_request_is_idempotent_modulo_date() {
    let root = TempRoot::new("idem");
    root.write("index.html", b"hello world\n");

    let first = exchange(root.site(), b"GET /index.html HTTP/1.1\r\n\r\n").await;
    let second = exchange(root.site(), b"GET /index.html HTTP/1.1\r\n\r\n").await;

    let (head_a, body_a) = split_response(&first);
    let (head_b, body_b) = split_response(&second);

    assert_eq!(without_date(&head_a), without_date(&head_b));
    assert_eq!(body_a, body_b);
}

#[tokio::test]
async fn test_premature_close_gets_no_response() {
    let root = TempRoot::new("preclose");

    let (mut client, server) = tokio::io::duplex(4096);
    let conn = Connection::new(server, "test-peer".to_string(), root.site());
    let task = tokio::spawn(conn.run());

    client.write_all(b"GET / HT").await.unwrap();
    client.shutdown().await.unwrap();

    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();
    task.await.unwrap();

    assert!(response.is_empty());
}

fn without_date(head: &str) -> Vec<&str> {
    head.lines().filter(|l| !l.starts_with("Date: ")).collect()
}
