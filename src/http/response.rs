use std::time::SystemTime;

use crate::http::mime;

/// Value of the `Server` header on every response.
pub const SERVER_ID: &str = "someserver/1.18.0";

/// HTTP status codes emitted by the server.
///
/// - `Ok` (200): resource served
/// - `BadRequest` (400): malformed request line or headers
/// - `Forbidden` (403): permission denied opening the resource
/// - `NotFound` (404): resource does not exist
/// - `InternalServerError` (500): stat/open/render failures not classified above
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// The inputs a response header block is derived from.
#[derive(Debug, Clone)]
pub struct StatusData {
    pub code: StatusCode,
    /// Body size in bytes; emitted as the `Size` header whenever set,
    /// including an explicit 0.
    pub size: Option<u64>,
    /// Base name of the served file, used to derive the content type.
    pub name: Option<String>,
    /// Explicit content type overriding extension-based derivation.
    pub content_type: Option<String>,
}

impl StatusData {
    /// Error response: status only, no size, no declared type.
    pub fn error(code: StatusCode) -> Self {
        Self {
            code,
            size: None,
            name: None,
            content_type: None,
        }
    }

    /// 200 response for a regular file; the content type follows from the name.
    pub fn file(size: u64, name: String) -> Self {
        Self {
            code: StatusCode::Ok,
            size: Some(size),
            name: Some(name),
            content_type: None,
        }
    }

    /// 200 response for a rendered directory listing.
    pub fn listing(size: u64) -> Self {
        Self {
            code: StatusCode::Ok,
            size: Some(size),
            name: None,
            content_type: Some("text/html".to_string()),
        }
    }
}

/// Status line plus ordered header lines. `to_bytes` yields the exact wire
/// form: LF line endings, blank-line terminator.
#[derive(Debug)]
pub struct HeaderBlock {
    pub status_line: String,
    pub lines: Vec<String>,
}

impl HeaderBlock {
    /// Header order is fixed: Server, Connection, Date, then Size and
    /// Content-Type when present. Content-Type is never emitted on a
    /// non-200 status; on 200 an explicit type wins over derivation from
    /// the file name.
    pub fn build(data: &StatusData, now: SystemTime) -> Self {
        let status_line = format!(
            "HTTP/1.1 {} {}",
            data.code.as_u16(),
            data.code.reason_phrase()
        );

        let mut lines = Vec::with_capacity(5);
        lines.push(format!("Server: {SERVER_ID}"));
        lines.push("Connection: close".to_string());
        lines.push(format!("Date: {}", httpdate::fmt_http_date(now)));

        if let Some(size) = data.size {
            lines.push(format!("Size: {size}"));
        }

        if data.code == StatusCode::Ok {
            let content_type = match &data.content_type {
                Some(explicit) => explicit.clone(),
                None => mime::content_type_for(data.name.as_deref().unwrap_or("")),
            };
            lines.push(format!("Content-Type: {content_type}"));
        }

        Self { status_line, lines }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        buf.extend_from_slice(self.status_line.as_bytes());
        buf.push(b'\n');

        for line in &self.lines {
            buf.extend_from_slice(line.as_bytes());
            buf.push(b'\n');
        }

        // Blank line closes the header block.
        buf.push(b'\n');

        buf
    }
}
