use std::collections::HashMap;

/// A parsed HTTP request.
///
/// Holds the request-line tokens and the header mapping. The method and
/// protocol version are kept exactly as received; the path has already been
/// percent-decoded by the parser.
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method token (e.g. "GET"); not validated against a method list.
    pub method: String,
    /// Percent-decoded request path.
    pub path: String,
    /// Protocol version token (typically "HTTP/1.1").
    pub version: String,
    /// Request headers; duplicate names keep the last value seen.
    pub headers: HashMap<String, String>,
}

impl Request {
    /// Retrieves a header value by name. Lookups are exact-case: the name
    /// must match the bytes the client sent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|v| v.as_str())
    }

    /// The `Host` header, or an empty string when absent.
    pub fn host(&self) -> &str {
        self.header("Host").unwrap_or("")
    }

    /// The `User-Agent` header, or an empty string when absent.
    pub fn user_agent(&self) -> &str {
        self.header("User-Agent").unwrap_or("")
    }
}
