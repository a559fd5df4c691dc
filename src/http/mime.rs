//! Content-Type detection based on file extensions.

/// Content type for a file name, derived from the extension after the last
/// `.`; unknown or missing extensions fall back to `application/octet-stream`.
pub fn content_type_for(name: &str) -> String {
    const FALLBACK: &str = "application/octet-stream";

    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => mime_guess::from_ext(ext)
            .first()
            .map(|m| m.to_string())
            .unwrap_or_else(|| FALLBACK.to_string()),
        _ => FALLBACK.to_string(),
    }
}
