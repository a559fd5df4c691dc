use std::collections::HashMap;

use percent_encoding::percent_decode_str;
use thiserror::Error;

use crate::http::request::Request;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("incorrect request format: not HTTP")]
    MalformedRequestLine,
    #[error("incorrect header format: not HTTP: {0:?}")]
    MalformedHeaderLine(String),
    #[error("request path does not decode to valid UTF-8")]
    PathDecode,
}

/// Parse a complete header block into a request.
///
/// The block is expected to hold one request line, zero or more header
/// lines and a terminating blank line; anything after the blank line is
/// ignored.
pub fn parse_request(block: &[u8]) -> Result<Request, ParseError> {
    // The request line runs up to the first `\r` or `\n`.
    let line_end = block
        .iter()
        .position(|&b| b == b'\r' || b == b'\n')
        .unwrap_or(block.len());
    let request_line =
        std::str::from_utf8(&block[..line_end]).map_err(|_| ParseError::MalformedRequestLine)?;

    // Step over `\r\n` or a bare `\n`.
    let mut rest = line_end;
    if block.get(rest) == Some(&b'\r') {
        rest += 1;
    }
    if block.get(rest) == Some(&b'\n') {
        rest += 1;
    }

    let (method, path, version) = parse_request_line(request_line)?;
    let headers = parse_headers(&block[rest..])?;

    Ok(Request {
        method,
        path,
        version,
        headers,
    })
}

fn parse_request_line(line: &str) -> Result<(String, String, String), ParseError> {
    let collapsed = collapse_spaces(line);

    let tokens: Vec<&str> = collapsed.split(' ').collect();
    // Three tokens minimum: method, path, protocol version.
    if tokens.len() < 3 {
        return Err(ParseError::MalformedRequestLine);
    }

    let path = query_unescape(tokens[1])?;

    Ok((tokens[0].to_string(), path, tokens[2].to_string()))
}

/// The request line may separate its tokens with more than one space,
/// e.g. `GET        /        HTTP/1.1`; runs of spaces collapse to one.
fn collapse_spaces(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut prev = '\0';

    for c in line.chars() {
        if c == ' ' && prev == ' ' {
            continue;
        }
        prev = c;
        out.push(c);
    }

    out
}

/// Standard URL unescaping: `+` becomes a space, `%XX` escapes are decoded.
fn query_unescape(raw: &str) -> Result<String, ParseError> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| ParseError::PathDecode)
}

/// Header lines split on `\r\n`, falling back to bare `\n` when the block
/// carries no `\r\n` at all. Each line splits at its first `:`; parsing
/// stops at the first empty line.
fn parse_headers(rest: &[u8]) -> Result<HashMap<String, String>, ParseError> {
    let mut headers = HashMap::new();

    let sep: &[u8] = if find(rest, b"\r\n").is_some() {
        b"\r\n"
    } else {
        b"\n"
    };

    let mut pos = 0;
    while pos <= rest.len() {
        let line = match find(&rest[pos..], sep) {
            Some(idx) => {
                let line = &rest[pos..pos + idx];
                pos += idx + sep.len();
                line
            }
            None => {
                let line = &rest[pos..];
                pos = rest.len() + 1;
                line
            }
        };

        if line.is_empty() {
            break;
        }

        let line = std::str::from_utf8(line)
            .map_err(|_| ParseError::MalformedHeaderLine(String::from_utf8_lossy(line).into_owned()))?;

        match line.split_once(':') {
            Some((name, value)) => {
                // Last write wins on duplicate names; names stay exactly
                // as received.
                headers.insert(name.to_string(), value.trim().to_string());
            }
            None => return Err(ParseError::MalformedHeaderLine(line.to_string())),
        }
    }

    Ok(headers)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
