//! HTTP protocol implementation.
//!
//! This module implements the single-request HTTP/1.1 engine: every accepted
//! connection carries exactly one request and is closed after the response.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`connection`**: The main connection handler implementing the request-response state machine
//! - **`reader`**: Accumulates raw bytes until a complete header block is present
//! - **`parser`**: Parses the request line and headers out of the header block
//! - **`request`**: Parsed HTTP request representation
//! - **`response`**: Status codes and response header block construction
//! - **`writer`**: Serializes and writes responses to the client
//! - **`mime`**: Content-Type detection based on file extensions
//!
//! # Connection State Machine
//!
//! Each client connection goes through a one-shot state machine:
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Accumulate bytes until the blank line
//!        └──────┬──────┘
//!               │ Header block complete
//!               ▼
//!        ┌──────────────────┐
//!        │    Parsing       │ ← Request line + headers
//!        └──────┬───────────┘
//!               │ Request parsed
//!               ▼
//!        ┌──────────────────┐
//!        │    Resolving     │ ← Map the path onto the filesystem
//!        └──────┬───────────┘
//!               │ File / Directory / error status
//!               ▼
//!        ┌──────────────────┐
//!        │    Responding    │ ← Headers, then file bytes or listing
//!        └──────┬───────────┘
//!               │
//!               ▼
//!             Closed
//! ```
//!
//! Every error branch converges on `Closed`; the socket (and any opened file
//! handle) is released exactly once regardless of the path taken.

pub mod connection;
pub mod mime;
pub mod parser;
pub mod reader;
pub mod request;
pub mod response;
pub mod writer;
