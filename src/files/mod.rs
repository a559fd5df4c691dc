//! Filesystem side of the server
//!
//! Resolution of request paths to files or directories, and rendering of
//! directory listings.

pub mod listing;
pub mod resolver;

pub use listing::DirTemplate;
pub use resolver::{Resource, ResolveError};
