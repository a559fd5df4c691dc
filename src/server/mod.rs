//! Accept loop and per-process server state.

pub mod listener;

use std::path::PathBuf;

use crate::config::Limits;
use crate::files::listing::DirTemplate;

/// State shared by every connection: the canonicalized root directory, the
/// compiled listing template and the per-connection limits. Built once at
/// startup and handed to workers behind an `Arc`.
pub struct SiteContext {
    pub root: PathBuf,
    pub template: DirTemplate,
    pub limits: Limits,
}
