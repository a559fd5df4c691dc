use std::path::Path;

use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;

const TEMPLATE_NAME: &str = "listing";

/// Fields handed to the listing template.
#[derive(Debug, Serialize)]
struct ListingArgs {
    root_path: String,
    dir_name: String,
    files: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("listing template is invalid: {0}")]
    Template(#[from] handlebars::TemplateError),
    #[error("listing render failed: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// A directory-listing template, compiled once at startup.
pub struct DirTemplate {
    registry: Handlebars<'static>,
}

impl DirTemplate {
    pub fn from_source(src: &str) -> Result<Self, ListingError> {
        let mut registry = Handlebars::new();
        registry.register_template_string(TEMPLATE_NAME, src)?;

        Ok(Self { registry })
    }

    /// Render the listing document for `query_path` under `root`.
    ///
    /// A query path of `"/"` normalizes to the empty string, so the
    /// template's `{{dir_name}}/{{entry}}` joins produce rooted links.
    pub fn render(
        &self,
        root: &Path,
        query_path: &str,
        entries: &[String],
    ) -> Result<Vec<u8>, ListingError> {
        let dir_name = if query_path == "/" { "" } else { query_path };

        let rel = dir_name.trim_start_matches('/');
        let root_path = if rel.is_empty() {
            root.to_path_buf()
        } else {
            root.join(rel)
        };

        let args = ListingArgs {
            root_path: root_path.display().to_string(),
            dir_name: dir_name.to_string(),
            files: entries.to_vec(),
        };

        let html = self.registry.render(TEMPLATE_NAME, &args)?;

        Ok(html.into_bytes())
    }
}
