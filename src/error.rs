//! Error type shared by every rendering stage.

use std::path::PathBuf;

use thiserror::Error;

use crate::format::OutputFormat;

/// Everything that can stop a document from being rendered.
///
/// There is no partial output: any of these aborts the whole render.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No search root holds the requested template under any probed name.
    #[error("template `{name}` not found (searched: {})", .searched.join(", "))]
    TemplateNotFound { name: String, searched: Vec<String> },

    /// The template exists but failed to parse or render.
    #[error("failed to render template `{name}`: {source}")]
    Template {
        name: String,
        #[source]
        source: tera::Error,
    },

    /// HTML is produced by finalizing Markdown, never assembled from sections.
    #[error("`{0}` output cannot be assembled from sections")]
    UnsupportedFormat(OutputFormat),

    #[error("unknown output format `{0}` (expected typst, markdown or html)")]
    UnknownFormat(String),

    #[error("invalid render model: {0}")]
    Model(#[from] serde_json::Error),

    /// Two sections normalise to the same key.
    #[error("duplicate section `{0}`")]
    DuplicateSection(String),

    #[error("I/O error on `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
