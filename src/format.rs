//! Output formats and their on-disk conventions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// The document formats the renderer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Typst,
    Markdown,
    Html,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [Self::Typst, Self::Markdown, Self::Html];

    /// File extension used by templates and written files.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Typst => "typ",
            Self::Markdown => "md",
            Self::Html => "html",
        }
    }

    /// Name of the built-in template directory for this format.
    pub fn directory(self) -> &'static str {
        match self {
            Self::Typst => "typst",
            Self::Markdown => "markdown",
            Self::Html => "html",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directory())
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "typst" | "typ" => Ok(Self::Typst),
            "markdown" | "md" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            _ => Err(RenderError::UnknownFormat(s.to_string())),
        }
    }
}
