//! Render model – the validated CV plus everything templates can see.
//!
//! The model is read-only for the duration of a render; the processor hands
//! back a modified clone rather than mutating its input.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RenderError, Result};
use crate::strings::snake_case;
use crate::theme::Design;

/// A complete, validated input to the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderModel {
    pub cv: Cv,
    #[serde(default)]
    pub design: Design,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub settings: Settings,
    /// Where the model was read from; its directory is the override root.
    #[serde(skip)]
    pub input_file_path: Option<PathBuf>,
}

impl RenderModel {
    /// Deserialise from JSON and check section keys are unique.
    pub fn from_json(json: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.check_unique_sections()?;
        Ok(model)
    }

    /// Read a JSON model from disk, remembering its path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| RenderError::io(path, e))?;
        let mut model = Self::from_json(&json)?;
        model.input_file_path = Some(path.to_path_buf());
        Ok(model)
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Directory searched for user templates before the built-in ones: the
    /// input file's directory, or the working directory when there is none.
    pub fn override_root(&self) -> Option<PathBuf> {
        match &self.input_file_path {
            Some(path) => path.parent().map(Path::to_path_buf),
            None => std::env::current_dir().ok(),
        }
    }

    fn check_unique_sections(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for section in &self.cv.sections {
            if !seen.insert(section.snake_case_title.as_str()) {
                return Err(RenderError::DuplicateSection(
                    section.snake_case_title.clone(),
                ));
            }
        }
        Ok(())
    }
}

/// Personal information and the ordered CV sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cv {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default)]
    pub social_networks: Vec<SocialNetwork>,
    #[serde(default)]
    pub sections: Vec<RenderSection>,
    /// Header links, filled in by the model processor.
    #[serde(default, skip_deserializing)]
    pub connections: Vec<Connection>,
}

/// One titled group of entries sharing an entry type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SectionInput")]
pub struct RenderSection {
    pub title: String,
    pub snake_case_title: String,
    /// Selects `entries/{entry_type}.j2.{ext}`.
    pub entry_type: String,
    /// Passed through to templates untouched.
    pub entries: Vec<Value>,
}

impl RenderSection {
    pub fn new(title: impl Into<String>, entry_type: impl Into<String>, entries: Vec<Value>) -> Self {
        let title = title.into();
        Self {
            snake_case_title: snake_case(&title),
            title,
            entry_type: entry_type.into(),
            entries,
        }
    }
}

#[derive(Deserialize)]
struct SectionInput {
    title: String,
    #[serde(default)]
    snake_case_title: Option<String>,
    entry_type: String,
    #[serde(default)]
    entries: Vec<Value>,
}

impl From<SectionInput> for RenderSection {
    fn from(input: SectionInput) -> Self {
        let snake_case_title = input
            .snake_case_title
            .unwrap_or_else(|| snake_case(&input.title));
        Self {
            title: input.title,
            snake_case_title,
            entry_type: input.entry_type,
            entries: input.entries,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialNetwork {
    pub network: String,
    pub username: String,
}

impl SocialNetwork {
    /// Profile URL for the networks we know how to link.
    pub fn url(&self) -> Option<String> {
        let user = self.username.as_str();
        let url = match self.network.to_ascii_lowercase().as_str() {
            "linkedin" => format!("https://linkedin.com/in/{user}"),
            "github" => format!("https://github.com/{user}"),
            "gitlab" => format!("https://gitlab.com/{user}"),
            "x" | "twitter" => format!("https://x.com/{user}"),
            "instagram" => format!("https://instagram.com/{user}"),
            "orcid" => format!("https://orcid.org/{user}"),
            "youtube" => format!("https://youtube.com/@{user}"),
            "stackoverflow" => format!("https://stackoverflow.com/users/{user}"),
            "researchgate" => format!("https://researchgate.net/profile/{user}"),
            "google scholar" => format!("https://scholar.google.com/citations?user={user}"),
            "mastodon" => {
                // @name@instance.social
                let mut parts = user.trim_start_matches('@').splitn(2, '@');
                let name = parts.next()?;
                let domain = parts.next()?;
                format!("https://{domain}/@{name}")
            }
            _ => return None,
        };
        Some(url)
    }
}

/// A header contact item as templates see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// `email`, `phone`, `website`, `location` or the social network name.
    pub kind: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Words and month names used when formatting dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Locale {
    pub language: String,
    pub month_abbreviations: Vec<String>,
    pub present: String,
    /// Separator between start and end dates.
    pub to: String,
    pub last_updated: String,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            language: "english".to_string(),
            month_abbreviations: [
                "Jan", "Feb", "Mar", "Apr", "May", "June", "July", "Aug", "Sept", "Oct", "Nov",
                "Dec",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            present: "present".to_string(),
            to: "–".to_string(),
            last_updated: "Last updated in".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_date: Option<String>,
    /// Words emphasised wherever they appear in entry text.
    pub bold_keywords: Vec<String>,
    pub render_command: RenderCommand,
}

/// Which files to write and where.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderCommand {
    pub output_folder: PathBuf,
    pub dont_generate_typst: bool,
    pub dont_generate_markdown: bool,
    pub dont_generate_html: bool,
}

impl Default for RenderCommand {
    fn default() -> Self {
        Self {
            output_folder: PathBuf::from("rendercv_output"),
            dont_generate_typst: false,
            dont_generate_markdown: false,
            dont_generate_html: false,
        }
    }
}
