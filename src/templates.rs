//! Template resolution – finds a template by logical name and renders it.
//!
//! Templates are looked up by `{directory}/{relative_path}` in two search
//! roots, in order:
//!
//! 1. the override root (usually the directory holding the input file), so a
//!    CV can ship its own templates next to it;
//! 2. the built-in templates bundled into the crate.
//!
//! Typst templates are first probed under the theme's directory
//! (`{theme}/…`) and then under `typst/…`. Other formats go straight to
//! their own directory.
//!
//! Each [`TemplateEnvironment`] belongs to one override root and memoizes
//! every probe, so a render never scans the filesystem twice for the same
//! name. Environments are handed out by an [`EnvironmentRegistry`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use include_dir::{include_dir, Dir};
use serde_json::Value;
use tera::{Context, Tera};

use crate::error::{RenderError, Result};
use crate::format::OutputFormat;
use crate::model::RenderModel;
use crate::strings::clean_url;

static BUILTIN_TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

struct EnvironmentState {
    engine: Tera,
    /// Probe results by full template name; `true` once loaded into `engine`.
    probed: HashMap<String, bool>,
}

/// A template engine bound to one override root.
pub struct TemplateEnvironment {
    override_root: Option<PathBuf>,
    state: Mutex<EnvironmentState>,
}

impl TemplateEnvironment {
    pub fn new(override_root: Option<PathBuf>) -> Self {
        let mut engine = Tera::default();
        // Output is Typst/Markdown source or a trusted HTML shell.
        engine.autoescape_on(Vec::new());
        engine.register_filter("clean_url", clean_url_filter);
        engine.register_filter("strip", strip_filter);

        Self {
            override_root,
            state: Mutex::new(EnvironmentState {
                engine,
                probed: HashMap::new(),
            }),
        }
    }

    pub fn override_root(&self) -> Option<&Path> {
        self.override_root.as_deref()
    }

    /// Find the template for `relative_path` in `format`.
    ///
    /// `theme` is only consulted for Typst, whose theme directory is probed
    /// before the format directory.
    pub fn resolve(
        &self,
        format: OutputFormat,
        relative_path: &str,
        theme: &str,
    ) -> Result<Template<'_>> {
        let mut candidates = Vec::with_capacity(2);
        if format == OutputFormat::Typst {
            candidates.push(format!("{theme}/{relative_path}"));
        }
        candidates.push(format!("{}/{relative_path}", format.directory()));

        for name in &candidates {
            if self.load(name)? {
                log::debug!("resolved `{relative_path}` to `{name}`");
                return Ok(Template {
                    env: self,
                    name: name.clone(),
                });
            }
        }

        Err(RenderError::TemplateNotFound {
            name: relative_path.to_string(),
            searched: candidates,
        })
    }

    /// Make `name` available to the engine; `false` if no root has it.
    fn load(&self, name: &str) -> Result<bool> {
        let mut state = self.lock();
        if let Some(&found) = state.probed.get(name) {
            return Ok(found);
        }

        let source = match self.read_override(name)? {
            Some(source) => Some(source),
            None => BUILTIN_TEMPLATES
                .get_file(name)
                .and_then(|file| file.contents_utf8())
                .map(str::to_string),
        };

        let found = match source {
            Some(source) => {
                state
                    .engine
                    .add_raw_template(name, without_final_newline(&source))
                    .map_err(|source| RenderError::Template {
                        name: name.to_string(),
                        source,
                    })?;
                true
            }
            None => false,
        };
        state.probed.insert(name.to_string(), found);
        Ok(found)
    }

    fn read_override(&self, name: &str) -> Result<Option<String>> {
        let Some(root) = &self.override_root else {
            return Ok(None);
        };
        let path = root.join(name);
        if !path.is_file() {
            return Ok(None);
        }
        log::debug!("using override template {}", path.display());
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| RenderError::io(path, e))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EnvironmentState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A resolved template, ready to render with a context.
pub struct Template<'env> {
    env: &'env TemplateEnvironment,
    name: String,
}

impl Template<'_> {
    /// Full name the template was found under, e.g. `typst/Header.j2.typ`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render(&self, context: &Context) -> Result<String> {
        self.env
            .lock()
            .engine
            .render(&self.name, context)
            .map_err(|source| RenderError::Template {
                name: self.name.clone(),
                source,
            })
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// One environment per distinct override root, created on first use.
#[derive(Default)]
pub struct EnvironmentRegistry {
    environments: Mutex<HashMap<Option<PathBuf>, Arc<TemplateEnvironment>>>,
}

impl EnvironmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn environment(&self, override_root: Option<&Path>) -> Arc<TemplateEnvironment> {
        let key = override_root.map(Path::to_path_buf);
        let mut environments = self
            .environments
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        environments
            .entry(key.clone())
            .or_insert_with(|| {
                log::debug!("creating template environment for {key:?}");
                Arc::new(TemplateEnvironment::new(key))
            })
            .clone()
    }

    /// Number of environments created so far.
    pub fn len(&self) -> usize {
        self.environments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Rendering helpers
// ---------------------------------------------------------------------------

/// The variables every template sees: `cv`, `design`, `locale`, `settings`.
pub fn base_context(model: &RenderModel) -> Context {
    let mut context = Context::new();
    context.insert("cv", &model.cv);
    context.insert("design", &model.design);
    context.insert("locale", &model.locale);
    context.insert("settings", &model.settings);
    context
}

/// Resolve and render one template with the model's base context plus
/// `extra` variables.
pub fn render_single_template(
    env: &TemplateEnvironment,
    format: OutputFormat,
    relative_path: &str,
    model: &RenderModel,
    extra: Context,
) -> Result<String> {
    let template = env.resolve(format, relative_path, model.design.theme_name())?;
    let mut context = base_context(model);
    context.extend(extra);
    template.render(&context)
}

/// A template file's final line break is not part of its output.
fn without_final_newline(source: &str) -> &str {
    source
        .strip_suffix("\r\n")
        .or_else(|| source.strip_suffix('\n'))
        .unwrap_or(source)
}

fn clean_url_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let url = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("`clean_url` expects a string"))?;
    Ok(Value::String(clean_url(url)))
}

fn strip_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("`strip` expects a string"))?;
    Ok(Value::String(text.trim().to_string()))
}
