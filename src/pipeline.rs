//! Pipeline – ties together processing, template resolution, section
//! rendering and layout into whole documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tera::Context;

use crate::error::{RenderError, Result};
use crate::format::OutputFormat;
use crate::html;
use crate::layout::{Layout, RenderedSection};
use crate::model::{RenderModel, RenderSection, Settings};
use crate::processor::{DefaultProcessor, ModelProcessor};
use crate::section;
use crate::strings::document_stem;
use crate::templates::{render_single_template, EnvironmentRegistry, TemplateEnvironment};

/// Renders models to documents, keeping one template environment per
/// override root for as long as it lives.
pub struct Renderer {
    registry: EnvironmentRegistry,
    processor: Box<dyn ModelProcessor>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::with_processor(DefaultProcessor)
    }

    /// Use a custom model processor instead of [`DefaultProcessor`].
    pub fn with_processor(processor: impl ModelProcessor + 'static) -> Self {
        Self {
            registry: EnvironmentRegistry::new(),
            processor: Box::new(processor),
        }
    }

    pub fn registry(&self) -> &EnvironmentRegistry {
        &self.registry
    }

    /// Template environment for the model's override root.
    pub fn environment(&self, model: &RenderModel) -> Arc<TemplateEnvironment> {
        self.registry.environment(model.override_root().as_deref())
    }

    /// Assemble a complete Typst or Markdown document.
    ///
    /// Typst output starts with the preamble, then the header; Markdown
    /// starts with the header. Sections follow in the arrangement chosen by
    /// [`Layout::select`]. Any missing template fails the whole render.
    pub fn render_full_template(&self, model: &RenderModel, format: OutputFormat) -> Result<String> {
        if format == OutputFormat::Html {
            return Err(RenderError::UnsupportedFormat(format));
        }
        let model = self.processor.process(model, format)?;
        let env = self.environment(&model);
        let ext = format.extension();

        let header =
            render_single_template(&env, format, &format!("Header.j2.{ext}"), &model, Context::new())?;
        let mut code = if format == OutputFormat::Typst {
            let preamble = render_single_template(
                &env,
                format,
                &format!("Preamble.j2.{ext}"),
                &model,
                Context::new(),
            )?;
            format!("{preamble}\n\n{header}\n")
        } else {
            format!("{header}\n")
        };

        let sections = model
            .cv
            .sections
            .iter()
            .map(|s| -> Result<RenderedSection> {
                Ok(RenderedSection {
                    snake_case_title: s.snake_case_title.clone(),
                    code: section::render_section(&env, format, s, &model)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let layout = Layout::select(&model.design, format);
        log::debug!(
            "rendering {} sections as {format} ({layout:?})",
            sections.len()
        );
        code.push_str(&layout.emit(&sections));
        Ok(code)
    }

    /// Wrap an already rendered Markdown document into a full HTML page.
    pub fn render_html(&self, model: &RenderModel, markdown: &str) -> Result<String> {
        html::render_html(&self.environment(model), model, markdown)
    }

    /// Render one section on its own, without model processing.
    pub fn render_section(
        &self,
        format: OutputFormat,
        section: &RenderSection,
        model: &RenderModel,
    ) -> Result<String> {
        section::render_section(&self.environment(model), format, section, model)
    }

    /// Render `model` to any format; HTML goes through Markdown first.
    pub fn render(&self, model: &RenderModel, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Html => {
                let markdown = self.render_full_template(model, OutputFormat::Markdown)?;
                self.render_html(model, &markdown)
            }
            _ => self.render_full_template(model, format),
        }
    }
}

/// Convenience: assemble a document with a fresh [`Renderer`].
pub fn render_full_template(model: &RenderModel, format: OutputFormat) -> Result<String> {
    Renderer::new().render_full_template(model, format)
}

/// Convenience: finalize Markdown as HTML with a fresh [`Renderer`].
pub fn render_html(model: &RenderModel, markdown: &str) -> Result<String> {
    Renderer::new().render_html(model, markdown)
}

// ---------------------------------------------------------------------------
// Output files
// ---------------------------------------------------------------------------

/// Which documents to write and where.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPlan {
    pub output_folder: PathBuf,
    pub formats: Vec<OutputFormat>,
}

impl Default for OutputPlan {
    fn default() -> Self {
        Self::from_settings(&Settings::default(), None)
    }
}

impl OutputPlan {
    /// Build a plan from the model's render settings. A relative output
    /// folder is resolved against `base_dir` when given.
    pub fn from_settings(settings: &Settings, base_dir: Option<&Path>) -> Self {
        let command = &settings.render_command;
        let formats = OutputFormat::ALL
            .into_iter()
            .filter(|format| match format {
                OutputFormat::Typst => !command.dont_generate_typst,
                OutputFormat::Markdown => !command.dont_generate_markdown,
                OutputFormat::Html => !command.dont_generate_html,
            })
            .collect();
        let output_folder = match base_dir {
            Some(base) if command.output_folder.is_relative() => base.join(&command.output_folder),
            _ => command.output_folder.clone(),
        };
        Self {
            output_folder,
            formats,
        }
    }

    pub fn path_for(&self, model: &RenderModel, format: OutputFormat) -> PathBuf {
        let stem = document_stem(model.cv.name.as_deref());
        self.output_folder
            .join(format!("{stem}.{}", format.extension()))
    }
}

/// Render every planned format and write the files. Returns the written
/// paths in plan order.
pub fn write_outputs(renderer: &Renderer, model: &RenderModel, plan: &OutputPlan) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&plan.output_folder).map_err(|e| RenderError::io(&plan.output_folder, e))?;

    let mut markdown = None;
    let mut written = Vec::with_capacity(plan.formats.len());
    for &format in &plan.formats {
        let document = match format {
            OutputFormat::Html => {
                let body = match markdown.take() {
                    Some(body) => body,
                    None => renderer.render_full_template(model, OutputFormat::Markdown)?,
                };
                renderer.render_html(model, &body)?
            }
            OutputFormat::Markdown => {
                let body = renderer.render_full_template(model, format)?;
                markdown = Some(body.clone());
                body
            }
            OutputFormat::Typst => renderer.render_full_template(model, format)?,
        };
        let path = plan.path_for(model, format);
        fs::write(&path, document).map_err(|e| RenderError::io(&path, e))?;
        log::info!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RenderCommand;

    #[test]
    fn plan_respects_dont_generate_flags() {
        let settings = Settings {
            render_command: RenderCommand {
                output_folder: PathBuf::from("out"),
                dont_generate_markdown: true,
                ..RenderCommand::default()
            },
            ..Settings::default()
        };
        let plan = OutputPlan::from_settings(&settings, Some(Path::new("/cvs")));
        assert_eq!(plan.formats, vec![OutputFormat::Typst, OutputFormat::Html]);
        assert_eq!(plan.output_folder, PathBuf::from("/cvs/out"));
    }

    #[test]
    fn html_cannot_be_assembled_from_sections() {
        let model = RenderModel::from_json(r#"{"cv": {}}"#).unwrap();
        let err = render_full_template(&model, OutputFormat::Html).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedFormat(OutputFormat::Html)));
    }

    #[test]
    fn builtin_typst_document_has_preamble_then_header() {
        let model = RenderModel::from_json(
            r#"{"cv": {"name": "Jane Doe", "sections": [
                {"title": "Summary", "entry_type": "TextEntry", "entries": ["Hello"]}
            ]}}"#,
        )
        .unwrap();
        let out = render_full_template(&model, OutputFormat::Typst).unwrap();
        let preamble = out.find("#set page(").expect("preamble");
        let name = out.find("[Jane Doe]").expect("header");
        let summary = out.find("Summary").expect("section");
        assert!(preamble < name && name < summary, "{out}");
        assert!(!out.contains("#grid(\n  columns"));
    }
}
