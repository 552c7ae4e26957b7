//! Section rendering – beginning, entries, ending.

use tera::Context;

use crate::error::Result;
use crate::format::OutputFormat;
use crate::model::{RenderModel, RenderSection};
use crate::templates::{render_single_template, TemplateEnvironment};

/// Render one section into a single block of output text.
///
/// Entries keep their order and are separated by a blank line. The entry
/// template is only resolved when the section has entries.
pub fn render_section(
    env: &TemplateEnvironment,
    format: OutputFormat,
    section: &RenderSection,
    model: &RenderModel,
) -> Result<String> {
    let ext = format.extension();

    let mut beginning_vars = Context::new();
    beginning_vars.insert("section_title", &section.title);
    beginning_vars.insert("snake_case_section_title", &section.snake_case_title);
    beginning_vars.insert("entry_type", &section.entry_type);
    let beginning = render_single_template(
        env,
        format,
        &format!("SectionBeginning.j2.{ext}"),
        model,
        beginning_vars,
    )?;

    let entry_path = format!("entries/{}.j2.{ext}", section.entry_type);
    let entries = section
        .entries
        .iter()
        .map(|entry| {
            let mut vars = Context::new();
            vars.insert("entry", entry);
            render_single_template(env, format, &entry_path, model, vars)
        })
        .collect::<Result<Vec<_>>>()?
        .join("\n\n");

    let mut ending_vars = Context::new();
    ending_vars.insert("entry_type", &section.entry_type);
    let ending = render_single_template(
        env,
        format,
        &format!("SectionEnding.j2.{ext}"),
        model,
        ending_vars,
    )?;

    Ok(format!("{beginning}\n{entries}\n{ending}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use serde_json::json;
    use std::fs;
    use std::path::Path;

    fn fixture(root: &Path) {
        for (name, content) in [
            ("markdown/SectionBeginning.j2.md", "BEGIN {{ section_title }} [{{ snake_case_section_title }}/{{ entry_type }}]"),
            ("markdown/SectionEnding.j2.md", "END {{ entry_type }}"),
            ("markdown/entries/TextEntry.j2.md", "- {{ entry }}"),
        ] {
            let path = root.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
    }

    fn model() -> RenderModel {
        RenderModel::from_json(r#"{"cv": {"name": "Jane"}}"#).unwrap()
    }

    #[test]
    fn entries_render_in_order_between_markers() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        let env = TemplateEnvironment::new(Some(dir.path().to_path_buf()));
        let section = RenderSection::new(
            "Work Notes",
            "TextEntry",
            vec![json!("third"), json!("first"), json!("second")],
        );

        let out = render_section(&env, OutputFormat::Markdown, &section, &model()).unwrap();
        assert_eq!(
            out,
            "BEGIN Work Notes [work_notes/TextEntry]\n- third\n\n- first\n\n- second\nEND TextEntry"
        );
    }

    #[test]
    fn empty_section_renders_markers_only() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        let env = TemplateEnvironment::new(Some(dir.path().to_path_buf()));
        // No entry template exists for this type; it is never needed.
        let section = RenderSection::new("Education", "education", Vec::new());

        let out = render_section(&env, OutputFormat::Markdown, &section, &model()).unwrap();
        assert_eq!(out, "BEGIN Education [education/education]\n\nEND education");
    }

    #[test]
    fn unknown_entry_type_is_template_not_found() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        let env = TemplateEnvironment::new(Some(dir.path().to_path_buf()));
        let section = RenderSection::new("Odd", "MysteryEntry", vec![json!("x")]);

        let err = render_section(&env, OutputFormat::Markdown, &section, &model()).unwrap_err();
        assert!(
            matches!(err, RenderError::TemplateNotFound { ref name, .. } if name == "entries/MysteryEntry.j2.md"),
            "{err}"
        );
    }
}
