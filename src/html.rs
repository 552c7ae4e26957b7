//! HTML finalization – Markdown body wrapped in the `Full.html` shell.

use comrak::Options;
use tera::Context;

use crate::error::Result;
use crate::format::OutputFormat;
use crate::model::RenderModel;
use crate::templates::{render_single_template, TemplateEnvironment};

fn options() -> Options<'static> {
    let mut options = Options::default();
    let ext = &mut options.extension;
    ext.strikethrough = true;
    ext.table = true;
    ext.autolink = true;
    options.render.r#unsafe = true;
    options
}

/// Convert a complete Markdown document to an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> String {
    comrak::markdown_to_html(markdown, &options())
}

/// Render `markdown` as the body of a complete HTML document.
///
/// The shell sees the usual `cv`, `design`, `locale` and `settings` plus
/// `html_body`.
pub fn render_html(env: &TemplateEnvironment, model: &RenderModel, markdown: &str) -> Result<String> {
    let mut vars = Context::new();
    vars.insert("html_body", &markdown_to_html(markdown));
    render_single_template(env, OutputFormat::Html, "Full.html", model, vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_becomes_fragment() {
        let html = markdown_to_html("# Jane\n\n- **Rust**\n");
        assert!(html.contains("<h1>Jane</h1>"), "{html}");
        assert!(html.contains("<li><strong>Rust</strong></li>"), "{html}");
    }

    #[test]
    fn body_is_wrapped_in_builtin_shell() {
        let env = TemplateEnvironment::new(None);
        let model = RenderModel::from_json(r#"{"cv": {"name": "Jane Doe"}}"#).unwrap();
        let html = render_html(&env, &model, "## Experience\n").unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"), "{html}");
        assert!(html.contains("<title>Jane Doe's CV</title>"), "{html}");
        assert!(html.contains("<h2>Experience</h2>"), "{html}");
        assert!(html.trim_end().ends_with("</html>"));
    }
}
