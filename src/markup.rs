//! Inline Markdown → Typst markup.
//!
//! CV text is written in Markdown (`**bold**`, `*emphasis*`, `[links](…)`).
//! Typst output needs the same emphasis expressed as Typst functions, with
//! Typst's own markup characters escaped in plain text.

use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, Options};

/// Convert a Markdown snippet to Typst markup.
///
/// Only inline syntax is translated. A block that is not a plain paragraph
/// (list, heading, quote, code block, ...) is kept as its escaped source
/// text so no content is lost.
pub fn markdown_to_typst(markdown: &str) -> String {
    let arena = Arena::new();
    let options = Options::default();
    let root = parse_document(&arena, markdown, &options);
    let lines: Vec<&str> = markdown.lines().collect();

    let mut blocks = Vec::new();
    for block in root.children() {
        let mut out = String::with_capacity(markdown.len());
        let data = block.data.borrow();
        if matches!(data.value, NodeValue::Paragraph) {
            write_children(block, &mut out);
        } else {
            let start = data.sourcepos.start.line.saturating_sub(1);
            let end = data.sourcepos.end.line.min(lines.len());
            let source = lines.get(start..end).unwrap_or_default().join("\n");
            out.push_str(&escape_typst(source.trim()));
        }
        blocks.push(escape_line_starts(&out));
    }
    blocks.join("\n\n")
}

fn write_children<'a>(node: &'a AstNode<'a>, out: &mut String) {
    for child in node.children() {
        write_node(child, out);
    }
}

fn write_node<'a>(node: &'a AstNode<'a>, out: &mut String) {
    let data = node.data.borrow();
    match &data.value {
        NodeValue::Text(text) => out.push_str(&escape_typst(text)),
        NodeValue::Code(code) => {
            out.push_str("#raw(\"");
            out.push_str(&escape_string(&code.literal));
            out.push_str("\")");
        }
        NodeValue::Strong => wrap(node, "#strong[", out),
        NodeValue::Emph => wrap(node, "#emph[", out),
        NodeValue::Link(link) => {
            out.push_str("#link(\"");
            out.push_str(&escape_string(&link.url));
            out.push_str("\")[");
            write_children(node, out);
            out.push(']');
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => out.push(' '),
        _ => write_children(node, out),
    }
}

/// Escape markers Typst reads as list, enum or heading at the start of a
/// line: `-`, `+`, `=` and `12.`.
fn escape_line_starts(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            let indent = line.len() - line.trim_start().len();
            let (lead, rest) = line.split_at(indent);
            if rest.starts_with(['-', '+', '=']) {
                return format!("{lead}\\{rest}");
            }
            let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
            if digits > 0 && rest[digits..].starts_with('.') {
                return format!("{lead}{}\\{}", &rest[..digits], &rest[digits..]);
            }
            line.to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn wrap<'a>(node: &'a AstNode<'a>, open: &str, out: &mut String) {
    out.push_str(open);
    write_children(node, out);
    out.push(']');
}

/// Escape characters that start Typst markup or code.
pub fn escape_typst(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '#' | '$' | '@' | '*' | '_' | '<' | '>' | '[' | ']' | '`' | '~'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn escape_string(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(markdown_to_typst("Built a compiler"), "Built a compiler");
    }

    #[test]
    fn emphasis_and_links() {
        assert_eq!(
            markdown_to_typst("**Led** a *small* team at [Acme](https://acme.com)"),
            "#strong[Led] a #emph[small] team at #link(\"https://acme.com\")[Acme]"
        );
    }

    #[test]
    fn special_characters_are_escaped() {
        assert_eq!(markdown_to_typst("C# and $5 @home"), "C\\# and \\$5 \\@home");
    }

    #[test]
    fn paragraphs_stay_separated() {
        assert_eq!(markdown_to_typst("First **one**\n\nSecond"), "First #strong[one]\n\nSecond");
    }

    #[test]
    fn block_syntax_keeps_its_text() {
        assert_eq!(
            markdown_to_typst("2019. Joined the platform team"),
            "2019\\. Joined the platform team"
        );
        assert_eq!(
            markdown_to_typst("# of active users doubled"),
            "\\# of active users doubled"
        );
        assert_eq!(markdown_to_typst("- 5 direct reports"), "\\- 5 direct reports");
        assert_eq!(markdown_to_typst("> 99.9% uptime"), "\\> 99.9% uptime");
        assert_eq!(markdown_to_typst("    indented code"), "indented code");
    }

    #[test]
    fn typst_markers_at_line_start_are_escaped() {
        assert_eq!(markdown_to_typst("= not a heading"), "\\= not a heading");
        assert_eq!(markdown_to_typst("Up 12. points"), "Up 12. points");
    }

    #[test]
    fn inline_code_becomes_raw() {
        assert_eq!(markdown_to_typst("use `cargo \"x\"`"), "use #raw(\"cargo \\\"x\\\"\")");
    }
}
