//! Layout emission – arranges rendered sections into the document body.
//!
//! The composer only produces section blocks; how they are laid out is
//! decided here. Single-column output is a plain concatenation. The sidebar
//! theme's two-column layout splits sections into a sidebar stream and a
//! main stream and wraps them in a Typst `#grid`.

use std::collections::HashSet;

use crate::format::OutputFormat;
use crate::theme::{Design, Sidebar, SidebarPosition, SIDEBAR_THEME};

/// A section block together with the key used to place it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSection {
    pub snake_case_title: String,
    pub code: String,
}

/// How the rendered sections are arranged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layout<'a> {
    SingleColumn,
    TwoColumnGrid(&'a Sidebar),
}

impl<'a> Layout<'a> {
    /// Two columns only for the sidebar theme rendered to Typst; every other
    /// combination, including a sidebar theme without sidebar settings, is
    /// single-column.
    pub fn select(design: &'a Design, format: OutputFormat) -> Self {
        if format != OutputFormat::Typst || design.theme_name() != SIDEBAR_THEME {
            return Layout::SingleColumn;
        }
        match design.sidebar() {
            Some(sidebar) => Layout::TwoColumnGrid(sidebar),
            None => {
                log::debug!("sidebar theme without sidebar settings, using a single column");
                Layout::SingleColumn
            }
        }
    }

    /// Body text appended after the header block.
    pub fn emit(&self, sections: &[RenderedSection]) -> String {
        match self {
            Layout::SingleColumn => sections
                .iter()
                .map(|section| format!("\n{}", section.code))
                .collect(),
            Layout::TwoColumnGrid(sidebar) => emit_grid(sidebar, sections),
        }
    }
}

/// Split sections into `(sidebar, main)`, each in original order.
pub fn partition<'s>(
    sidebar: &Sidebar,
    sections: &'s [RenderedSection],
) -> (Vec<&'s RenderedSection>, Vec<&'s RenderedSection>) {
    let members: HashSet<&str> = sidebar.sections.iter().map(String::as_str).collect();
    sections
        .iter()
        .partition(|section| members.contains(section.snake_case_title.as_str()))
}

fn join(sections: &[&RenderedSection]) -> String {
    sections
        .iter()
        .map(|section| section.code.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn emit_grid(sidebar: &Sidebar, sections: &[RenderedSection]) -> String {
    let (side, main) = partition(sidebar, sections);
    log::debug!(
        "two-column layout: {} sidebar / {} main sections",
        side.len(),
        main.len()
    );
    let side = join(&side);
    let main = join(&main);

    let (columns, first, second) = match sidebar.position {
        SidebarPosition::Left => (format!("({}, 1fr)", sidebar.width), side, main),
        SidebarPosition::Right => (format!("(1fr, {})", sidebar.width), main, side),
    };
    format!(
        "\n#grid(\n  columns: {columns},\n  gutter: {gutter},\n  [\n{first}\n  ],\n  [\n{second}\n  ]\n)\n",
        gutter = sidebar.gutter,
    )
}
