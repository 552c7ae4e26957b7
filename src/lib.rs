//! # cv-forge – theme-driven CV rendering
//!
//! Turns a validated CV model into Typst, Markdown or HTML source. The
//! pipeline stages are:
//!
//! 1. **Process** – localize dates, build header connections, convert inline
//!    Markdown for the target format ([`processor`])
//! 2. **Resolve** – find each template in the override root or the built-in
//!    set, theme directory first for Typst ([`templates`])
//! 3. **Render sections** – beginning, entries, ending ([`section`])
//! 4. **Lay out** – single column, or the sidebar theme's two-column grid
//!    ([`layout`])
//! 5. **Finalize** – wrap Markdown into a full HTML page ([`html`])
//!
//! [`pipeline::Renderer`] drives the stages and caches template
//! environments per override root.

pub mod error;
pub mod format;
pub mod html;
pub mod layout;
pub mod markup;
pub mod model;
pub mod pipeline;
pub mod processor;
pub mod section;
pub mod strings;
pub mod templates;
pub mod theme;

// Re-exports for convenience
pub use error::{RenderError, Result};
pub use format::OutputFormat;
pub use model::{RenderModel, RenderSection};
pub use pipeline::{render_full_template, render_html, OutputPlan, Renderer};
pub use theme::Design;
