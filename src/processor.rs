//! Model processing – turns the validated model into what templates render.
//!
//! The processor runs once at the start of every full render and works on a
//! clone; the caller's model is never touched.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::format::OutputFormat;
use crate::markup::{escape_typst, markdown_to_typst};
use crate::model::{Connection, Cv, Locale, RenderModel, Settings};
use crate::strings::clean_url;

/// Entry keys holding machine-readable values that must not be rewritten.
const VERBATIM_KEYS: &[&str] = &["url", "doi", "date", "start_date", "end_date"];

/// Format-specific preparation of a model before rendering.
pub trait ModelProcessor {
    fn process(&self, model: &RenderModel, format: OutputFormat) -> Result<RenderModel>;
}

/// Connections, localized dates, bold keywords and Typst markup conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultProcessor;

impl ModelProcessor for DefaultProcessor {
    fn process(&self, model: &RenderModel, format: OutputFormat) -> Result<RenderModel> {
        Ok(process_model(model, format))
    }
}

/// Hands the model through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityProcessor;

impl ModelProcessor for IdentityProcessor {
    fn process(&self, model: &RenderModel, _format: OutputFormat) -> Result<RenderModel> {
        Ok(model.clone())
    }
}

/// Apply the default processing to a clone of `model`.
pub fn process_model(model: &RenderModel, format: OutputFormat) -> RenderModel {
    let mut model = model.clone();
    model.cv.connections = connections(&model.cv);

    let text = TextPass {
        format,
        settings: &model.settings,
    };
    for section in &mut model.cv.sections {
        for entry in &mut section.entries {
            if let Value::Object(fields) = entry {
                add_date_string(fields, &model.locale);
            }
            text.apply(entry);
        }
    }

    if format == OutputFormat::Typst {
        let cv = &mut model.cv;
        for connection in &mut cv.connections {
            connection.label = escape_typst(&connection.label);
        }
        for field in [&mut cv.name, &mut cv.headline, &mut cv.location] {
            if let Some(value) = field.as_mut() {
                *value = markdown_to_typst(value);
            }
        }
        for section in &mut cv.sections {
            section.title = markdown_to_typst(&section.title);
        }
    }
    model
}

/// Header contact items in display order.
fn connections(cv: &Cv) -> Vec<Connection> {
    let mut items = Vec::new();
    if let Some(location) = &cv.location {
        items.push(Connection {
            kind: "location".to_string(),
            label: location.clone(),
            url: None,
        });
    }
    if let Some(email) = &cv.email {
        items.push(Connection {
            kind: "email".to_string(),
            label: email.clone(),
            url: Some(format!("mailto:{email}")),
        });
    }
    if let Some(phone) = &cv.phone {
        let digits: String = phone
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        items.push(Connection {
            kind: "phone".to_string(),
            label: phone.clone(),
            url: Some(format!("tel:{digits}")),
        });
    }
    if let Some(website) = &cv.website {
        items.push(Connection {
            kind: "website".to_string(),
            label: clean_url(website),
            url: Some(website.clone()),
        });
    }
    for network in &cv.social_networks {
        items.push(Connection {
            kind: network.network.clone(),
            label: network.username.clone(),
            url: network.url(),
        });
    }
    items
}

/// Rewrites the human-readable strings of an entry.
struct TextPass<'a> {
    format: OutputFormat,
    settings: &'a Settings,
}

impl TextPass<'_> {
    fn apply(&self, value: &mut Value) {
        match value {
            Value::String(text) => *text = self.rewrite(text),
            Value::Array(items) => items.iter_mut().for_each(|item| self.apply(item)),
            Value::Object(fields) => {
                for (key, field) in fields.iter_mut() {
                    if !VERBATIM_KEYS.contains(&key.as_str()) {
                        self.apply(field);
                    }
                }
            }
            _ => {}
        }
    }

    fn rewrite(&self, text: &str) -> String {
        let text = bold_keywords(text, &self.settings.bold_keywords);
        match self.format {
            OutputFormat::Typst => markdown_to_typst(&text),
            OutputFormat::Markdown | OutputFormat::Html => text,
        }
    }
}

fn bold_keywords(text: &str, keywords: &[String]) -> String {
    let mut text = text.to_string();
    for keyword in keywords.iter().filter(|k| !k.is_empty()) {
        let bold = format!("**{keyword}**");
        if text.contains(keyword.as_str()) && !text.contains(&bold) {
            text = text.replace(keyword.as_str(), &bold);
        }
    }
    text
}

/// Insert `date_string` built from `date` or `start_date`/`end_date`.
fn add_date_string(fields: &mut Map<String, Value>, locale: &Locale) {
    let field = |key: &str| fields.get(key).and_then(value_text);
    let date_string = match (field("start_date"), field("end_date"), field("date")) {
        (Some(start), end, _) => {
            let end = end.unwrap_or_else(|| "present".to_string());
            format!(
                "{} {} {}",
                format_date(&start, locale),
                locale.to,
                format_date(&end, locale)
            )
        }
        (None, _, Some(date)) => format_date(&date, locale),
        _ => return,
    };
    fields.insert("date_string".to_string(), Value::String(date_string));
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `2021-03` → `Mar 2021`, `2021` → `2021`, `present` → locale word.
/// Anything else is free text and passes through.
fn format_date(date: &str, locale: &Locale) -> String {
    if date.eq_ignore_ascii_case("present") {
        return locale.present.clone();
    }
    let mut parts = date.split('-');
    let year = parts.next().filter(|y| y.len() == 4 && y.parse::<u16>().is_ok());
    let month = parts.next().and_then(|m| m.parse::<usize>().ok());
    match (year, month) {
        (Some(year), Some(month)) if (1..=12).contains(&month) => {
            match locale.month_abbreviations.get(month - 1) {
                Some(name) => format!("{name} {year}"),
                None => year.to_string(),
            }
        }
        (Some(year), None) if !date.contains('-') => year.to_string(),
        _ => date.to_string(),
    }
}
