//! Design themes – a closed set of variants registered in one static table.
//!
//! Every theme decodes into a concrete record implementing [`ThemeSettings`].
//! User input only needs to carry the values it changes: the selected
//! theme's defaults are merged underneath before decoding.

use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Theme used when the design omits `theme`.
pub const DEFAULT_THEME: &str = "classic";
/// The only theme with a two-column layout.
pub const SIDEBAR_THEME: &str = "sidebar";

// ---------------------------------------------------------------------------
// Settings records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    pub size: String,
    pub top_margin: String,
    pub bottom_margin: String,
    pub left_margin: String,
    pub right_margin: String,
    pub show_footer: bool,
    pub show_top_note: bool,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            size: "us-letter".to_string(),
            top_margin: "0.7in".to_string(),
            bottom_margin: "0.7in".to_string(),
            left_margin: "0.7in".to_string(),
            right_margin: "0.7in".to_string(),
            show_footer: true,
            show_top_note: true,
        }
    }
}

/// Colors are kept as Typst color expressions, e.g. `rgb(0, 79, 144)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Colors {
    pub body: String,
    pub name: String,
    pub headline: String,
    pub connections: String,
    pub section_titles: String,
    pub links: String,
}

impl Colors {
    fn uniform(body: &str, accent: &str) -> Self {
        Self {
            body: body.to_string(),
            name: accent.to_string(),
            headline: accent.to_string(),
            connections: accent.to_string(),
            section_titles: accent.to_string(),
            links: accent.to_string(),
        }
    }
}

impl Default for Colors {
    fn default() -> Self {
        Self::uniform("rgb(0, 0, 0)", "rgb(0, 79, 144)")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSize {
    pub body: String,
    pub name: String,
    pub headline: String,
    pub section_titles: String,
}

impl Default for FontSize {
    fn default() -> Self {
        Self {
            body: "10pt".to_string(),
            name: "30pt".to_string(),
            headline: "10pt".to_string(),
            section_titles: "1.4em".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Typography {
    pub font_family: String,
    pub font_size: FontSize,
    pub line_spacing: String,
    pub justify: bool,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            font_family: "Source Sans 3".to_string(),
            font_size: FontSize::default(),
            line_spacing: "0.6em".to_string(),
            justify: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderSettings {
    pub alignment: String,
    pub space_below_name: String,
    pub connections_separator: String,
}

impl Default for HeaderSettings {
    fn default() -> Self {
        Self {
            alignment: "center".to_string(),
            space_below_name: "0.7cm".to_string(),
            connections_separator: "|".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionTitles {
    /// `with_partial_line`, `with_full_line`, `without_line` or `moderncv`.
    pub style: String,
    pub line_thickness: String,
    pub space_above: String,
    pub space_below: String,
}

impl Default for SectionTitles {
    fn default() -> Self {
        Self {
            style: "with_partial_line".to_string(),
            line_thickness: "0.5pt".to_string(),
            space_above: "0.5cm".to_string(),
            space_below: "0.3cm".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntrySettings {
    pub date_and_location_width: String,
    pub space_between_entries: String,
    pub highlight_bullet: String,
}

impl Default for EntrySettings {
    fn default() -> Self {
        Self {
            date_and_location_width: "4.15cm".to_string(),
            space_between_entries: "1.2em".to_string(),
            highlight_bullet: "•".to_string(),
        }
    }
}

/// Which side of the page the sidebar column sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidebarPosition {
    #[default]
    Left,
    Right,
}

/// Two-column layout configuration of the sidebar theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sidebar {
    pub width: String,
    pub position: SidebarPosition,
    pub gutter: String,
    pub background_color: Option<String>,
    /// Snake-case section titles placed in the sidebar; the rest go to main.
    pub sections: Vec<String>,
}

impl Default for Sidebar {
    fn default() -> Self {
        Self {
            width: "30%".to_string(),
            position: SidebarPosition::Left,
            gutter: "0.5cm".to_string(),
            background_color: None,
            sections: ["skills", "publications", "values", "hobbies", "references"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Record shared by the single-column themes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassicTheme {
    pub page: Page,
    pub colors: Colors,
    pub typography: Typography,
    pub header: HeaderSettings,
    pub section_titles: SectionTitles,
    pub entries: EntrySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidebarTheme {
    #[serde(flatten)]
    pub base: ClassicTheme,
    #[serde(default)]
    pub sidebar: Option<Sidebar>,
}

impl Default for SidebarTheme {
    fn default() -> Self {
        Self {
            base: ClassicTheme {
                header: HeaderSettings {
                    alignment: "left".to_string(),
                    ..HeaderSettings::default()
                },
                ..ClassicTheme::default()
            },
            sidebar: Some(Sidebar::default()),
        }
    }
}

/// Settings every theme record exposes to the renderer.
pub trait ThemeSettings {
    fn typography(&self) -> &Typography;

    fn sidebar(&self) -> Option<&Sidebar> {
        None
    }
}

impl ThemeSettings for ClassicTheme {
    fn typography(&self) -> &Typography {
        &self.typography
    }
}

impl ThemeSettings for SidebarTheme {
    fn typography(&self) -> &Typography {
        &self.base.typography
    }

    fn sidebar(&self) -> Option<&Sidebar> {
        self.sidebar.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Design
// ---------------------------------------------------------------------------

/// The selected theme together with its settings.
#[derive(Debug, Clone, PartialEq)]
pub enum Design {
    Classic(ClassicTheme),
    ModernCv(ClassicTheme),
    Sb2nov(ClassicTheme),
    EngineeringResumes(ClassicTheme),
    EngineeringClassic(ClassicTheme),
    Sidebar(SidebarTheme),
}

impl Design {
    pub fn theme_name(&self) -> &'static str {
        match self {
            Design::Classic(_) => "classic",
            Design::ModernCv(_) => "moderncv",
            Design::Sb2nov(_) => "sb2nov",
            Design::EngineeringResumes(_) => "engineeringresumes",
            Design::EngineeringClassic(_) => "engineeringclassic",
            Design::Sidebar(_) => SIDEBAR_THEME,
        }
    }

    pub fn settings(&self) -> &dyn ThemeSettings {
        match self {
            Design::Classic(t)
            | Design::ModernCv(t)
            | Design::Sb2nov(t)
            | Design::EngineeringResumes(t)
            | Design::EngineeringClassic(t) => t,
            Design::Sidebar(t) => t,
        }
    }

    pub fn sidebar(&self) -> Option<&Sidebar> {
        self.settings().sidebar()
    }

    /// Default design of a registered theme.
    pub fn for_theme(name: &str) -> Option<Self> {
        theme_entry(name).map(|entry| (entry.defaults)())
    }
}

impl Default for Design {
    fn default() -> Self {
        Design::Classic(ClassicTheme::default())
    }
}

// ---------------------------------------------------------------------------
// Theme table
// ---------------------------------------------------------------------------

/// One registered theme: its defaults and how to decode a merged record.
pub struct ThemeEntry {
    pub name: &'static str,
    pub defaults: fn() -> Design,
    decode: fn(Value) -> serde_json::Result<Design>,
}

/// All built-in themes. New themes are added here.
pub static THEMES: &[ThemeEntry] = &[
    ThemeEntry {
        name: "classic",
        defaults: || Design::Classic(ClassicTheme::default()),
        decode: |v| serde_json::from_value(v).map(Design::Classic),
    },
    ThemeEntry {
        name: "moderncv",
        defaults: || Design::ModernCv(moderncv_defaults()),
        decode: |v| serde_json::from_value(v).map(Design::ModernCv),
    },
    ThemeEntry {
        name: "sb2nov",
        defaults: || Design::Sb2nov(sb2nov_defaults()),
        decode: |v| serde_json::from_value(v).map(Design::Sb2nov),
    },
    ThemeEntry {
        name: "engineeringresumes",
        defaults: || Design::EngineeringResumes(engineeringresumes_defaults()),
        decode: |v| serde_json::from_value(v).map(Design::EngineeringResumes),
    },
    ThemeEntry {
        name: "engineeringclassic",
        defaults: || Design::EngineeringClassic(engineeringclassic_defaults()),
        decode: |v| serde_json::from_value(v).map(Design::EngineeringClassic),
    },
    ThemeEntry {
        name: SIDEBAR_THEME,
        defaults: || Design::Sidebar(SidebarTheme::default()),
        decode: |v| serde_json::from_value(v).map(Design::Sidebar),
    },
];

pub fn theme_entry(name: &str) -> Option<&'static ThemeEntry> {
    THEMES.iter().find(|entry| entry.name == name)
}

pub fn available_themes() -> Vec<&'static str> {
    THEMES.iter().map(|entry| entry.name).collect()
}

fn moderncv_defaults() -> ClassicTheme {
    ClassicTheme {
        typography: Typography {
            font_family: "Fontin".to_string(),
            justify: false,
            ..Typography::default()
        },
        header: HeaderSettings {
            alignment: "left".to_string(),
            ..HeaderSettings::default()
        },
        section_titles: SectionTitles {
            style: "moderncv".to_string(),
            ..SectionTitles::default()
        },
        ..ClassicTheme::default()
    }
}

fn sb2nov_defaults() -> ClassicTheme {
    ClassicTheme {
        colors: Colors::uniform("rgb(0, 0, 0)", "rgb(0, 0, 0)"),
        typography: Typography {
            font_family: "New Computer Modern".to_string(),
            ..Typography::default()
        },
        section_titles: SectionTitles {
            style: "with_full_line".to_string(),
            ..SectionTitles::default()
        },
        entries: EntrySettings {
            highlight_bullet: "◦".to_string(),
            ..EntrySettings::default()
        },
        ..ClassicTheme::default()
    }
}

fn engineeringresumes_defaults() -> ClassicTheme {
    let margin = "0.5in".to_string();
    ClassicTheme {
        page: Page {
            top_margin: margin.clone(),
            bottom_margin: margin.clone(),
            left_margin: margin.clone(),
            right_margin: margin,
            show_top_note: false,
            ..Page::default()
        },
        colors: Colors::uniform("rgb(0, 0, 0)", "rgb(0, 0, 0)"),
        typography: Typography {
            font_family: "XCharter".to_string(),
            font_size: FontSize {
                name: "25pt".to_string(),
                section_titles: "1.2em".to_string(),
                ..FontSize::default()
            },
            ..Typography::default()
        },
        section_titles: SectionTitles {
            style: "with_full_line".to_string(),
            ..SectionTitles::default()
        },
        ..ClassicTheme::default()
    }
}

fn engineeringclassic_defaults() -> ClassicTheme {
    ClassicTheme {
        colors: Colors::uniform("rgb(0, 0, 0)", "rgb(0, 79, 144)"),
        typography: Typography {
            font_family: "Raleway".to_string(),
            ..Typography::default()
        },
        header: HeaderSettings {
            alignment: "left".to_string(),
            ..HeaderSettings::default()
        },
        ..ClassicTheme::default()
    }
}

// ---------------------------------------------------------------------------
// Serde
// ---------------------------------------------------------------------------

/// Recursively overlay `overlay` onto `base`; objects merge, anything else
/// replaces.
fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                merge_json(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, overlay) => *base = overlay,
    }
}

impl Serialize for Design {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let record = match self {
            Design::Classic(t)
            | Design::ModernCv(t)
            | Design::Sb2nov(t)
            | Design::EngineeringResumes(t)
            | Design::EngineeringClassic(t) => serde_json::to_value(t),
            Design::Sidebar(t) => serde_json::to_value(t),
        };
        let mut value = record.map_err(ser::Error::custom)?;
        if let Value::Object(map) = &mut value {
            map.insert("theme".to_string(), Value::from(self.theme_name()));
        }
        value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Design {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut overlay = Value::deserialize(deserializer)?;
        let name = overlay
            .get("theme")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_THEME)
            .to_string();
        let entry = theme_entry(&name).ok_or_else(|| {
            de::Error::custom(format!(
                "unknown theme `{name}` (available: {})",
                available_themes().join(", ")
            ))
        })?;
        if let Value::Object(map) = &mut overlay {
            map.remove("theme");
        }

        let mut merged = serde_json::to_value((entry.defaults)()).map_err(de::Error::custom)?;
        if let Value::Object(map) = &mut merged {
            map.remove("theme");
        }
        merge_json(&mut merged, overlay);
        (entry.decode)(merged).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_registered_theme_round_trips_its_name() {
        for entry in THEMES {
            let design = (entry.defaults)();
            assert_eq!(design.theme_name(), entry.name);
            let value = serde_json::to_value(&design).unwrap();
            assert_eq!(value["theme"], entry.name);
            let back: Design = serde_json::from_value(value).unwrap();
            assert_eq!(back, design);
        }
    }

    #[test]
    fn missing_theme_defaults_to_classic() {
        let design: Design = serde_json::from_value(json!({})).unwrap();
        assert_eq!(design, Design::default());
    }

    #[test]
    fn partial_settings_merge_over_theme_defaults() {
        let design: Design = serde_json::from_value(json!({
            "theme": "moderncv",
            "typography": { "font_size": { "body": "11pt" } }
        }))
        .unwrap();
        let typography = design.settings().typography();
        assert_eq!(typography.font_size.body, "11pt");
        assert_eq!(typography.font_family, "Fontin");
        assert_eq!(typography.font_size.name, "30pt");
    }

    #[test]
    fn sidebar_overrides_keep_remaining_defaults() {
        let design: Design = serde_json::from_value(json!({
            "theme": "sidebar",
            "sidebar": { "position": "right", "sections": ["skills"] }
        }))
        .unwrap();
        let sidebar = design.sidebar().expect("sidebar config");
        assert_eq!(sidebar.position, SidebarPosition::Right);
        assert_eq!(sidebar.sections, vec!["skills".to_string()]);
        assert_eq!(sidebar.width, "30%");
        assert_eq!(sidebar.gutter, "0.5cm");
    }

    #[test]
    fn sidebar_can_be_switched_off() {
        let design: Design =
            serde_json::from_value(json!({ "theme": "sidebar", "sidebar": null })).unwrap();
        assert_eq!(design.theme_name(), SIDEBAR_THEME);
        assert!(design.sidebar().is_none());
    }

    #[test]
    fn classic_has_no_sidebar() {
        assert!(Design::default().sidebar().is_none());
    }

    #[test]
    fn unknown_theme_lists_available() {
        let err = serde_json::from_value::<Design>(json!({ "theme": "fancy" })).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("fancy"), "{msg}");
        assert!(msg.contains("sidebar"), "{msg}");
    }
}
