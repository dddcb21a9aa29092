//! The request-facing data model: `TextElement`, `Position`, `Color`.
//!
//! These types derive `serde::{Serialize, Deserialize}` so that an external
//! adapter (out of scope for this crate) can decode the request's JSON
//! envelope field-for-field into them, even though this crate itself never
//! touches `stdin`/`stdout` or a filesystem path for request framing.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use stamp_text::FontWeight;

/// Horizontal text alignment, relative to `Position::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical text alignment, relative to `Position::y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerticalAlign {
    Top,
    #[default]
    Middle,
    Baseline,
}

/// How a circular run is anchored to `base_angle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutMode {
    #[default]
    StartAligned,
    CenterAligned,
}

/// Whether glyphs face the circle's center or away from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BaselinePosition {
    #[default]
    Inside,
    Outside,
}

/// An RGB color with optional alpha, parsed from `#RRGGBB`/`#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0, a: 255 };

    pub fn parse(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self {
                r: bytes(&hex[0..2])?,
                g: bytes(&hex[2..4])?,
                b: bytes(&hex[4..6])?,
                a: 255,
            }),
            8 => Some(Self {
                r: bytes(&hex[0..2])?,
                g: bytes(&hex[2..4])?,
                b: bytes(&hex[4..6])?,
                a: bytes(&hex[6..8])?,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Color::parse(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color {text:?}")))
    }
}

/// Where and how a text element is placed, combining the linear and
/// circular field sets into the single flat object the external JSON
/// schema uses (disambiguated by `is_circular`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default)]
    pub vertical_align: VerticalAlign,
    #[serde(default = "default_letter_spacing")]
    pub letter_spacing: f64,
    #[serde(default)]
    pub is_circular: bool,
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub base_angle: f64,
    #[serde(default)]
    pub max_angle: f64,
    #[serde(default)]
    pub layout_mode: LayoutMode,
    #[serde(default)]
    pub baseline_position: BaselinePosition,
}

fn default_letter_spacing() -> f64 {
    1.0
}

impl Position {
    /// `max_angle` clamped into `[0, 360]`.
    pub fn clamped_max_angle(&self) -> f64 {
        self.max_angle.clamp(0.0, 360.0)
    }
}

/// One piece of text to render, with its typographic attributes and
/// placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub id: String,
    pub value: String,
    pub font_family: String,
    pub font_size: f64,
    pub color: Color,
    #[serde(default, deserialize_with = "de_font_weight")]
    pub font_weight: Option<FontWeight>,
    #[serde(default)]
    pub variable_font_settings: BTreeMap<String, f32>,
    #[serde(default)]
    pub first_variant: Option<usize>,
    #[serde(default)]
    pub last_variant: Option<usize>,
    #[serde(default)]
    pub is_uppercase: bool,
    #[serde(default)]
    pub auto_bold: bool,
    #[serde(default)]
    pub text_padding: Option<f64>,
    pub position: Position,
}

impl TextElement {
    /// The value to render: uppercased if `is_uppercase` was set.
    pub fn effective_value(&self) -> String {
        if self.is_uppercase {
            self.value.to_uppercase()
        } else {
            self.value.clone()
        }
    }

    /// Whether this element should go through `VariantRenderer`.
    pub fn uses_variants(&self) -> bool {
        self.first_variant.is_some() || self.last_variant.is_some()
    }

    /// The variable-font axis settings as a sorted `(tag, value)` list,
    /// merging an explicit `auto_bold`/`font_weight` request for the
    /// `wght` axis when the caller did not set it directly.
    pub fn axis_settings(&self, forced_weight: Option<FontWeight>) -> Vec<(String, f32)> {
        let mut settings: BTreeMap<String, f32> = self.variable_font_settings.clone();
        if !settings.contains_key("wght") {
            if let Some(weight) = forced_weight.or(self.font_weight) {
                settings.insert("wght".to_string(), f32::from(weight.0));
            }
        }
        settings.into_iter().collect()
    }
}

fn de_font_weight<'de, D>(deserializer: D) -> Result<Option<FontWeight>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u16),
        Text(String),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    Ok(match raw {
        None => None,
        Some(Raw::Number(n)) => Some(FontWeight::from_number(n)),
        Some(Raw::Text(s)) => FontWeight::parse(&s),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_parses_rgb_and_rgba() {
        assert_eq!(Color::parse("#FF0000"), Some(Color { r: 255, g: 0, b: 0, a: 255 }));
        assert_eq!(
            Color::parse("00ff0080"),
            Some(Color { r: 0, g: 255, b: 0, a: 0x80 })
        );
        assert_eq!(Color::parse("nope"), None);
    }

    #[test]
    fn element_roundtrips_through_json() {
        let json = serde_json::json!({
            "id": "t1",
            "value": "Hello",
            "fontFamily": "Arial",
            "fontSize": 48.0,
            "color": "#112233",
            "fontWeight": "bold",
            "position": { "x": 10.0, "y": 20.0 }
        });
        let element: TextElement = serde_json::from_value(json).unwrap();
        assert_eq!(element.font_weight, Some(FontWeight::BOLD));
        assert_eq!(element.position.letter_spacing, 1.0);
        assert_eq!(element.position.text_align, TextAlign::Center);
    }

    #[test]
    fn numeric_font_weight_also_parses() {
        let json = serde_json::json!({
            "id": "t1",
            "value": "Hello",
            "fontFamily": "Arial",
            "fontSize": 48.0,
            "color": "#112233",
            "fontWeight": 650,
            "position": { "x": 0.0, "y": 0.0 }
        });
        let element: TextElement = serde_json::from_value(json).unwrap();
        assert_eq!(element.font_weight, Some(FontWeight(650)));
    }

    #[test]
    fn effective_value_uppercases_when_requested() {
        let mut element = sample_element();
        element.is_uppercase = true;
        element.value = "shout".to_string();
        assert_eq!(element.effective_value(), "SHOUT");
    }

    fn sample_element() -> TextElement {
        TextElement {
            id: "t1".into(),
            value: "hi".into(),
            font_family: "Arial".into(),
            font_size: 10.0,
            color: Color::BLACK,
            font_weight: None,
            variable_font_settings: BTreeMap::new(),
            first_variant: None,
            last_variant: None,
            is_uppercase: false,
            auto_bold: false,
            text_padding: None,
            position: Position {
                x: 0.0,
                y: 0.0,
                rotation: 0.0,
                text_align: TextAlign::default(),
                vertical_align: VerticalAlign::default(),
                letter_spacing: 1.0,
                is_circular: false,
                radius: 0.0,
                base_angle: 0.0,
                max_angle: 0.0,
                layout_mode: LayoutMode::default(),
                baseline_position: BaselinePosition::default(),
            },
        }
    }
}
