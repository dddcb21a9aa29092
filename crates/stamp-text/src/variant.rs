//! Font weight: the one axis of variation the stamp engine actually reasons
//! about (no italic/oblique style, no width/stretch — fonts here are
//! selected by family and weight only).

use std::fmt::{self, Debug, Formatter};

use serde::{Deserialize, Serialize};

/// The weight of a font, 100-900, following the CSS `font-weight` scale.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontWeight(pub u16);

/// Font weight names and numbers.
/// See `<https://developer.mozilla.org/en-US/docs/Web/CSS/@font-face/font-weight#common_weight_name_mapping>`
impl FontWeight {
    /// Thin weight (100).
    pub const THIN: Self = Self(100);
    /// Extra light weight (200).
    pub const EXTRALIGHT: Self = Self(200);
    /// Light weight (300).
    pub const LIGHT: Self = Self(300);
    /// Regular weight (400).
    pub const REGULAR: Self = Self(400);
    /// Medium weight (500).
    pub const MEDIUM: Self = Self(500);
    /// Semibold weight (600).
    pub const SEMIBOLD: Self = Self(600);
    /// Bold weight (700).
    pub const BOLD: Self = Self(700);
    /// Extrabold weight (800).
    pub const EXTRABOLD: Self = Self(800);
    /// Black weight (900).
    pub const BLACK: Self = Self(900);

    /// Create a font weight from a number, clamping it to `100..=900`.
    pub fn from_number(weight: u16) -> Self {
        Self(weight.clamp(100, 900))
    }

    /// The canonical name for this weight, e.g. `"Bold"`, used to build the
    /// `family-WeightName` fallback lookup key.
    pub fn name(self) -> &'static str {
        match self.round() {
            Self::THIN => "Thin",
            Self::EXTRALIGHT => "ExtraLight",
            Self::LIGHT => "Light",
            Self::REGULAR => "Regular",
            Self::MEDIUM => "Medium",
            Self::SEMIBOLD => "SemiBold",
            Self::BOLD => "Bold",
            Self::EXTRABOLD => "ExtraBold",
            _ => "Black",
        }
    }

    /// Round to the nearest of the nine named weights.
    fn round(self) -> Self {
        const STEPS: [u16; 9] = [100, 200, 300, 400, 500, 600, 700, 800, 900];
        let nearest = STEPS
            .iter()
            .copied()
            .min_by_key(|&s| (s as i32 - self.0 as i32).unsigned_abs())
            .unwrap_or(400);
        Self(nearest)
    }

    /// Parse a weight from a JSON-ish value: a bare integer string
    /// (`"700"`), a CSS synonym (`"bold"`, `"medium"`, ...), or `None` if
    /// neither matches.
    pub fn parse(text: &str) -> Option<Self> {
        let lower = text.trim().to_ascii_lowercase();
        if let Some(weight) = synonym(&lower) {
            return Some(weight);
        }
        lower.parse::<u16>().ok().map(Self::from_number)
    }

    /// The absolute numeric distance between this and another weight.
    pub fn distance(self, other: Self) -> u16 {
        (self.0 as i16 - other.0 as i16).unsigned_abs()
    }
}

/// CSS weight synonyms, checked before falling back to a bare number.
fn synonym(lower: &str) -> Option<FontWeight> {
    Some(match lower {
        "thin" | "hairline" => FontWeight::THIN,
        "extralight" | "ultralight" => FontWeight::EXTRALIGHT,
        "light" => FontWeight::LIGHT,
        "normal" | "regular" => FontWeight::REGULAR,
        "medium" => FontWeight::MEDIUM,
        "semibold" | "demibold" => FontWeight::SEMIBOLD,
        "bold" => FontWeight::BOLD,
        "extrabold" | "ultrabold" => FontWeight::EXTRABOLD,
        "black" | "heavy" => FontWeight::BLACK,
        _ => return None,
    })
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::REGULAR
    }
}

impl Debug for FontWeight {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_distance() {
        let d = |a, b| FontWeight(a).distance(FontWeight(b));
        assert_eq!(d(500, 200), 300);
        assert_eq!(d(500, 500), 0);
        assert_eq!(d(500, 900), 400);
    }

    #[test]
    fn weight_names_round_to_nearest() {
        assert_eq!(FontWeight(720).name(), "Bold");
        assert_eq!(FontWeight(650).name(), "Bold");
        assert_eq!(FontWeight(100).name(), "Thin");
        assert_eq!(FontWeight(900).name(), "Black");
    }

    #[test]
    fn parse_synonyms_and_numbers() {
        assert_eq!(FontWeight::parse("bold"), Some(FontWeight::BOLD));
        assert_eq!(FontWeight::parse("Medium"), Some(FontWeight::MEDIUM));
        assert_eq!(FontWeight::parse("650"), Some(FontWeight(650)));
        assert_eq!(FontWeight::parse("not-a-weight"), None);
    }
}
