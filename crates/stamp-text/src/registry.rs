//! Catalog of known font families and the `(family, weight)` resolution
//! chain.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use stamp_core::{StampError, StampResult};
use tracing::debug;

use crate::font::{AxisRange, Font};
use crate::variant::FontWeight;

/// A single known face: its canonical family name, where to find it on
/// disk, and whether it is a variable font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontRecord {
    pub family: String,
    pub path: PathBuf,
    pub is_variable: bool,
    pub axes: BTreeMap<String, AxisRange>,
}

/// A `family_name -> FontRecord` catalog with case-insensitive and
/// weighted-suffix fallback lookup.
///
/// Constructed once per request from an explicit mapping; never a
/// process-wide singleton.
#[derive(Debug, Clone, Default)]
pub struct FontRegistry {
    /// Exact (case-sensitive) family name -> record.
    records: BTreeMap<String, FontRecord>,
    /// Lowercased family name -> the exact key in `records` to use for a
    /// case-insensitive match.
    by_lowercase: BTreeMap<String, String>,
    /// The family name to fall back to when nothing else resolves.
    default_family: Option<String>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a face under `family`, analyzing `path` for variability. If
    /// `family` contains a `-`, the base before the last `-` is also
    /// indexed (if not already present) so that e.g. `Montserrat-Bold`
    /// makes `Montserrat` resolvable too.
    pub fn insert(&mut self, family: impl Into<String>, path: impl Into<PathBuf>) {
        let family = family.into();
        let path = path.into();
        let (is_variable, axes) = analyze(&path).unwrap_or_else(|err| {
            debug!(?err, family, "font analysis failed, treating as static");
            (false, BTreeMap::new())
        });

        self.by_lowercase.insert(family.to_lowercase(), family.clone());
        let record =
            FontRecord { family: family.clone(), path: path.clone(), is_variable, axes };

        if let Some((base, _suffix)) = family.rsplit_once('-') {
            self.records.entry(base.to_string()).or_insert_with(|| FontRecord {
                family: base.to_string(),
                ..record.clone()
            });
            self.by_lowercase.entry(base.to_lowercase()).or_insert_with(|| base.to_string());
        }

        self.records.insert(family, record);
    }

    /// Mark `family` as the system default used when every other
    /// resolution step fails.
    pub fn set_default(&mut self, family: impl Into<String>) {
        self.default_family = Some(family.into());
    }

    /// Resolve `(family, weight_hint)` to a font record, following the
    /// fixed fallback chain: exact match, weighted-name fallback,
    /// case-insensitive match, suffix-stripped retry, system default.
    pub fn resolve(
        &self,
        family: &str,
        weight_hint: Option<FontWeight>,
    ) -> StampResult<FontRecord> {
        if let Some(record) = self.records.get(family) {
            return Ok(record.clone());
        }
        debug!(family, "no exact family match");

        if let Some(weight) = weight_hint {
            if !family.contains('-') {
                let candidate = format!("{family}-{}", weight.name());
                if let Some(record) = self.records.get(&candidate) {
                    debug!(family, candidate, "resolved via weighted-name fallback");
                    return Ok(record.clone());
                }
                debug!(family, candidate, "weighted-name fallback missed");
            }
        }

        if let Some(canonical) = self.by_lowercase.get(&family.to_lowercase()) {
            if let Some(record) = self.records.get(canonical) {
                debug!(family, canonical, "resolved via case-insensitive match");
                return Ok(record.clone());
            }
        }

        if let Some((base, _)) = family.rsplit_once('-') {
            debug!(family, base, "retrying resolution with suffix stripped");
            if let Ok(record) = self.resolve(base, weight_hint) {
                return Ok(record);
            }
        }

        if let Some(default_family) = &self.default_family {
            if let Some(record) = self.records.get(default_family) {
                debug!(family, default_family, "falling back to system default");
                return Ok(record.clone());
            }
        }

        Err(StampError::NoFontsAvailable)
    }

    /// Load and parse the font referenced by `record` from disk.
    pub fn load(&self, record: &FontRecord) -> StampResult<Font> {
        let data = fs::read(&record.path)
            .map_err(|_| StampError::FaceLoadFailed { path: record.path.clone() })?;
        Font::new(data, 0).ok_or_else(|| StampError::FaceLoadFailed {
            path: record.path.clone(),
        })
    }

    /// Whether the registry has no records at all.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Compute variability and axis metadata for the face at `path`.
fn analyze(path: &Path) -> StampResult<(bool, BTreeMap<String, AxisRange>)> {
    let data = fs::read(path)
        .map_err(|_| StampError::FaceLoadFailed { path: path.to_path_buf() })?;
    let ttf = ttf_parser::Face::parse(&data, 0)
        .map_err(|_| StampError::FaceLoadFailed { path: path.to_path_buf() })?;

    let mut axes = BTreeMap::new();
    for axis in ttf.variation_axes() {
        axes.insert(
            axis.tag.to_string(),
            AxisRange { min: axis.min_value, default: axis.def_value, max: axis.max_value },
        );
    }

    let mut is_variable = ttf.is_variable();
    if !is_variable && axes.is_empty() {
        let lower = path.to_string_lossy().to_lowercase();
        if lower.contains("variable") || lower.contains("vf") {
            is_variable = true;
            axes.insert(
                "wght".to_string(),
                AxisRange { min: 100.0, default: 400.0, max: 900.0 },
            );
        }
    }

    Ok((is_variable, axes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_without_disk() -> FontRegistry {
        // Exercises the fallback chain purely against in-memory records, so
        // these tests don't depend on any font files being present.
        let mut registry = FontRegistry::new();
        registry.records.insert(
            "Montserrat".to_string(),
            FontRecord {
                family: "Montserrat".to_string(),
                path: PathBuf::from("/fonts/Montserrat.ttf"),
                is_variable: true,
                axes: BTreeMap::new(),
            },
        );
        registry.records.insert(
            "Montserrat-Bold".to_string(),
            FontRecord {
                family: "Montserrat-Bold".to_string(),
                path: PathBuf::from("/fonts/Montserrat-Bold.ttf"),
                is_variable: false,
                axes: BTreeMap::new(),
            },
        );
        registry
            .by_lowercase
            .insert("montserrat".to_string(), "Montserrat".to_string());
        registry
            .by_lowercase
            .insert("montserrat-bold".to_string(), "Montserrat-Bold".to_string());
        registry.set_default("Montserrat");
        registry
    }

    #[test]
    fn exact_match_wins() {
        let registry = registry_without_disk();
        let record = registry.resolve("Montserrat", None).unwrap();
        assert_eq!(record.family, "Montserrat");
    }

    #[test]
    fn weighted_name_fallback() {
        let registry = registry_without_disk();
        let record = registry.resolve("Montserrat", Some(FontWeight::BOLD)).unwrap();
        assert_eq!(record.family, "Montserrat-Bold");
    }

    #[test]
    fn case_insensitive_match() {
        let registry = registry_without_disk();
        let record = registry.resolve("montserrat", None).unwrap();
        assert_eq!(record.family, "Montserrat");
    }

    #[test]
    fn suffix_stripped_then_retried() {
        let registry = registry_without_disk();
        let record = registry.resolve("Montserrat-Black", None).unwrap();
        assert_eq!(record.family, "Montserrat");
    }

    #[test]
    fn unknown_family_falls_back_to_default() {
        let registry = registry_without_disk();
        let record = registry.resolve("Nonexistent", None).unwrap();
        assert_eq!(record.family, "Montserrat");
    }

    #[test]
    fn empty_registry_signals_no_fonts() {
        let registry = FontRegistry::new();
        assert!(matches!(
            registry.resolve("Anything", None),
            Err(StampError::NoFontsAvailable)
        ));
    }

    #[test]
    fn resolution_is_pure() {
        let registry = registry_without_disk();
        let a = registry.resolve("Montserrat", Some(FontWeight::BOLD));
        let b = registry.resolve("Montserrat", Some(FontWeight::BOLD));
        assert_eq!(a, b);
    }
}
