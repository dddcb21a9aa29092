//! Builds a [`stamp_text::FontRegistry`] from an explicit `font_mapping`
//! (family name -> absolute path) merged over a configurable system
//! default: the single source of truth for *which* faces a request can
//! see.
//!
//! This crate never scans a directory or the host's installed fonts for
//! candidates — font discovery is an external collaborator's job.
//! `stamp-kit` only merges what the caller already resolved to paths
//! (`FontRegistryConfig`) over a `default_family`, which must itself
//! already be a key of `font_mapping` (or absent). There is no font asset
//! embedded in this crate, so callers are expected to always supply at
//! least one mapping entry.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use stamp_text::FontRegistry;
use tracing::{debug, warn};

/// The construction-time configuration for a [`FontRegistry`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontRegistryConfig {
    /// Family name -> absolute font path overrides, as decoded from the
    /// request's `fontMapping` field.
    pub font_mapping: BTreeMap<String, PathBuf>,
    /// The family to fall back to when a requested family resolves to
    /// nothing else. Must be a key of `font_mapping` to have any effect;
    /// silently ignored otherwise (a warning is logged instead).
    pub default_family: Option<String>,
}

/// Build a [`FontRegistry`] from `config`.
///
/// Every entry in `config.font_mapping` is inserted as-is. The default
/// family is `config.default_family` if it names a mapping entry;
/// otherwise, the lexicographically first mapping entry is used instead
/// (so a registry built from a non-empty mapping always has *some*
/// default), with a `tracing::debug!` noting the substitution. An empty
/// mapping produces an empty registry with no default at all — resolution
/// against it will signal `StampError::NoFontsAvailable`, since there is
/// no usable face for it to resolve to.
#[tracing::instrument(level = "debug", skip(config), fields(n = config.font_mapping.len()))]
pub fn build_registry(config: &FontRegistryConfig) -> FontRegistry {
    let mut registry = FontRegistry::new();

    for (family, path) in &config.font_mapping {
        debug!(family, path = %path.display(), "registering font mapping entry");
        registry.insert(family.clone(), path.clone());
    }

    match &config.default_family {
        Some(family) if config.font_mapping.contains_key(family) => {
            registry.set_default(family.clone());
        }
        Some(family) => {
            warn!(
                requested = family,
                "default_family is not present in font_mapping, falling back to the first entry"
            );
            if let Some(first) = config.font_mapping.keys().next() {
                registry.set_default(first.clone());
            }
        }
        None => {
            if let Some(first) = config.font_mapping.keys().next() {
                debug!(family = first, "no default_family given, using the first mapping entry");
                registry.set_default(first.clone());
            }
        }
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, &str)]) -> BTreeMap<String, PathBuf> {
        pairs.iter().map(|&(k, v)| (k.to_string(), PathBuf::from(v))).collect()
    }

    #[test]
    fn empty_config_yields_empty_registry() {
        let registry = build_registry(&FontRegistryConfig::default());
        assert!(registry.is_empty());
        assert!(matches!(
            registry.resolve("Anything", None),
            Err(stamp_core::StampError::NoFontsAvailable)
        ));
    }

    #[test]
    fn explicit_default_family_wins_when_present() {
        let config = FontRegistryConfig {
            font_mapping: mapping(&[("Arial", "/fonts/arial.ttf"), ("Roboto", "/fonts/roboto.ttf")]),
            default_family: Some("Roboto".to_string()),
        };
        let registry = build_registry(&config);
        let record = registry.resolve("Nonexistent", None).unwrap();
        assert_eq!(record.family, "Roboto");
    }

    #[test]
    fn missing_default_family_falls_back_to_first_entry() {
        let config = FontRegistryConfig {
            font_mapping: mapping(&[("Arial", "/fonts/arial.ttf"), ("Roboto", "/fonts/roboto.ttf")]),
            default_family: Some("NotMapped".to_string()),
        };
        let registry = build_registry(&config);
        let record = registry.resolve("Nonexistent", None).unwrap();
        assert_eq!(record.family, "Arial");
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = FontRegistryConfig {
            font_mapping: mapping(&[("Arial", "/fonts/arial.ttf")]),
            default_family: Some("Arial".to_string()),
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: FontRegistryConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.font_mapping.len(), 1);
        assert_eq!(back.default_family.as_deref(), Some("Arial"));
    }
}
