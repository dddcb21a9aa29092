//! Optional logging bootstrap for binaries and tests that embed this crate.
//!
//! The rendering engine itself never installs a subscriber; it only emits
//! `tracing` events. This helper exists so embedding binaries and
//! integration tests get a sensible default (`RUST_LOG`-driven filtering to
//! stderr) without each one re-deriving the same three lines.

use tracing_subscriber::EnvFilter;

/// Install a process-wide `tracing` subscriber that writes to stderr and
/// honors `RUST_LOG`, defaulting to `info` if unset.
///
/// Calling this more than once in a process is harmless; the second call is
/// a no-op (the global subscriber cannot be replaced).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
