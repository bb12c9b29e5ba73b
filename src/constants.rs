//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and storage layout so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "coddoc";

/// Crate version baked in at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Local config filename (e.g. `.coddoc.toml` in the working directory).
pub const CONFIG_FILENAME: &str = ".coddoc.toml";

/// Directory name under `~/.config/` (global config) and the platform data
/// directory (stored records).
pub const CONFIG_DIR: &str = "coddoc";

/// Sub-directory of the data dir holding review records.
pub const REVIEWS_TABLE: &str = "reviews";

/// Sub-directory of the data dir holding documentation records.
pub const DOCUMENTATION_TABLE: &str = "documentation";

/// Upper bound on a single backend round trip.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Documentation style used when none is requested.
pub const DEFAULT_DOC_STYLE: &str = "google";

// ── Environment variable names ──────────────────────────────────────

pub const ENV_DEFAULT_PROVIDER: &str = "CODDOC_DEFAULT_PROVIDER";
pub const ENV_TIMEOUT_SECS: &str = "CODDOC_TIMEOUT_SECS";
pub const ENV_DATA_DIR: &str = "CODDOC_DATA_DIR";
pub const ENV_LOG: &str = "CODDOC_LOG";
