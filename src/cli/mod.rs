//! CLI command definitions and input helpers.
//!
//! Uses clap derive macros for ergonomic argument definitions.

pub mod args;

use std::io::Read;
use std::path::Path;

/// Language assumed when the extension is missing or unknown.
pub const FALLBACK_LANGUAGE: &str = "python";

/// Guess the language of `path` from its extension.
pub fn detect_language(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("py") => "python",
        Some("js") => "javascript",
        Some("ts") => "typescript",
        Some("java") => "java",
        Some("go") => "go",
        Some("rs") => "rust",
        Some("cpp") => "cpp",
        Some("cs") => "csharp",
        Some("rb") => "ruby",
        Some("php") => "php",
        _ => FALLBACK_LANGUAGE,
    }
}

/// Read source from `path`, or from stdin when `path` is `-`.
pub fn read_source(path: &Path) -> std::io::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
    }
}

/// File name recorded alongside a result; `None` for stdin.
pub fn display_filename(path: &Path) -> Option<String> {
    if path == Path::new("-") {
        return None;
    }
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}
