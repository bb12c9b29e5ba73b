//! Environment variable abstraction for testability.
//!
//! Production code uses [`Env::real()`] which delegates to [`std::env::var`].
//! Tests use [`Env::mock()`] backed by a `HashMap`, so credential lookups
//! can be exercised without touching the process environment.

use std::collections::HashMap;

/// Environment variable reader.
#[derive(Clone, Debug, Default)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

impl Env {
    /// Create an `Env` that reads from the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Create an `Env` backed by explicit key-value pairs.
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Look up an environment variable by name.
    pub fn var(&self, name: &str) -> Result<String, std::env::VarError> {
        match &self.overrides {
            Some(map) => map.get(name).cloned().ok_or(std::env::VarError::NotPresent),
            None => std::env::var(name),
        }
    }

    /// Look up a variable, treating blank values as unset.
    ///
    /// Credentials exported as `FOO_API_KEY=` must not configure a backend.
    pub fn non_empty(&self, name: &str) -> Option<String> {
        self.var(name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_env_reads_cargo_manifest_dir() {
        let env = Env::real();
        assert!(env.var("CARGO_MANIFEST_DIR").is_ok());
    }

    #[test]
    fn mock_env_returns_set_values() {
        let env = Env::mock([("GEMINI_API_KEY", "g-key"), ("CODDOC_LOG", "debug")]);
        assert_eq!(env.var("GEMINI_API_KEY").unwrap(), "g-key");
        assert_eq!(env.var("CODDOC_LOG").unwrap(), "debug");
        assert!(env.var("OPENAI_API_KEY").is_err());
    }

    #[test]
    fn non_empty_ignores_blank_values() {
        let env = Env::mock([("OPENAI_API_KEY", "   "), ("ANTHROPIC_API_KEY", " sk-a ")]);
        assert_eq!(env.non_empty("OPENAI_API_KEY"), None);
        assert_eq!(env.non_empty("ANTHROPIC_API_KEY").as_deref(), Some("sk-a"));
        assert_eq!(env.non_empty("GEMINI_API_KEY"), None);
    }
}
