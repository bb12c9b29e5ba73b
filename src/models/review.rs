//! Code review result schema.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lenient;

/// Implements a case-insensitive `Deserialize` on top of `from_label`.
///
/// Unknown labels are rejected so that the surrounding array element is
/// dropped by [`lenient::seq`] instead of being silently reclassified.
macro_rules! lenient_enum {
    ($ty:ident, $expected:literal) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $ty::from_label(&s).ok_or_else(|| {
                    serde::de::Error::custom(format!("unknown {}: '{s}'", $expected))
                })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Severity of a code issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl IssueSeverity {
    /// Map a backend label (including common synonyms) onto a severity.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "critical" | "blocker" | "fatal" => Some(Self::Critical),
            "high" | "error" | "severe" | "major" => Some(Self::High),
            "medium" | "moderate" | "warning" | "warn" => Some(Self::Medium),
            "low" | "minor" | "trivial" => Some(Self::Low),
            "info" | "informational" | "note" | "suggestion" => Some(Self::Info),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Info => "info",
        }
    }
}

lenient_enum!(IssueSeverity, "issue severity");

/// Area of the codebase an issue concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Performance,
    Security,
    Maintainability,
    Style,
    Bug,
}

impl IssueCategory {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "performance" | "perf" | "efficiency" => Some(Self::Performance),
            "security" => Some(Self::Security),
            "maintainability" | "readability" | "complexity" | "design" => {
                Some(Self::Maintainability)
            }
            "style" | "formatting" | "convention" => Some(Self::Style),
            "bug" | "correctness" | "logic" | "error" => Some(Self::Bug),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Performance => "performance",
            Self::Security => "security",
            Self::Maintainability => "maintainability",
            Self::Style => "style",
            Self::Bug => "bug",
        }
    }
}

lenient_enum!(IssueCategory, "issue category");

/// Priority of an improvement suggestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "high" | "critical" | "urgent" => Some(Self::High),
            "medium" | "moderate" | "normal" => Some(Self::Medium),
            "low" | "minor" | "optional" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

lenient_enum!(Priority, "priority");

/// Severity of a security concern. Has no `info` level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcernSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ConcernSeverity {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "critical" | "blocker" | "fatal" => Some(Self::Critical),
            "high" | "error" | "severe" | "major" => Some(Self::High),
            "medium" | "moderate" | "warning" | "warn" => Some(Self::Medium),
            "low" | "minor" | "info" | "informational" | "note" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

lenient_enum!(ConcernSeverity, "security severity");

/// A single problem found in the submitted code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: IssueSeverity,
    pub category: IssueCategory,
    #[serde(deserialize_with = "lenient::required_text")]
    pub description: String,
    /// 1-based line the issue refers to, when the backend gave one.
    #[serde(default, deserialize_with = "lenient::line_number")]
    pub line_number: Option<u32>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub suggestion: String,
}

/// An improvement that is not tied to a specific defect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(deserialize_with = "lenient::required_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::required_text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub code_example: Option<String>,
    #[serde(default)]
    pub priority: Priority,
}

/// A security-relevant finding with remediation advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityConcern {
    pub severity: ConcernSeverity,
    #[serde(deserialize_with = "lenient::required_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub recommendation: String,
}

/// Normalized outcome of an analyze request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    #[serde(default, deserialize_with = "lenient::text")]
    pub summary: String,
    /// Always within `0..=10`.
    #[serde(default, deserialize_with = "lenient::score")]
    pub quality_score: f64,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub issues: Vec<Issue>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub suggestions: Vec<Suggestion>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub security_concerns: Vec<SecurityConcern>,
}

impl ReviewResult {
    /// Degraded result carrying the reason the backend reply was unusable.
    pub fn fallback(reason: &str) -> Self {
        Self {
            summary: format!("Error analyzing code: {reason}"),
            quality_score: 0.0,
            issues: Vec::new(),
            suggestions: Vec::new(),
            security_concerns: Vec::new(),
        }
    }
}
