//! Backend-agnostic prompt construction.
//!
//! Prompts are a pure function of their inputs so that the text sent to a
//! backend can be asserted on byte-for-byte in tests. The schema described
//! here is a request, not a guarantee: the normalizer never assumes the
//! backend complied.

use crate::constants::DEFAULT_DOC_STYLE;

/// What the backend is asked to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Quality and security review.
    Analyze,
    /// Structured documentation in the given docstring style.
    Document { style: String },
}

impl Task {
    /// Documentation task, falling back to the default style for blanks.
    pub fn document(style: Option<&str>) -> Self {
        let style = style
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_DOC_STYLE);
        Task::Document {
            style: style.to_string(),
        }
    }

    /// Requested docstring style, for documentation tasks.
    pub fn style(&self) -> Option<&str> {
        match self {
            Task::Analyze => None,
            Task::Document { style } => Some(style),
        }
    }
}

/// Inputs to [`build`].
#[derive(Debug, Clone)]
pub struct PromptRequest<'a> {
    pub task: Task,
    pub code: &'a str,
    pub language: &'a str,
    pub filename: Option<&'a str>,
}

const REVIEW_SCHEMA: &str = r#"{
    "summary": "Overall assessment of the code quality",
    "quality_score": <number between 0-10>,
    "issues": [
        {
            "severity": "critical|high|medium|low|info",
            "category": "performance|security|maintainability|style|bug",
            "description": "Description of the issue",
            "line_number": <number or null>,
            "suggestion": "How to fix it"
        }
    ],
    "suggestions": [
        {
            "title": "Suggestion title",
            "description": "Detailed description",
            "code_example": "Example code or null",
            "priority": "high|medium|low"
        }
    ],
    "security_concerns": [
        {
            "severity": "critical|high|medium|low",
            "title": "Security issue title",
            "description": "Description of the security concern",
            "recommendation": "How to address it"
        }
    ]
}"#;

const DOCUMENTATION_SCHEMA: &str = r#"{
    "overview": "High-level description of what this code does",
    "functions": [
        {
            "name": "function_name",
            "description": "What the function does",
            "parameters": [
                {
                    "name": "param_name",
                    "type": "param_type",
                    "description": "Parameter description"
                }
            ],
            "returns": {
                "type": "return_type",
                "description": "What is returned"
            },
            "examples": ["Example usage code"]
        }
    ],
    "classes": [
        {
            "name": "ClassName",
            "description": "What the class does",
            "attributes": [
                {
                    "name": "attr_name",
                    "type": "attr_type",
                    "description": "Attribute description"
                }
            ],
            "methods": [<same structure as functions, without further nesting>]
        }
    ],
    "usage_examples": ["Complete usage examples"]
}"#;

/// Build the instruction text for a request.
pub fn build(request: &PromptRequest<'_>) -> String {
    let language = request.language.trim();
    let mut prompt = match &request.task {
        Task::Analyze => format!(
            "You are an expert code reviewer. Analyze the following {language} code \
             and provide a comprehensive review covering code quality, bugs, \
             performance, maintainability and security.\n\n"
        ),
        Task::Document { style } => format!(
            "You are an expert technical writer. Generate comprehensive documentation \
             for the following {language} code in {style} style.\n\n"
        ),
    };

    if let Some(filename) = request.filename.filter(|f| !f.trim().is_empty()) {
        prompt.push_str(&format!("File: {filename}\n\n"));
    }

    prompt.push_str(&format!(
        "Code:\n```{language}\n{}\n```\n\n",
        request.code.trim_end_matches('\n')
    ));

    let (noun, schema) = match request.task {
        Task::Analyze => ("your analysis", REVIEW_SCHEMA),
        Task::Document { .. } => ("documentation", DOCUMENTATION_SCHEMA),
    };
    prompt.push_str(&format!(
        "Provide {noun} in the following JSON format:\n{schema}\n\n\
         Only return valid JSON, no additional text."
    ));

    prompt
}
