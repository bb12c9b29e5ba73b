//! Terminal renderer: styled flowing text, no tables.

use colored::{ColoredString, Colorize};

use crate::models::documentation::FunctionDoc;
use crate::models::review::{ConcernSeverity, IssueSeverity, Priority};
use crate::models::{DocumentationResult, RecordSummary, ReviewResult, StoredRecord};
use crate::output::OutputRenderer;
use crate::providers::BackendInfo;
use crate::store::Page;

/// Terminal output renderer with colored, flowing text.
pub struct TerminalRenderer;

const RULE: &str = "───────────────────────────────────";

fn issue_badge(severity: IssueSeverity) -> ColoredString {
    let label = severity.as_str();
    match severity {
        IssueSeverity::Critical => label.red().bold(),
        IssueSeverity::High => label.red(),
        IssueSeverity::Medium => label.yellow().bold(),
        IssueSeverity::Low => label.yellow(),
        IssueSeverity::Info => label.blue(),
    }
}

fn concern_badge(severity: ConcernSeverity) -> ColoredString {
    let label = severity.as_str();
    match severity {
        ConcernSeverity::Critical => label.red().bold(),
        ConcernSeverity::High => label.red(),
        ConcernSeverity::Medium => label.yellow().bold(),
        ConcernSeverity::Low => label.yellow(),
    }
}

fn priority_badge(priority: Priority) -> ColoredString {
    let label = priority.as_str();
    match priority {
        Priority::High => label.magenta().bold(),
        Priority::Medium => label.magenta(),
        Priority::Low => label.dimmed(),
    }
}

fn score_badge(score: f64) -> ColoredString {
    let text = format!("{score:.1}/10");
    if score >= 8.0 {
        text.green().bold()
    } else if score >= 5.0 {
        text.yellow().bold()
    } else {
        text.red().bold()
    }
}

fn header<T>(out: &mut String, title: &str, record: &StoredRecord<T>) {
    let name = record.filename.as_deref().unwrap_or("<inline>");
    out.push_str(&format!(
        " {} {} {}\n",
        title.bold(),
        name.bold(),
        format!("({}, via {})", record.language, record.backend).dimmed()
    ));
    out.push_str(&format!(
        "   {} {}\n\n",
        "id:".dimmed(),
        record.id.to_string().cyan()
    ));
}

fn render_function(out: &mut String, func: &FunctionDoc, indent: &str) {
    out.push_str(&format!("{indent}{}\n", func.name.bold()));
    if !func.description.is_empty() {
        out.push_str(&format!("{indent}  {}\n", func.description));
    }
    for param in &func.parameters {
        let ty = if param.type_name.is_empty() {
            String::new()
        } else {
            format!(" ({})", param.type_name)
        };
        out.push_str(&format!(
            "{indent}  {} {}{} {}\n",
            "·".cyan(),
            param.name,
            ty.dimmed(),
            param.description
        ));
    }
    if !func.returns.type_name.is_empty() || !func.returns.description.is_empty() {
        out.push_str(&format!(
            "{indent}  {} {} {}\n",
            "→".cyan(),
            func.returns.type_name,
            func.returns.description.dimmed()
        ));
    }
    for example in &func.examples {
        out.push_str(&format!("{indent}  {} {}\n", "e.g.".dimmed(), example));
    }
}

impl OutputRenderer for TerminalRenderer {
    fn review(&self, record: &StoredRecord<ReviewResult>) -> String {
        let review = &record.payload;
        let mut out = String::new();
        header(&mut out, "Review of", record);

        out.push_str(&format!(
            " {} {}\n   {}\n\n",
            "Quality".bold(),
            score_badge(review.quality_score),
            review.summary
        ));

        if review.issues.is_empty() {
            out.push_str(&format!("{}", "  ✔ No issues found.\n\n".green()));
        }
        for issue in &review.issues {
            let location = issue
                .line_number
                .map(|n| format!(" at line {n}"))
                .unwrap_or_default();
            out.push_str(&format!(
                " {} {} {}{}\n   {}\n",
                "✖".red(),
                issue_badge(issue.severity),
                issue.category.as_str().bold(),
                location,
                issue.description
            ));
            if !issue.suggestion.is_empty() {
                out.push_str(&format!("   {} {}\n", "→".cyan(), issue.suggestion));
            }
            out.push('\n');
        }

        for concern in &review.security_concerns {
            out.push_str(&format!(
                " {} {} {}\n",
                "⚠".yellow().bold(),
                concern_badge(concern.severity),
                concern.title.bold()
            ));
            if !concern.description.is_empty() {
                out.push_str(&format!("   {}\n", concern.description));
            }
            if !concern.recommendation.is_empty() {
                out.push_str(&format!("   {} {}\n", "→".cyan(), concern.recommendation));
            }
            out.push('\n');
        }

        for suggestion in &review.suggestions {
            out.push_str(&format!(
                " {} {} {}\n   {}\n",
                "✎".cyan(),
                priority_badge(suggestion.priority),
                suggestion.title.bold(),
                suggestion.description
            ));
            if let Some(ref example) = suggestion.code_example {
                for line in example.lines() {
                    out.push_str(&format!("     {}\n", line.dimmed()));
                }
            }
            out.push('\n');
        }

        out.push_str(&format!("{}\n", RULE.dimmed()));
        out.push_str(&format!(
            " {} {}, {} {}, {} {}\n",
            review.issues.len().to_string().bold(),
            if review.issues.len() == 1 { "issue" } else { "issues" },
            review.security_concerns.len().to_string().bold(),
            if review.security_concerns.len() == 1 {
                "security concern"
            } else {
                "security concerns"
            },
            review.suggestions.len().to_string().bold(),
            if review.suggestions.len() == 1 {
                "suggestion"
            } else {
                "suggestions"
            },
        ));
        out
    }

    fn documentation(&self, record: &StoredRecord<DocumentationResult>) -> String {
        let doc = &record.payload;
        let mut out = String::new();
        header(&mut out, "Documentation for", record);
        out.push_str(&format!(" {}\n\n", doc.overview));

        if !doc.functions.is_empty() {
            out.push_str(&format!(" {}\n", "Functions".bold().underline()));
            for func in &doc.functions {
                render_function(&mut out, func, "   ");
                out.push('\n');
            }
        }

        if !doc.classes.is_empty() {
            out.push_str(&format!(" {}\n", "Classes".bold().underline()));
            for class in &doc.classes {
                out.push_str(&format!("   {}\n", class.name.bold()));
                if !class.description.is_empty() {
                    out.push_str(&format!("     {}\n", class.description));
                }
                for attr in &class.attributes {
                    out.push_str(&format!(
                        "     {} {} {}\n",
                        "·".cyan(),
                        attr.name,
                        attr.description.dimmed()
                    ));
                }
                for method in &class.methods {
                    render_function(&mut out, method, "     ");
                }
                out.push('\n');
            }
        }

        if !doc.usage_examples.is_empty() {
            out.push_str(&format!(" {}\n", "Usage".bold().underline()));
            for example in &doc.usage_examples {
                for line in example.lines() {
                    out.push_str(&format!("   {line}\n"));
                }
                out.push('\n');
            }
        }

        if let Some(ref style) = record.doc_style {
            out.push_str(&format!("{}\n", RULE.dimmed()));
            out.push_str(&format!(" {} {}\n", "style:".dimmed(), style));
        }
        out
    }

    fn records(&self, kind: &str, page: &Page<RecordSummary>) -> String {
        if page.items.is_empty() {
            return format!(
                "  No {kind} found (page {} of {}, {} total).\n",
                page.page,
                page.page_count.max(1),
                page.total
            );
        }

        let mut out = String::new();
        for item in &page.items {
            let score = item
                .quality_score
                .map(|s| format!("  {}", score_badge(s)))
                .unwrap_or_default();
            let style = item
                .doc_style
                .as_deref()
                .map(|s| format!("  {}", s.dimmed()))
                .unwrap_or_default();
            out.push_str(&format!(
                " {}  {}  {}{}{}\n   {}\n",
                item.id.to_string().cyan(),
                item.language.bold(),
                item.filename.as_deref().unwrap_or("<inline>"),
                score,
                style,
                format!(
                    "{} via {}",
                    item.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    item.backend
                )
                .dimmed()
            ));
        }
        out.push_str(&format!("{}\n", RULE.dimmed()));
        out.push_str(&format!(
            " page {} of {}, {} {kind} total\n",
            page.page, page.page_count, page.total
        ));
        out
    }

    fn providers(&self, backends: &[BackendInfo]) -> String {
        if backends.is_empty() {
            return format!(
                "  {} No providers configured. Set GEMINI_API_KEY, OPENAI_API_KEY or ANTHROPIC_API_KEY.\n",
                "✖".red().bold()
            );
        }

        let mut out = String::new();
        for backend in backends {
            let marker = if backend.is_default {
                format!(" {}", "(default)".green())
            } else {
                String::new()
            };
            out.push_str(&format!(
                "  {}{}  {}\n",
                backend.id.bold(),
                marker,
                backend.display_name.dimmed()
            ));
            out.push_str(&format!(
                "         {}  {}\n",
                "models:".cyan(),
                backend.supported_models.join(", ")
            ));
        }
        out
    }
}
