//! Markdown code-fence unwrapping.
//!
//! Recognizes exactly three shapes of backend reply:
//!
//! | Wrapping | Example |
//! |---|---|
//! | [`Wrapping::None`]   | `{"summary": ...}` |
//! | [`Wrapping::Bare`]   | ```` ```\n{...}\n``` ```` |
//! | [`Wrapping::Tagged`] | ```` ```json\n{...}\n``` ```` |
//!
//! Only the outermost fence pair (the first three and last three
//! backticks) is removed. Fences inside the payload, such as code examples
//! embedded in JSON strings, are left alone.

const FENCE: &str = "```";
const JSON_TAG: &str = "json";

/// How a reply was wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrapping {
    /// No recognized wrapper; the text is used as-is.
    None,
    /// Fence with no info string.
    Bare,
    /// Fence tagged `json` (any case).
    Tagged,
}

/// Classify `text` and return its unwrapped body.
///
/// `text` is expected to be trimmed already. A leading fence without a
/// matching trailing fence, or a fence tagged with anything other than
/// `json`, yields [`Wrapping::None`] and the original text.
pub fn unwrap(text: &str) -> (Wrapping, &str) {
    let Some(body) = text
        .strip_prefix(FENCE)
        .and_then(|rest| rest.strip_suffix(FENCE))
    else {
        return (Wrapping::None, text);
    };

    let tag_len = body
        .find(|c: char| c.is_whitespace() || c == '{' || c == '[')
        .unwrap_or(body.len());
    let tag = &body[..tag_len];

    if tag.is_empty() {
        (Wrapping::Bare, body.trim())
    } else if tag.eq_ignore_ascii_case(JSON_TAG) {
        (Wrapping::Tagged, body[tag_len..].trim())
    } else {
        (Wrapping::None, text)
    }
}
