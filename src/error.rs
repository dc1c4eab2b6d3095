//! Structured error types for the editing core.
//!
//! The propagation policy mirrors the severity of each failure:
//! precondition failures ([`EditorError::Validation`],
//! [`EditorError::Parse`]) abort the whole operation before any visible
//! state changes; per-element failures ([`EditorError::ShapeLoad`]) are
//! logged and the element is skipped without touching its siblings;
//! [`EditorError::MissingTarget`] leaves the owning component inert.
//! Invalid physical measures are never errors at all — conversions degrade
//! to pass-through values (see [`crate::measure`]).

use thiserror::Error;

/// The unified error type returned by the public API.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The template failed the shape precondition (missing `props`,
    /// `measure` or `pages`). Rendering aborts before mutating anything.
    #[error("invalid template: {0}")]
    Validation(String),

    /// A referenced target (a page, a scene node) is not part of the
    /// currently rendered document.
    #[error("missing target: {0}")]
    MissingTarget(String),

    /// A vector shape's source markup could not be fetched or parsed.
    /// Non-fatal: the shape is omitted, the rest of the page renders.
    #[error("unable to load shape source '{src}': {reason}")]
    ShapeLoad { src: String, reason: String },

    /// Template JSON failed to parse.
    #[error("failed to parse template: {source}\n  hint: {hint}")]
    Parse {
        source: serde_json::Error,
        hint: String,
    },
}

impl From<serde_json::Error> for EditorError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "check for trailing commas, missing quotes, or unescaped characters".to_string()
            }
            serde_json::error::Category::Data => {
                "the JSON is valid but does not match the template schema; check field names and types"
                    .to_string()
            }
            serde_json::error::Category::Eof => {
                "unexpected end of input — is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => "the input stream could not be read".to_string(),
        };
        EditorError::Parse { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_carries_hint() {
        let err: EditorError = serde_json::from_str::<serde_json::Value>("{ nope")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.contains("hint:"), "{msg}");
    }

    #[test]
    fn shape_load_display() {
        let err = EditorError::ShapeLoad {
            src: "shapes/star.svg".into(),
            reason: "404".into(),
        };
        assert!(err.to_string().contains("shapes/star.svg"));
    }
}
