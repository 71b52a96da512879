//! Error types for wire parsing.

/// Errors that can occur while reading a wire envelope.
///
/// Only a body that is not a JSON object is an error. Missing or
/// mistyped fields inside an envelope object are coerced, never rejected.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// The message body is not a JSON envelope.
    #[error("malformed event envelope: {source}")]
    MalformedEnvelope {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The message body is valid JSON but not an object.
    #[error("event envelope must be a JSON object, found {found}")]
    NotAnObject {
        /// JSON type of the body.
        found: &'static str,
    },
}
