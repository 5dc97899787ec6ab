//! Generation backend error types.

/// Fault conditions raised by a text-generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GenerationErrorKind {
    /// API key not found in environment
    #[display("{} environment variable not set", _0)]
    MissingApiKey(String),
    /// Failed to build the HTTP client
    #[display("Failed to create client: {}", _0)]
    ClientCreation(String),
    /// Transport-level failure
    #[display("HTTP error: {}", _0)]
    Http(String),
    /// Backend answered with a non-success status
    #[display("API error (status {}): {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Error body returned by the backend
        message: String,
    },
    /// Response body could not be decoded
    #[display("Response parsing failed: {}", _0)]
    ResponseParsing(String),
    /// Call exceeded the configured timeout
    #[display("Backend call timed out after {} seconds", _0)]
    Timeout(u64),
}

/// Generation backend error with source location tracking.
///
/// # Examples
///
/// ```
/// use quill_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::MissingApiKey(
///     "GEMINI_API_KEY".to_string(),
/// ));
/// assert!(format!("{}", err).contains("GEMINI_API_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
