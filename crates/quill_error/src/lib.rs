//! Error types for the Quill content recipe engine.
//!
//! Every error carries the source location where it was created. Content
//! outcomes (safety blocks, token limits, backend faults during a step) are
//! not errors; they travel as ordinary step output. Only recipe lookup,
//! validation, configuration and persistence problems use this crate.

mod config;
mod database;
mod generation;
mod json;
mod recipe;

pub use config::ConfigError;
pub use database::{DatabaseError, DatabaseErrorKind};
pub use generation::{GenerationError, GenerationErrorKind};
pub use json::JsonError;
pub use recipe::{RecipeError, RecipeErrorKind};

/// Crate-level error variants.
#[derive(Debug, derive_more::From)]
pub enum QuillErrorKind {
    /// Recipe lookup or validation error
    Recipe(RecipeError),
    /// Generation backend fault
    Generation(GenerationError),
    /// Persistence error
    Database(DatabaseError),
    /// Configuration error
    Config(ConfigError),
    /// JSON serialization/deserialization error
    Json(JsonError),
}

impl std::fmt::Display for QuillErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuillErrorKind::Recipe(e) => write!(f, "{}", e),
            QuillErrorKind::Generation(e) => write!(f, "{}", e),
            QuillErrorKind::Database(e) => write!(f, "{}", e),
            QuillErrorKind::Config(e) => write!(f, "{}", e),
            QuillErrorKind::Json(e) => write!(f, "{}", e),
        }
    }
}

/// Quill error with kind discrimination.
///
/// # Examples
///
/// ```
/// use quill_error::{QuillError, RecipeError, RecipeErrorKind};
///
/// let err: QuillError = RecipeError::new(RecipeErrorKind::NotFound("blog".into())).into();
/// assert!(err.is_not_found());
/// ```
#[derive(Debug)]
pub struct QuillError(Box<QuillErrorKind>);

impl QuillError {
    /// Create a new error from a kind.
    pub fn new(kind: QuillErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &QuillErrorKind {
        &self.0
    }

    /// True when the error is the "unknown content type" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind(),
            QuillErrorKind::Recipe(RecipeError {
                kind: RecipeErrorKind::NotFound(_),
                ..
            })
        )
    }
}

impl std::fmt::Display for QuillError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Quill Error: {}", self.0)
    }
}

impl std::error::Error for QuillError {}

// Generic From implementation for any type that converts to QuillErrorKind
impl<T> From<T> for QuillError
where
    T: Into<QuillErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Quill operations.
pub type QuillResult<T> = std::result::Result<T, QuillError>;
