//! Recipe error types.

/// Specific error conditions for recipe lookup and validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RecipeErrorKind {
    /// No recipe is stored under the requested content type
    #[display("Unknown content type '{}'", _0)]
    NotFound(String),
    /// A recipe with this name already exists
    #[display("Content type '{}' already exists", _0)]
    AlreadyExists(String),
    /// Two steps in one recipe share the same index
    #[display("Recipe '{}' defines step {} more than once", recipe, step)]
    DuplicateStep {
        /// Recipe name
        recipe: String,
        /// Repeated step index
        step: i64,
    },
    /// Recipe name is empty or whitespace
    #[display("Recipe name cannot be empty")]
    EmptyName,
    /// Step template is empty or whitespace
    #[display("Step {} has an empty prompt", _0)]
    EmptyPrompt(i64),
    /// Override key is not of the form `step_<N>`
    #[display("Invalid step key '{}': expected step_<N>", _0)]
    InvalidStepKey(String),
}

/// Error type for recipe operations.
///
/// # Examples
///
/// ```
/// use quill_error::{RecipeError, RecipeErrorKind};
///
/// let err = RecipeError::new(RecipeErrorKind::NotFound("blog".to_string()));
/// assert!(format!("{}", err).contains("Unknown content type 'blog'"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Recipe Error: {} at line {} in {}", kind, line, file)]
pub struct RecipeError {
    /// The specific error condition
    pub kind: RecipeErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl RecipeError {
    /// Create a new RecipeError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RecipeErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
