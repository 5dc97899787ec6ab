//! Generation backend integrations for Quill.
//!
//! Each backend implements [`quill_interface::GenerationBackend`] and is
//! gated behind a cargo feature:
//!
//! - `gemini`: Google Gemini over REST

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::GeminiClient;

/// Default Gemini REST endpoint.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
