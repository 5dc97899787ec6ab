//! Google Gemini backend over the `generateContent` REST API.
//!
//! Only `generateContent` with text parts and a generation config is used,
//! so the wire types are written out here over `reqwest` rather than
//! pulling in `gemini-rust` and its multimodal and streaming surface.

mod client;
mod conversions;
mod dto;

pub use client::GeminiClient;
pub use conversions::{from_response, response_mime_type, to_request};
pub use dto::{
    Candidate, Content, GenerateContentRequest, GenerateContentRequestBuilder,
    GenerateContentResponse, GenerationConfig, Part, PromptFeedback,
};
