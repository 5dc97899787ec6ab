//! Conversions between Quill types and Gemini DTOs.

use crate::gemini::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
};
use quill_core::{GenerationSettings, ResponseFormat};
use quill_error::{GenerationError, GenerationErrorKind};
use quill_interface::{FinishCode, RawResponse};
use serde_json::Value;

/// Finish code reported when the prompt was blocked and no candidate exists.
const PROMPT_BLOCKED_CODE: &str = "SAFETY";

/// MIME type requested from Gemini for a response format.
///
/// Gemini accepts no markdown MIME type; markdown is requested as plain text
/// and rendered downstream.
pub fn response_mime_type(format: ResponseFormat) -> &'static str {
    match format {
        ResponseFormat::PlainText | ResponseFormat::Markdown => "text/plain",
    }
}

/// Builds a single-turn request from a prompt and resolved settings.
pub fn to_request(
    prompt: &str,
    settings: &GenerationSettings,
) -> Result<GenerateContentRequest, GenerationError> {
    let content = Content {
        role: Some("user".to_string()),
        parts: vec![Part {
            text: Some(prompt.to_string()),
        }],
    };

    GenerateContentRequest::builder()
        .contents(vec![content])
        .generation_config(GenerationConfig {
            temperature: settings.temperature,
            top_p: settings.top_p,
            max_output_tokens: settings.max_output_tokens,
            response_mime_type: response_mime_type(settings.response_format).to_string(),
        })
        .build()
        .map_err(|e| {
            GenerationError::new(GenerationErrorKind::ResponseParsing(format!(
                "Failed to build request: {}",
                e
            )))
        })
}

fn finish_code(value: &Value) -> Option<FinishCode> {
    match value {
        Value::String(name) => Some(FinishCode::Named(name.clone())),
        Value::Number(n) => n.as_i64().map(FinishCode::Numeric),
        _ => None,
    }
}

fn candidate_text(candidate: &Candidate) -> Option<String> {
    let parts = &candidate.content.as_ref()?.parts;
    let texts: Vec<&str> = parts.iter().filter_map(|p| p.text.as_deref()).collect();
    if texts.is_empty() {
        None
    } else {
        Some(texts.concat())
    }
}

/// Reduces a response to the first candidate's finish code and text.
///
/// A response without candidates is a blocked prompt when `promptFeedback`
/// carries a block reason, and a parsing error otherwise.
pub fn from_response(response: &GenerateContentResponse) -> Result<RawResponse, GenerationError> {
    match response.candidates.first() {
        Some(candidate) => Ok(RawResponse::new(
            candidate.finish_reason.as_ref().and_then(finish_code),
            candidate_text(candidate),
        )),
        None => {
            let blocked = response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_ref());
            match blocked {
                Some(reason) => {
                    tracing::debug!(block_reason = %reason, "Prompt blocked before generation");
                    Ok(RawResponse::new(Some(FinishCode::from(PROMPT_BLOCKED_CODE)), None))
                }
                None => Err(GenerationError::new(GenerationErrorKind::ResponseParsing(
                    "No candidates in response".to_string(),
                ))),
            }
        }
    }
}
