//! Tests for backend outcome classification.

mod common;

use common::ScriptedBackend;
use quill_core::{GenerationSettings, Outcome};
use quill_error::{GenerationError, GenerationErrorKind};
use quill_interface::{FinishCode, RawResponse};
use quill_recipe::{
    EMPTY_RESPONSE_WARNING, GenerationInvoker, RECITATION_WARNING, SAFETY_WARNING, classify,
};
use std::collections::HashSet;
use strum::IntoEnumIterator;

fn settings() -> GenerationSettings {
    GenerationSettings {
        max_output_tokens: 12000,
        ..GenerationSettings::default()
    }
}

fn raw(code: impl Into<FinishCode>, text: Option<&str>) -> Result<RawResponse, GenerationError> {
    Ok(RawResponse::new(Some(code.into()), text.map(String::from)))
}

#[test]
fn test_stop_with_text_is_completed() {
    let invocation = classify(raw("STOP", Some("Oslo is a city.")), &settings());
    assert_eq!(invocation.outcome, Outcome::Completed);
    assert_eq!(invocation.text, "Oslo is a city.");
}

#[test]
fn test_stop_without_text_is_empty_response() {
    for text in [None, Some(""), Some("  \n\t")] {
        let invocation = classify(raw("STOP", text), &settings());
        assert_eq!(invocation.outcome, Outcome::EmptyResponse);
        assert_eq!(invocation.text, EMPTY_RESPONSE_WARNING);
    }
}

#[test]
fn test_safety_codes() {
    for code in ["SAFETY", "BLOCKLIST", "PROHIBITED_CONTENT", "SPII", "IMAGE_SAFETY"] {
        let invocation = classify(raw(code, Some("partial")), &settings());
        assert_eq!(invocation.outcome, Outcome::SafetyBlocked, "{code}");
        assert_eq!(invocation.text, SAFETY_WARNING);
    }
    for code in [3i64, 6, 7, 8, 10] {
        assert_eq!(
            classify(raw(code, None), &settings()).outcome,
            Outcome::SafetyBlocked
        );
    }
}

#[test]
fn test_recitation_code() {
    let invocation = classify(raw(4i64, Some("partial")), &settings());
    assert_eq!(invocation.outcome, Outcome::RecitationBlocked);
    assert_eq!(invocation.text, RECITATION_WARNING);
}

#[test]
fn test_max_tokens_names_configured_limit() {
    let invocation = classify(raw("MAX_TOKENS", Some("truncated")), &settings());
    assert_eq!(invocation.outcome, Outcome::TokenLimitExceeded);
    assert!(invocation.text.contains("12000"));
}

#[test]
fn test_fault_includes_error_text() {
    let fault = Err(GenerationError::new(GenerationErrorKind::Http(
        "connection refused".to_string(),
    )));
    let invocation = classify(fault, &settings());
    assert_eq!(invocation.outcome, Outcome::BackendError);
    assert!(invocation.text.contains("connection refused"));
    assert!(!invocation.text.contains(" at line "));
}

#[test]
fn test_unknown_codes_are_backend_errors() {
    assert_eq!(classify(raw(5i64, Some("x")), &settings()).outcome, Outcome::BackendError);
    assert_eq!(classify(raw(99i64, Some("x")), &settings()).outcome, Outcome::BackendError);
    assert_eq!(
        classify(raw("MALFORMED_FUNCTION_CALL", Some("x")), &settings()).outcome,
        Outcome::BackendError
    );
}

#[test]
fn test_classification_is_exhaustive() {
    let inputs: Vec<Result<RawResponse, GenerationError>> = vec![
        raw("STOP", Some("text")),
        raw("STOP", None),
        raw("SAFETY", None),
        raw("RECITATION", None),
        raw("MAX_TOKENS", None),
        Err(GenerationError::new(GenerationErrorKind::Timeout(3))),
    ];

    let seen: HashSet<Outcome> = inputs
        .into_iter()
        .map(|input| classify(input, &settings()).outcome)
        .collect();
    let all: HashSet<Outcome> = Outcome::iter().collect();
    assert_eq!(seen, all);

    for outcome in Outcome::iter() {
        let kinds = [outcome.is_success(), outcome.is_warning(), outcome.is_fault()];
        assert_eq!(kinds.iter().filter(|k| **k).count(), 1, "{outcome}");
    }
}

#[tokio::test]
async fn test_invoker_calls_backend_once_with_merged_model() {
    let backend = ScriptedBackend::new();
    let invoker = GenerationInvoker::new(backend.clone());
    let settings = GenerationSettings {
        model: "gemini-2.5-pro".to_string(),
        ..GenerationSettings::default()
    };

    let invocation = invoker.invoke("Hello", &settings).await;

    assert_eq!(invocation.outcome, Outcome::Completed);
    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model, "gemini-2.5-pro");
    assert_eq!(calls[0].prompt, "Hello");
}

#[tokio::test]
async fn test_invoker_does_not_retry_faults() {
    let backend = ScriptedBackend::with_script(vec![Err(GenerationError::new(
        GenerationErrorKind::Http("reset".to_string()),
    ))]);
    let invoker = GenerationInvoker::new(backend.clone());

    let invocation = invoker.invoke("Hello", &GenerationSettings::default()).await;

    assert_eq!(invocation.outcome, Outcome::BackendError);
    assert_eq!(backend.call_count(), 1);
}
