//! Classification of a single backend call.

use serde::{Deserialize, Serialize};

/// Closed classification of one generation call.
///
/// Backend finish codes are mapped onto these six members at the backend
/// boundary; nothing downstream sees a raw code.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    /// Normal stop with non-empty text
    Completed,
    /// Normal stop but no text
    EmptyResponse,
    /// Stopped by the safety/content policy
    SafetyBlocked,
    /// Stopped by the recitation/copyright filter
    RecitationBlocked,
    /// Stopped at the output token budget
    TokenLimitExceeded,
    /// Transport or API-level fault
    BackendError,
}

impl Outcome {
    /// True only for `Completed`.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Completed)
    }

    /// True for the content outcomes that are reported as warnings.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Outcome::EmptyResponse
                | Outcome::SafetyBlocked
                | Outcome::RecitationBlocked
                | Outcome::TokenLimitExceeded
        )
    }

    /// True for true faults (network, auth, quota, timeout).
    pub fn is_fault(&self) -> bool {
        matches!(self, Outcome::BackendError)
    }
}
