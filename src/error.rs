use thiserror::Error;

/// Fatal failures of the reconciliation pipeline. Both variants surface
/// unchanged to the caller; there is no internal retry.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The completion output carried no parseable extraction payload:
    /// no JSON object, invalid JSON, or a missing `lineItems` array.
    #[error("malformed extraction: {0}")]
    MalformedExtraction(String),

    /// The completion endpoint could not be reached or rejected the call.
    #[error("completion transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
