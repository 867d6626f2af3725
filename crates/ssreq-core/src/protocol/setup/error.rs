use thiserror::Error;

/// Errors returned when decoding a raw control request.
///
/// # Examples
/// ```
/// use ssreq_core::protocol::setup::SetupError;
///
/// let err = SetupError::TooShort { needed: 8, actual: 3 };
/// assert!(err.to_string().contains("request too short"));
/// ```
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("request too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
}
