use super::error::TraceSourceError;
use crate::source::TraceStep;

/// Decode one trace line; `line` is 1-based and only used for errors.
///
/// Blank lines yield `None`.
///
/// # Examples
/// The module is internal, so the example is marked as text.
/// ```text
/// let step = read_step_line(r#"{"rx_good": true}"#, 1)?.unwrap();
/// assert!(step.rx_good);
/// ```
pub fn read_step_line(text: &str, line: usize) -> Result<Option<TraceStep>, TraceSourceError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text)
        .map(Some)
        .map_err(|source| TraceSourceError::Json { line, source })
}
