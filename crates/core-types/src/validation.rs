//! Parsing of the handful of numeric fields that arrive as request text.

use crate::error::CoreError;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 4.0;

/// Parses a GPA score and checks it lies in `[MIN_SCORE, MAX_SCORE]`.
pub fn parse_score(text: &str) -> Result<f64, CoreError> {
    let score: f64 = text
        .trim()
        .parse()
        .map_err(|_| CoreError::InvalidScore(text.to_string()))?;

    // "NaN" and "inf" parse successfully but are not scores.
    if !score.is_finite() {
        return Err(CoreError::InvalidScore(text.to_string()));
    }
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(CoreError::ScoreOutOfRange(score));
    }
    Ok(score)
}

/// Parses the optional `min_nilai` search filter. Blank means "no filter".
///
/// Unlike [`parse_score`] there is no range check: a threshold outside the
/// score domain is a valid (if unproductive) search.
pub fn parse_min_score(text: &str) -> Result<Option<f64>, CoreError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if !value.is_nan() => Ok(Some(value)),
        _ => Err(CoreError::InvalidScore(text.to_string())),
    }
}

/// Parses a student identifier from a path or form field.
pub fn parse_id(text: &str) -> Result<i32, CoreError> {
    text.trim()
        .parse()
        .map_err(|_| CoreError::InvalidId(text.to_string()))
}
