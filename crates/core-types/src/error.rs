use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Score must be a number")]
    InvalidScore(String),

    #[error("GPA score must be between 0 and 4 (got {0})")]
    ScoreOutOfRange(f64),

    #[error("Invalid student ID")]
    InvalidId(String),
}
