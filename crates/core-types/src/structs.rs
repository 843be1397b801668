use crate::error::CoreError;
use crate::validation::parse_score;
use sqlx::FromRow;

/// A single row of the `mahasiswa` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Student {
    /// Assigned by the database on insert; never changes afterwards.
    pub id: i32,
    /// The national student number. Unique across all records.
    pub nim: String,
    #[sqlx(rename = "nama")]
    pub name: String,
    /// Grade point average in the closed range [0, 4].
    #[sqlx(rename = "nilai")]
    pub score: f64,
}

/// The user-editable fields of a student, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentInput {
    pub nim: String,
    pub name: String,
    pub score: f64,
}

impl StudentInput {
    /// Builds an input from raw form text, validating the score.
    pub fn parse(name: &str, nim: &str, score: &str) -> Result<Self, CoreError> {
        Ok(Self {
            nim: nim.to_string(),
            name: name.to_string(),
            score: parse_score(score)?,
        })
    }

    /// Combines this input with an identifier, e.g. to echo it back on a form.
    pub fn with_id(self, id: i32) -> Student {
        Student {
            id,
            nim: self.nim,
            name: self.name,
            score: self.score,
        }
    }
}
