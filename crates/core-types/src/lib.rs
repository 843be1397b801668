pub mod enums;
pub mod error;
pub mod structs;
pub mod validation;

// Re-export the core types to provide a clean public API.
pub use enums::{SortColumn, SortOrder};
pub use error::CoreError;
pub use structs::{Student, StudentInput};
pub use validation::{parse_id, parse_min_score, parse_score, MAX_SCORE, MIN_SCORE};
