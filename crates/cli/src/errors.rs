use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("Unsupported input in {0}: expected a record array, an object with a `data` array, or aggregated stats")]
    UnsupportedShape(PathBuf),
    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),
    #[error("Invalid timestamp (expected RFC 3339 or YYYY-MM-DD): {0}")]
    InvalidTimestamp(String),
}
