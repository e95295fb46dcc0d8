use thiserror::Error;

/// A queue message body or a stored record that does not match its schema.
/// Repeating the decode cannot succeed, so callers never retry on it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed body: {0}")]
    Malformed(String),

    #[error("missing required field {0}")]
    MissingField(&'static str),

    #[error("field {0} has the wrong type")]
    WrongType(&'static str),

    #[error("field {field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },
}
