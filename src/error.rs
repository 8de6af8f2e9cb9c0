//! Error types shared by the codec, the dispatcher and the message surface.

use thiserror::Error;

use crate::field::ValidationFailure;

pub type Result<T, E = SysexError> = std::result::Result<T, E>;

/// Reasons a byte buffer cannot be a System Exclusive message at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedInput {
    #[error("message is too short ({length} bytes)")]
    TooShort { length: usize },

    #[error("message does not begin with the System Exclusive initiator")]
    MissingStart,

    #[error("message does not end with the System Exclusive terminator")]
    MissingEnd,

    /// Segments are numbered from 1.
    #[error("segment {segment} does not begin with the System Exclusive initiator")]
    MissingSegmentStart { segment: usize },

    #[error("segment {segment} is not terminated")]
    UnterminatedSegment { segment: usize },

    #[error("manufacturer id {id:#04x} is not a data byte")]
    InvalidManufacturer { id: u8 },

    #[error("expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("header does not match the requested format")]
    HeaderMismatch,
}

#[derive(Error, Debug)]
pub enum SysexError {
    #[error("malformed message: {0}")]
    Malformed(#[from] MalformedInput),

    /// The buffer is shorter than the layout it is being read as.
    #[error("field \"{field}\" at offset {offset} is outside the {length}-byte buffer")]
    FieldOutOfBounds {
        field: String,
        offset: usize,
        length: usize,
    },

    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error("value for parameter \"{0}\" not found")]
    MissingParameter(String),

    #[error("unknown parameter \"{0}\"")]
    UnknownParameter(String),

    #[error("wrong kind of value for parameter \"{field}\"")]
    WrongValueType { field: String },

    #[error("message type cannot be parsed into parameters")]
    NotParseable,

    #[error("message type does not contain items")]
    NotContainer,

    #[error("item {index} is out of range (item count {count})")]
    ItemOutOfRange { index: usize, count: usize },

    #[error("not supported: {0}")]
    Unsupported(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
