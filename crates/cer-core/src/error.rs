// crates/cer-core/src/error.rs

use thiserror::Error;

use crate::codes::Domain;

pub type Result<T> = std::result::Result<T, CerError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CerError {
    /// Malformed bitstream: a codeword was cut short or is not well formed.
    #[error("parse error: {0}")]
    Parse(String),

    /// A value was required but the stream ended cleanly on a word boundary.
    #[error("stream exhausted: {0}")]
    Exhausted(String),

    #[error("value {value} is outside the {domain:?} domain of {codec}")]
    Domain {
        value: i128,
        domain: Domain,
        codec: &'static str,
    },

    /// A CER safety invariant was violated.
    #[error("integrity error: {0}")]
    Integrity(String),

    /// Not a failure: `clamp` was asked to snap a value already in range.
    #[error("value already inside the unknown interval")]
    NoChange,

    #[error("validation error: {0}")]
    Validation(String),
}

impl CerError {
    pub(crate) fn parse(msg: impl Into<String>) -> Self {
        CerError::Parse(msg.into())
    }

    pub(crate) fn integrity(msg: impl Into<String>) -> Self {
        CerError::Integrity(msg.into())
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        CerError::Validation(msg.into())
    }
}
