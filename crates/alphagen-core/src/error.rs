//! Error types for vocabulary construction, action decoding and
//! expression building.

use thiserror::Error;

use crate::token::{FeatureType, Operator};

/// Errors raised by the action codec.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    /// Action id outside `[0, size)`. Indicates a policy bug.
    #[error("action {action} out of range [0, {size})")]
    OutOfRange { action: i64, size: usize },

    /// Token is not part of the vocabulary.
    #[error("token {0} is not in the vocabulary")]
    UnknownToken(String),
}

/// Errors raised when a vocabulary table breaks the bijection.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VocabError {
    #[error("duplicate operator {0}")]
    DuplicateOperator(Operator),

    #[error("duplicate feature {0}")]
    DuplicateFeature(FeatureType),

    #[error("duplicate delta time {0}")]
    DuplicateDeltaTime(u32),

    #[error("duplicate constant {0}")]
    DuplicateConstant(f64),

    /// NaN or infinite constant; it could never be encoded back.
    #[error("constant {0} is not finite")]
    NonFiniteConstant(f64),

    #[error("delta time must be non-zero")]
    ZeroDeltaTime,
}

/// Errors raised by the RPN expression builder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Token not valid in the current stack state.
    #[error("unexpected token {0} in current state")]
    UnexpectedToken(String),

    /// Stack does not hold exactly one featured expression.
    #[error("expression incomplete ({0} stack items)")]
    Incomplete(usize),
}
