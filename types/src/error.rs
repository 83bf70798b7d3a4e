//! Errors raised while constructing or converting fundamental types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("inflation multiplier must be non-zero")]
    ZeroMultiplier,

    #[error("arithmetic overflow in fixed-point conversion")]
    Overflow,
}
