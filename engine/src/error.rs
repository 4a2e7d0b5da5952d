//! Typed boundary errors. The matcher and book never produce these —
//! they are raised purely by `submit`'s precondition checks, before any
//! state is touched.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SubmitError {
    #[error("quantity must be greater than zero")]
    NonPositiveQuantity,
    #[error("price must be a positive, finite number")]
    InvalidPrice,
    #[error("symbol must not be empty")]
    EmptySymbol,
}
