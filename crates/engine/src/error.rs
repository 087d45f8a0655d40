//! The module contains the errors the engine can return.
//!
//! - [`InvalidId`] when a budget, account or category id is not a UUID.
//! - [`MissingCategory`] when the individual share lacks a shared category.
//!
//!  [`InvalidId`]: EngineError::InvalidId
//!  [`MissingCategory`]: EngineError::MissingCategory
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid id: \"{0}\"")]
    InvalidId(String),
    #[error("\"{0}\" has no individual share")]
    MissingCategory(String),
}
