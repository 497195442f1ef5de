//! Core types and utilities for mcfrontier.

pub mod error;
pub mod types;

pub use error::{FrontierError, Result};
pub use types::*;
