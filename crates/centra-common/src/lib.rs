//! # centra-common
//!
//! Foundation layer for Centra: identifier types and the shared error type.
//!
//! This crate has no internal dependencies and should be kept minimal.
//!
//! ## Modules
//!
//! - [`types`] - Core type definitions ([`VertexId`])
//! - [`utils`] - Utilities (errors)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod types;
pub mod utils;

// Re-export commonly used types at crate root
pub use types::VertexId;
pub use utils::error::{Error, Result};
