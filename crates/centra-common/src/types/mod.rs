//! Core type definitions for Centra.
//!
//! Vertices are addressed by a dense integer range `[0, V)`; [`VertexId`]
//! wraps one position in that range.

mod id;

pub use id::VertexId;
