//! Vertex identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a vertex in a graph with `V` vertices, always in `[0, V)`.
///
/// Stored as `u32` so adjacency arrays stay compact; graphs are limited to
/// `u32::MAX` vertices.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[repr(transparent)]
#[serde(transparent)]
pub struct VertexId(u32);

impl VertexId {
    /// Creates a vertex id from its raw value.
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw `u32` value.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the id as an index into per-vertex arrays.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Creates a vertex id from a per-vertex array index.
    ///
    /// Callers guarantee `index <= u32::MAX`; graph construction enforces it.
    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

impl From<u32> for VertexId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<VertexId> for u32 {
    fn from(id: VertexId) -> Self {
        id.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
