//! Synthetic graph generators.
//!
//! - [`rmat`] - recursive-matrix (R-MAT) power-law graphs

mod rmat;

pub use rmat::{RmatParams, rmat};
