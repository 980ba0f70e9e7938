//! Shared building blocks: error taxonomy and geometry/color primitives.

pub mod core;
pub mod error;
