//! Scrub-input mapping.

pub mod index;
