//! WDP container handling.
//!
//! A WDP archive is a ZIP file with three kinds of entries:
//!
//! - `protocolVersion`: UTF-8 text, `1.0.0` (whitespace trimmed)
//! - `totalImages`: 4 bytes, big-endian `i32` frame count `N`
//! - `image0.jpg` .. `image{N-1}.jpg`: JPEG frames, zero-based and contiguous
//!
//! Reading validates the header eagerly and decodes frames lazily, one at a time, in
//! index order.

/// Named-entry lookup over unpacked archives.
pub mod archive;
/// Bitmap decoding.
pub mod decode;
/// Archive retrieval.
pub mod fetch;
/// Header validation and the sequential frame stream.
pub mod reader;
/// Fixed-size frame slots.
pub mod sequence;
/// Archive writing and image packing.
pub mod writer;
