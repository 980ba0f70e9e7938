use std::fmt;

/// Convenience result type used across the crate.
pub type WdpResult<T> = Result<T, WdpError>;

/// Top-level error taxonomy for loading and viewing WDP archives.
#[derive(thiserror::Error, Debug)]
pub enum WdpError {
    /// The archive bytes could not be retrieved.
    #[error("fetch error: failed to load '{location}'")]
    Fetch {
        /// Location handed to the fetcher.
        location: String,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// The archive declares a protocol revision this reader does not speak.
    #[error("protocol version mismatch: expected {expected}, got {found}")]
    VersionMismatch {
        /// Supported protocol version.
        expected: String,
        /// Trimmed value found in the archive.
        found: String,
    },

    /// The header entries are missing or have the wrong shape.
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// The bytes are not a readable archive.
    #[error("archive error: {0}")]
    Archive(String),

    /// Invalid caller-provided input (options, pack parameters, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// Surface or rasterization failure.
    #[error("render error: {0}")]
    Render(String),

    /// The receiving viewer was dropped.
    #[error("input subscription closed")]
    Unsubscribed,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WdpError {
    /// Build a [`WdpError::VersionMismatch`] against the supported version.
    pub fn version_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::VersionMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Build a [`WdpError::MalformedHeader`] value.
    pub fn malformed_header(msg: impl Into<String>) -> Self {
        Self::MalformedHeader(msg.into())
    }

    /// Build a [`WdpError::Archive`] value.
    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    /// Build a [`WdpError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WdpError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

/// Recoverable, per-frame problem reported while decoding a sequence.
///
/// A warning leaves its slot empty; the declared frame count is unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameWarning {
    /// `image{index}.jpg` is not present in the archive.
    MissingFrame {
        /// Zero-based frame index.
        index: u32,
    },
    /// No `image{i}.jpg` entry exists for any `i` in `start..end`.
    ///
    /// Reported once per run of absent entries, when the archive lists its entries.
    MissingFrames {
        /// First missing index.
        start: u32,
        /// One past the last missing index.
        end: u32,
    },
    /// The entry exists but could not be read or decoded.
    DecodeFailure {
        /// Zero-based frame index.
        index: u32,
        /// Human-readable cause.
        reason: String,
    },
}

impl FrameWarning {
    /// Index of the affected slot, or the first one of a range.
    pub fn index(&self) -> u32 {
        match self {
            Self::MissingFrame { index } | Self::DecodeFailure { index, .. } => *index,
            Self::MissingFrames { start, .. } => *start,
        }
    }

    /// One past the last slot this warning covers.
    pub fn end(&self) -> u32 {
        match self {
            Self::MissingFrames { end, .. } => *end,
            _ => self.index().saturating_add(1),
        }
    }
}

impl fmt::Display for FrameWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFrame { index } => {
                write!(f, "frame {index}: entry image{index}.jpg not found")
            }
            Self::MissingFrames { start, end } => {
                write!(f, "frames {start}..{end}: entries not found")
            }
            Self::DecodeFailure { index, reason } => {
                write!(f, "frame {index}: decode failed: {reason}")
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
