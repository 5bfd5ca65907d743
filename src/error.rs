//! Error type shared by the row buffers, the pixel accessor and the fill engine.

use std::collections::TryReserveError;

use crate::pixel_access::PixelFormatTag;

pub type FillResult<T> = Result<T, FillError>;

#[derive(thiserror::Error, Debug)]
pub enum FillError {
    /// The buffer's format tag does not match the rows it hands out.
    #[error("unsupported pixel format {format:?}: {reason}")]
    UnsupportedFormat {
        format: PixelFormatTag,
        reason: String,
    },

    /// Growing the segment arena failed.
    #[error("segment arena allocation failed: {0}")]
    Alloc(#[from] TryReserveError),

    #[error("invalid buffer layout: {0}")]
    InvalidLayout(String),
}

impl FillError {
    pub fn unsupported_format(format: PixelFormatTag, reason: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format,
            reason: reason.into(),
        }
    }

    pub fn invalid_layout(msg: impl Into<String>) -> Self {
        Self::InvalidLayout(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(FillError::unsupported_format(PixelFormatTag::Gray16, "x")
            .to_string()
            .contains("unsupported pixel format Gray16"));
        assert!(FillError::invalid_layout("x")
            .to_string()
            .contains("invalid buffer layout:"));
    }

    #[test]
    fn alloc_wraps_try_reserve_error() {
        let mut v: Vec<u64> = Vec::new();
        let err = v.try_reserve(usize::MAX).unwrap_err();
        let err = FillError::from(err);
        assert!(err.to_string().starts_with("segment arena allocation failed"));
    }
}
