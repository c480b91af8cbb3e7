use crate::formats::Codec;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("JPEG encoding error: {0}")]
    JpegEncoding(String),

    #[error("WebP encoding error: {0}")]
    WebPEncoding(String),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    InvalidQuality(u8),

    #[error("Invalid quality range: minimum {0} is above maximum {1}")]
    InvalidQualityRange(u8, u8),

    #[error("Invalid target size: {0} KB. Must be greater than 0")]
    InvalidTargetSize(u64),

    #[error("Invalid image dimensions: {0}x{1}. Maximum allowed: {2}x{2}")]
    InvalidDimensions(u32, u32, u32),

    #[error("File too large: {0} bytes. Maximum allowed: {1} bytes")]
    FileTooLarge(u64, u64),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Invalid file name: {0}")]
    InvalidFileName(PathBuf),

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),

    #[error("{0} output cannot be produced by the quality search")]
    CodecContract(Codec),
}

impl CompressionError {
    /// Errors that indicate a bug rather than a bad input file. The batch
    /// driver stops on these instead of moving to the next file.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CompressionError::CodecContract(_))
    }
}

pub type Result<T> = std::result::Result<T, CompressionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_codec_contract_is_fatal() {
        assert!(CompressionError::CodecContract(Codec::Png).is_fatal());
        assert!(!CompressionError::InvalidQuality(0).is_fatal());
        assert!(!CompressionError::FileNotFound(PathBuf::from("a.png")).is_fatal());
    }

    #[test]
    fn test_codec_contract_message() {
        let err = CompressionError::CodecContract(Codec::Png);
        assert_eq!(
            err.to_string(),
            "PNG output cannot be produced by the quality search"
        );
    }
}
