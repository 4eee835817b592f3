//! Conversion error types.

/// Errors that can occur while turning an image into an ASCII frame.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("Resolution {0} is outside the supported range 0.05-0.30")]
    ResolutionOutOfRange(f64),

    #[error("Unknown character set '{0}' (expected standard, detailed, blocks or minimal)")]
    UnknownCharset(String),

    #[error("Image {width}x{height} at resolution {resolution} samples to an empty grid")]
    DegenerateGrid {
        width: u32,
        height: u32,
        resolution: f64,
    },

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}
