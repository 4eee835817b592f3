//! Render error types.

use std::path::PathBuf;

/// Errors that can occur while rasterizing an ASCII frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Nothing to render: the frame has no rows")]
    EmptyFrame,

    #[error("No monospace font found (searched {} locations)", .searched.len())]
    FontNotFound { searched: Vec<PathBuf> },

    #[error("Invalid font data in '{}'", .path.display())]
    InvalidFont { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}
