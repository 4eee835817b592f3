//! Nearest-sample downsampling from a source image to a cell grid.

use super::error::ConvertError;
use super::source::SourceImage;

/// Width/height ratio of a monospace glyph cell.
/// Glyphs are about twice as tall as they are wide.
pub const FONT_ASPECT: f64 = 0.5;

/// Sampling geometry derived from image size and resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleLayout {
    /// Nominal column count, `floor(W * resolution)`.
    pub out_width: u32,
    /// Nominal row count, `floor(H * resolution / FONT_ASPECT)`.
    pub out_height: u32,
    /// Pixels advanced per column, `ceil(W / out_width)`.
    pub width_step: u32,
    /// Pixels advanced per row, `ceil(H / out_height / FONT_ASPECT)`.
    pub height_step: u32,
    /// Columns actually visited: `ceil(W / width_step)`.
    pub columns: u32,
    /// Rows actually visited: `ceil(H / height_step)`.
    pub rows: u32,
}

impl SampleLayout {
    /// Compute the sampling layout for an image.
    ///
    /// # Errors
    /// Returns `ConvertError::DegenerateGrid` when the nominal width or height
    /// rounds down to zero.
    pub fn compute(width: u32, height: u32, resolution: f64) -> Result<Self, ConvertError> {
        if width == 0 || height == 0 {
            return Err(ConvertError::InvalidDimensions { width, height });
        }

        let out_width = (width as f64 * resolution).floor();
        let out_height = (height as f64 * resolution / FONT_ASPECT).floor();
        if out_width < 1.0 || out_height < 1.0 {
            return Err(ConvertError::DegenerateGrid {
                width,
                height,
                resolution,
            });
        }

        let width_step = (width as f64 / out_width).ceil().max(1.0) as u32;
        let height_step = (height as f64 / out_height / FONT_ASPECT).ceil().max(1.0) as u32;

        Ok(Self {
            out_width: out_width as u32,
            out_height: out_height as u32,
            width_step,
            height_step,
            columns: width.div_ceil(width_step),
            rows: height.div_ceil(height_step),
        })
    }
}

/// Downsampled pixel matrix, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleGrid {
    pub columns: u32,
    pub rows: u32,
    pub pixels: Vec<[u8; 3]>,
}

impl SampleGrid {
    /// Iterate over the grid one row at a time.
    pub fn rows(&self) -> impl Iterator<Item = &[[u8; 3]]> {
        self.pixels.chunks(self.columns.max(1) as usize)
    }
}

/// Sample the top-left pixel of every step window.
///
/// Values are read directly, not averaged.
pub fn sample(image: &SourceImage, layout: &SampleLayout) -> SampleGrid {
    let mut pixels = Vec::with_capacity(layout.columns as usize * layout.rows as usize);

    for y in (0..image.height()).step_by(layout.height_step as usize) {
        for x in (0..image.width()).step_by(layout.width_step as usize) {
            pixels.push(image.pixel(x, y));
        }
    }

    SampleGrid {
        columns: layout.columns,
        rows: layout.rows,
        pixels,
    }
}
