//! Bitmap rendering of ASCII frames.
//!
//! Each glyph cell is painted at its top-left anchor on a transparent canvas,
//! then the canvas is encoded as PNG. Glyph painting goes through the
//! [`GlyphRaster`] trait so the font backend can be swapped.

mod error;
mod raster;

pub use error::RenderError;
pub use raster::{blend, find_system_font, FontRaster, GlyphRaster, FONT_CANDIDATES};

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::ascii::AsciiFrame;

/// Base font size in pixels.
pub const FONT_SIZE: f32 = 8.0;

/// Approximate advance of a monospace glyph relative to its font size.
pub const CHAR_WIDTH_RATIO: f32 = 0.6;

/// Pixel size of one glyph cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub width: f32,
    pub height: f32,
}

impl CellMetrics {
    /// Metrics for a font size: line height equals the size, width is
    /// `size * CHAR_WIDTH_RATIO`.
    pub fn for_font_size(size: f32) -> Self {
        Self {
            width: size * CHAR_WIDTH_RATIO,
            height: size,
        }
    }
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self::for_font_size(FONT_SIZE)
    }
}

/// Canvas dimensions for a frame, truncated to whole pixels.
///
/// Grayscale frames are sized by their longest row; color frames by the
/// first row's column count.
pub fn canvas_size(frame: &AsciiFrame, metrics: CellMetrics) -> (u32, u32) {
    let columns = if frame.is_grayscale() {
        frame.max_row_len()
    } else {
        frame.columns()
    };
    let width = (columns as f32 * metrics.width) as u32;
    let height = (frame.row_count() as f32 * metrics.height) as u32;
    (width, height)
}

/// Rasterize a frame onto a transparent canvas.
///
/// # Errors
/// Returns `RenderError::EmptyFrame` for a frame without rows or whose
/// canvas would have a zero dimension.
pub fn render_bitmap(
    frame: &AsciiFrame,
    raster: &dyn GlyphRaster,
    metrics: CellMetrics,
) -> Result<RgbaImage, RenderError> {
    if frame.is_empty() {
        return Err(RenderError::EmptyFrame);
    }
    let (width, height) = canvas_size(frame, metrics);
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyFrame);
    }

    let mut canvas = RgbaImage::new(width, height);
    for (row_idx, row) in frame.rows().iter().enumerate() {
        let y = row_idx as f32 * metrics.height;
        for (col_idx, cell) in row.iter().enumerate() {
            let x = col_idx as f32 * metrics.width;
            raster.draw_glyph(&mut canvas, cell.ch, x, y, cell.color);
        }
    }
    Ok(canvas)
}

/// Encode a canvas as PNG bytes.
pub fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Rasterize and encode in one step.
pub fn render_png(
    frame: &AsciiFrame,
    raster: &dyn GlyphRaster,
    metrics: CellMetrics,
) -> Result<Vec<u8>, RenderError> {
    let canvas = render_bitmap(frame, raster, metrics)?;
    encode_png(&canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::{GlyphCell, FOREGROUND};

    /// Fills the whole cell for every non-space glyph.
    struct BoxRaster;

    impl GlyphRaster for BoxRaster {
        fn draw_glyph(&self, canvas: &mut RgbaImage, ch: char, x: f32, y: f32, color: [u8; 3]) {
            if ch == ' ' {
                return;
            }
            let (w, h) = canvas.dimensions();
            let x0 = x as u32;
            let y0 = y as u32;
            for py in y0..(y0 + 8).min(h) {
                for px in x0..(x0 + 4).min(w) {
                    blend(canvas.get_pixel_mut(px, py), color, 1.0);
                }
            }
        }
    }

    fn row(s: &str, color: [u8; 3]) -> Vec<GlyphCell> {
        s.chars().map(|ch| GlyphCell::new(ch, color)).collect()
    }

    #[test]
    fn test_default_metrics() {
        let m = CellMetrics::default();
        assert_eq!(m.height, 8.0);
        assert!((m.width - 4.8).abs() < 1e-6);
    }

    #[test]
    fn test_canvas_size_grayscale_uses_longest_row() {
        let frame = AsciiFrame::new(vec![row("ab", FOREGROUND), row("abcde", FOREGROUND)], true);
        // 5 * 4.8 = 24, 2 * 8 = 16
        assert_eq!(canvas_size(&frame, CellMetrics::default()), (24, 16));
    }

    #[test]
    fn test_canvas_size_color_uses_first_row() {
        let frame = AsciiFrame::new(
            vec![row("ab", [1, 2, 3]), row("abcde", [1, 2, 3])],
            false,
        );
        // 2 * 4.8 = 9.6 -> 9
        assert_eq!(canvas_size(&frame, CellMetrics::default()), (9, 16));
    }

    #[test]
    fn test_render_empty_frame_is_rejected() {
        let frame = AsciiFrame::new(Vec::new(), true);
        let result = render_bitmap(&frame, &BoxRaster, CellMetrics::default());
        assert!(matches!(result, Err(RenderError::EmptyFrame)));
    }

    #[test]
    fn test_render_rows_without_columns_is_rejected() {
        let frame = AsciiFrame::new(vec![Vec::new()], false);
        let result = render_bitmap(&frame, &BoxRaster, CellMetrics::default());
        assert!(matches!(result, Err(RenderError::EmptyFrame)));
    }

    #[test]
    fn test_render_background_is_transparent() {
        let frame = AsciiFrame::new(vec![row("  ", FOREGROUND)], true);
        let canvas = render_bitmap(&frame, &BoxRaster, CellMetrics::default()).unwrap();
        assert!(canvas.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_render_paints_cell_color() {
        let frame = AsciiFrame::new(vec![row(" @", [40, 200, 90])], false);
        let canvas = render_bitmap(&frame, &BoxRaster, CellMetrics::default()).unwrap();
        // Second cell starts at x = 4.8 -> 4
        assert_eq!(canvas.get_pixel(5, 3).0, [40, 200, 90, 255]);
        assert_eq!(canvas.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn test_uneven_color_frame_clips_to_first_row() {
        let frame = AsciiFrame::new(
            vec![row("@", [255, 0, 0]), row("@@@", [255, 0, 0])],
            false,
        );
        let canvas = render_bitmap(&frame, &BoxRaster, CellMetrics::default()).unwrap();
        assert_eq!(canvas.dimensions(), (4, 16));
    }

    #[test]
    fn test_render_png_has_signature() {
        let frame = AsciiFrame::new(vec![row("#", FOREGROUND)], true);
        let png = render_png(&frame, &BoxRaster, CellMetrics::default()).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
