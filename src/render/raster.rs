//! Glyph rasterization backends.

use std::path::{Path, PathBuf};

use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};

use super::error::RenderError;

/// Monospace fonts probed when no font path is configured.
pub const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeMono.ttf",
    "/usr/share/fonts/gnu-free/FreeMono.otf",
    "/System/Library/Fonts/Supplemental/Courier New.ttf",
    "/Library/Fonts/Courier New.ttf",
    "C:\\Windows\\Fonts\\consola.ttf",
];

/// Something that can paint a single glyph onto a canvas.
pub trait GlyphRaster {
    /// Paint `ch` with its cell's top-left corner at `(x, y)`.
    fn draw_glyph(&self, canvas: &mut RgbaImage, ch: char, x: f32, y: f32, color: [u8; 3]);
}

/// Glyph rasterizer backed by a TrueType/OpenType font.
pub struct FontRaster {
    font: FontVec,
    scale: PxScale,
}

impl FontRaster {
    /// Build a rasterizer from raw font bytes at an em size of `px` pixels.
    pub fn from_bytes(data: Vec<u8>, px: f32, origin: &Path) -> Result<Self, RenderError> {
        let font = FontVec::try_from_vec(data).map_err(|_| RenderError::InvalidFont {
            path: origin.to_path_buf(),
        })?;
        let scale = em_scale(&font, px);
        Ok(Self { font, scale })
    }

    /// Load a font from `path`, or from the first existing entry of
    /// [`FONT_CANDIDATES`] when no path is given.
    pub fn load(path: Option<&Path>, px: f32) -> Result<Self, RenderError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => find_system_font()?,
        };
        let data = std::fs::read(&path)?;
        log::debug!("Loaded glyph font from {}", path.display());
        Self::from_bytes(data, px, &path)
    }

    pub fn scale(&self) -> PxScale {
        self.scale
    }
}

impl GlyphRaster for FontRaster {
    fn draw_glyph(&self, canvas: &mut RgbaImage, ch: char, x: f32, y: f32, color: [u8; 3]) {
        if ch.is_whitespace() {
            return;
        }

        // Cell anchor is the top of the line box, so offset by the ascent
        let ascent = self.font.as_scaled(self.scale).ascent();
        let glyph = self
            .font
            .glyph_id(ch)
            .with_scale_and_position(self.scale, point(x, y + ascent));

        let Some(outlined) = self.font.outline_glyph(glyph) else {
            return;
        };
        let bounds = outlined.px_bounds();
        let (width, height) = canvas.dimensions();

        outlined.draw(|gx, gy, coverage| {
            let px = bounds.min.x as i32 + gx as i32;
            let py = bounds.min.y as i32 + gy as i32;
            if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height {
                return;
            }
            blend(canvas.get_pixel_mut(px as u32, py as u32), color, coverage);
        });
    }
}

/// Scale such that the font's em square is `px` pixels tall, matching the
/// CSS `font: <px>px monospace` convention.
fn em_scale(font: &FontVec, px: f32) -> PxScale {
    match font.units_per_em() {
        Some(upem) if upem > 0.0 => PxScale::from(px * font.height_unscaled() / upem),
        _ => PxScale::from(px),
    }
}

/// Return the first font candidate that exists on disk.
pub fn find_system_font() -> Result<PathBuf, RenderError> {
    FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
        .ok_or_else(|| RenderError::FontNotFound {
            searched: FONT_CANDIDATES.iter().map(PathBuf::from).collect(),
        })
}

/// Source-over composite of `color` at `coverage` onto `dst`.
pub fn blend(dst: &mut Rgba<u8>, color: [u8; 3], coverage: f32) {
    let src_a = coverage.clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }
    let dst_a = dst.0[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    for (i, &c) in color.iter().enumerate() {
        let src_c = c as f32;
        let dst_c = dst.0[i] as f32;
        let out_c = (src_c * src_a + dst_c * dst_a * (1.0 - src_a)) / out_a;
        dst.0[i] = out_c.round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}
