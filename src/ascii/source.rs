//! Decoded source images.

use image::DynamicImage;

use super::error::ConvertError;

/// An immutable RGB pixel grid held for the duration of one conversion.
///
/// Pixels are stored row-major, 3 bytes per pixel (R, G, B).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl SourceImage {
    /// Build an image from a raw RGB buffer.
    ///
    /// # Errors
    /// Returns `ConvertError::InvalidDimensions` when either side is zero and
    /// `ConvertError::BufferSizeMismatch` when the buffer length does not
    /// equal `width * height * 3`.
    pub fn from_rgb(data: Vec<u8>, width: u32, height: u32) -> Result<Self, ConvertError> {
        if width == 0 || height == 0 {
            return Err(ConvertError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(ConvertError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Flatten a decoded image to RGB8. Alpha is dropped.
    pub fn from_dynamic(image: &DynamicImage) -> Result<Self, ConvertError> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        Self::from_rgb(rgb.into_raw(), width, height)
    }

    /// Decode an encoded image (PNG, JPEG, WebP, GIF, BMP).
    pub fn decode(bytes: &[u8]) -> Result<Self, ConvertError> {
        let image = image::load_from_memory(bytes)?;
        Self::from_dynamic(&image)
    }

    /// A single-color image, handy for previews and tests.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Result<Self, ConvertError> {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self::from_rgb(data, width, height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGB value at `(x, y)`. Caller must stay within bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    #[test]
    fn test_from_rgb_rejects_zero_dimensions() {
        let result = SourceImage::from_rgb(Vec::new(), 0, 4);
        assert!(matches!(
            result,
            Err(ConvertError::InvalidDimensions { width: 0, height: 4 })
        ));
    }

    #[test]
    fn test_from_rgb_rejects_short_buffer() {
        let result = SourceImage::from_rgb(vec![0; 5], 2, 1);
        assert!(matches!(
            result,
            Err(ConvertError::BufferSizeMismatch { expected: 6, actual: 5 })
        ));
    }

    #[test]
    fn test_pixel_indexing_is_row_major() {
        let data = vec![
            1, 2, 3, 4, 5, 6, //
            7, 8, 9, 10, 11, 12,
        ];
        let image = SourceImage::from_rgb(data, 2, 2).unwrap();
        assert_eq!(image.pixel(1, 0), [4, 5, 6]);
        assert_eq!(image.pixel(0, 1), [7, 8, 9]);
    }

    #[test]
    fn test_decode_png_drops_alpha() {
        let mut rgba = RgbaImage::new(3, 2);
        for p in rgba.pixels_mut() {
            *p = Rgba([200, 100, 50, 10]);
        }
        let mut encoded = Vec::new();
        rgba.write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
            .unwrap();

        let image = SourceImage::decode(&encoded).unwrap();
        assert_eq!((image.width(), image.height()), (3, 2));
        assert_eq!(image.pixel(2, 1), [200, 100, 50]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(
            SourceImage::decode(b"definitely not an image"),
            Err(ConvertError::Decode(_))
        ));
    }
}
