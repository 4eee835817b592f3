//! Image to ASCII conversion.
//!
//! The pipeline for one conversion:
//!
//! 1. **Sampling** - pick one pixel per glyph cell ([`sampler`])
//! 2. **Brightness** - BT.601 luma, or perceptual luminance in color mode
//! 3. **Character mapping** - brightness to a glyph of the active [`CharSet`]
//! 4. **Color** - in color mode, scale the source color by glyph density
//!
//! The result is an [`AsciiFrame`], which the [`crate::render`] module turns
//! into a PNG and which renders itself as text.

mod charset;
mod error;
mod frame;
mod mapping;
mod sampler;
mod source;

pub use charset::{CharSet, BLOCKS_CHARSET, DETAILED_CHARSET, MINIMAL_CHARSET, STANDARD_CHARSET};
pub use error::ConvertError;
pub use frame::{AsciiFrame, GlyphCell, FOREGROUND};
pub use mapping::{
    adjust_color, brightness, char_index, density_factor, grayscale_brightness, invert,
    perceptual_brightness, MIN_CHANNEL,
};
pub use sampler::{sample, SampleGrid, SampleLayout, FONT_ASPECT};
pub use source::SourceImage;

use serde::{Deserialize, Serialize};

/// Smallest accepted sampling resolution.
pub const MIN_RESOLUTION: f64 = 0.05;
/// Largest accepted sampling resolution.
pub const MAX_RESOLUTION: f64 = 0.30;
/// Resolution used when none is given.
pub const DEFAULT_RESOLUTION: f64 = 0.11;

/// Settings for a single conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Sampling density, a fraction in [0.05, 0.30].
    pub resolution: f64,
    pub invert: bool,
    pub grayscale: bool,
    #[serde(with = "charset_name")]
    pub charset: CharSet,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            invert: false,
            grayscale: true,
            charset: CharSet::Standard,
        }
    }
}

impl ConversionConfig {
    /// Check the resolution range.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if !(MIN_RESOLUTION..=MAX_RESOLUTION).contains(&self.resolution) {
            return Err(ConvertError::ResolutionOutOfRange(self.resolution));
        }
        Ok(())
    }
}

/// Convert an image into an ASCII frame.
///
/// # Errors
/// Fails when the configuration is invalid or the image samples to an empty
/// grid at the requested resolution.
pub fn convert(image: &SourceImage, config: &ConversionConfig) -> Result<AsciiFrame, ConvertError> {
    config.validate()?;

    let layout = SampleLayout::compute(image.width(), image.height(), config.resolution)?;
    let grid = sample(image, &layout);

    let chars = config.charset.chars();
    let levels = chars.len();

    let rows = grid
        .rows()
        .map(|row| {
            row.iter()
                .map(|&rgb| {
                    let b = brightness(rgb, config.grayscale, config.invert);
                    let idx = char_index(b, levels);
                    let color = if config.grayscale {
                        FOREGROUND
                    } else {
                        adjust_color(rgb, density_factor(idx, levels))
                    };
                    GlyphCell::new(chars[idx], color)
                })
                .collect()
        })
        .collect();

    Ok(AsciiFrame::new(rows, config.grayscale))
}

mod charset_name {
    use super::CharSet;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(charset: &CharSet, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(charset.name())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CharSet, D::Error> {
        let name = String::deserialize(deserializer)?;
        CharSet::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown charset '{}'", name)))
    }
}
