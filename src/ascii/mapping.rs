//! Brightness to character and color mapping.

/// Lowest channel value a colored glyph may use.
/// Keeps dark source colors visible on a black background.
pub const MIN_CHANNEL: u8 = 40;

/// Weights of the ITU-R BT.601 luma formula.
const LUMA_R: f64 = 0.299;
const LUMA_G: f64 = 0.587;
const LUMA_B: f64 = 0.114;

/// Linear BT.601 luminance normalized to [0, 1].
///
/// `(0.299*R + 0.587*G + 0.114*B) / 255`
#[inline]
pub fn grayscale_brightness([r, g, b]: [u8; 3]) -> f64 {
    (r as f64 * LUMA_R + g as f64 * LUMA_G + b as f64 * LUMA_B) / 255.0
}

/// Perceived luminance on normalized channels, used in color mode.
///
/// `sqrt(0.299*(R/255)^2 + 0.587*(G/255)^2 + 0.114*(B/255)^2)`
#[inline]
pub fn perceptual_brightness([r, g, b]: [u8; 3]) -> f64 {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;
    (LUMA_R * r * r + LUMA_G * g * g + LUMA_B * b * b).sqrt()
}

/// Flip a brightness value: `1 - b`.
#[inline]
pub fn invert(brightness: f64) -> f64 {
    1.0 - brightness
}

/// Brightness of a sampled pixel under the given mode flags.
pub fn brightness(rgb: [u8; 3], grayscale: bool, inverted: bool) -> f64 {
    let b = if grayscale {
        grayscale_brightness(rgb)
    } else {
        perceptual_brightness(rgb)
    };
    if inverted {
        invert(b)
    } else {
        b
    }
}

/// Map brightness to an index into a charset of `levels` glyphs.
///
/// `floor(b * (levels - 1))`, clamped to `[0, levels - 1]`. Float error can
/// push white slightly above 1.0, so the clamp is explicit.
pub fn char_index(brightness: f64, levels: usize) -> usize {
    if levels <= 1 {
        return 0;
    }
    let max = levels - 1;
    let scaled = (brightness * max as f64).floor();
    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else {
        (scaled as usize).min(max)
    }
}

/// Scale factor applied to a source color for the glyph at `index`.
///
/// Ranges from 0.5 for the emptiest glyph to 2.0 for the densest.
#[inline]
pub fn density_factor(index: usize, levels: usize) -> f64 {
    if levels <= 1 {
        return 0.5;
    }
    (index as f64 / (levels - 1) as f64) * 1.5 + 0.5
}

/// Color for a glyph in color mode.
///
/// Each channel becomes `clamp(round(channel * factor), MIN_CHANNEL, 255)`.
pub fn adjust_color(rgb: [u8; 3], factor: f64) -> [u8; 3] {
    rgb.map(|c| {
        let scaled = (c as f64 * factor).round();
        scaled.clamp(MIN_CHANNEL as f64, 255.0) as u8
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grayscale_brightness_extremes() {
        assert_eq!(grayscale_brightness([0, 0, 0]), 0.0);
        assert!((grayscale_brightness([255, 255, 255]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_grayscale_brightness_weights() {
        assert!((grayscale_brightness([255, 0, 0]) - 0.299).abs() < 1e-9);
        assert!((grayscale_brightness([0, 255, 0]) - 0.587).abs() < 1e-9);
        assert!((grayscale_brightness([0, 0, 255]) - 0.114).abs() < 1e-9);
    }

    #[test]
    fn test_perceptual_brightness_gray_and_red() {
        // weights sum to 1, so a neutral gray maps to its own level
        let gray = [128, 128, 128];
        assert!((perceptual_brightness(gray) - 128.0 / 255.0).abs() < 1e-9);
        let red = [255, 0, 0];
        assert!((perceptual_brightness(red) - 0.299f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_char_index_bounds() {
        assert_eq!(char_index(0.0, 10), 0);
        assert_eq!(char_index(1.0, 10), 9);
        assert_eq!(char_index(0.5, 10), 4);
    }

    #[test]
    fn test_char_index_clamps_out_of_range() {
        assert_eq!(char_index(1.0000001, 10), 9);
        assert_eq!(char_index(7.0, 5), 4);
        assert_eq!(char_index(-0.2, 5), 0);
        assert_eq!(char_index(f64::NAN, 5), 0);
    }

    #[test]
    fn test_char_index_single_level() {
        assert_eq!(char_index(0.9, 1), 0);
    }

    #[test]
    fn test_brightness_inverted() {
        let b = brightness([255, 255, 255], true, true);
        assert!(b.abs() < 1e-9);
        let b = brightness([0, 0, 0], false, true);
        assert_eq!(b, 1.0);
    }

    #[test]
    fn test_density_factor_range() {
        assert_eq!(density_factor(0, 10), 0.5);
        assert_eq!(density_factor(9, 10), 2.0);
    }

    #[test]
    fn test_adjust_color_floors_dark_channels() {
        assert_eq!(adjust_color([0, 10, 100], 0.5), [40, 40, 50]);
    }

    #[test]
    fn test_adjust_color_caps_bright_channels() {
        assert_eq!(adjust_color([200, 120, 60], 2.0), [255, 240, 120]);
    }
}
