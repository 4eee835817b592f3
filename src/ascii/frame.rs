//! ASCII frames: glyph grids produced by one conversion.

/// Foreground used for every glyph in grayscale mode.
pub const FOREGROUND: [u8; 3] = [255, 255, 255];

/// One character cell of an ASCII frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphCell {
    pub ch: char,
    /// Display color. In grayscale mode this is always [`FOREGROUND`].
    pub color: [u8; 3],
}

impl GlyphCell {
    pub fn new(ch: char, color: [u8; 3]) -> Self {
        Self { ch, color }
    }

    /// CSS `rgb(r, g, b)` notation, as consumed by browser canvases.
    pub fn css_color(&self) -> String {
        let [r, g, b] = self.color;
        format!("rgb({}, {}, {})", r, g, b)
    }
}

/// A grid of glyph cells, rows top-to-bottom and columns left-to-right.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AsciiFrame {
    rows: Vec<Vec<GlyphCell>>,
    grayscale: bool,
}

impl AsciiFrame {
    pub fn new(rows: Vec<Vec<GlyphCell>>, grayscale: bool) -> Self {
        Self { rows, grayscale }
    }

    pub fn rows(&self) -> &[Vec<GlyphCell>] {
        &self.rows
    }

    /// Whether the frame was produced in grayscale mode.
    pub fn is_grayscale(&self) -> bool {
        self.grayscale
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column count taken from the first row.
    ///
    /// Rows are expected to be equal length; for uneven frames this is the
    /// first row's length, not the maximum.
    pub fn columns(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Length of the longest row, in characters.
    pub fn max_row_len(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Text artifact: rows joined by `\n`, with a trailing newline.
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity(self.rows.iter().map(|r| r.len() + 1).sum());
        for row in &self.rows {
            text.extend(row.iter().map(|cell| cell.ch));
            text.push('\n');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(s: &str) -> Vec<GlyphCell> {
        s.chars().map(|ch| GlyphCell::new(ch, FOREGROUND)).collect()
    }

    #[test]
    fn test_to_text_has_trailing_newline() {
        let frame = AsciiFrame::new(vec![row(" .:"), row("#%@")], true);
        assert_eq!(frame.to_text(), " .:\n#%@\n");
    }

    #[test]
    fn test_to_text_empty_frame() {
        assert_eq!(AsciiFrame::default().to_text(), "");
    }

    #[test]
    fn test_columns_uses_first_row() {
        let frame = AsciiFrame::new(vec![row("ab"), row("abcd")], false);
        assert_eq!(frame.columns(), 2);
        assert_eq!(frame.max_row_len(), 4);
    }

    #[test]
    fn test_css_color() {
        let cell = GlyphCell::new('@', [40, 128, 255]);
        assert_eq!(cell.css_color(), "rgb(40, 128, 255)");
    }

    #[test]
    fn test_row_len_counts_chars_not_bytes() {
        let frame = AsciiFrame::new(vec![row("░▒▓█")], true);
        assert_eq!(frame.max_row_len(), 4);
    }
}
