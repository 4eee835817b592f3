//! Character set definitions for ASCII conversion.

/// Standard ASCII density ramp (10 levels).
/// Characters ordered from emptiest (space) to densest (@).
pub const STANDARD_CHARSET: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Detailed ASCII ramp (15 levels) for finer tonal steps.
pub const DETAILED_CHARSET: &[char] = &[
    ' ', '.', ',', ':', ';', 'i', '1', 't', 'f', 'L', 'C', 'G', '0', '8', '@',
];

/// Block character set (5 levels).
/// Uses Unicode shade blocks for higher perceived resolution.
pub const BLOCKS_CHARSET: &[char] = &[' ', '░', '▒', '▓', '█'];

/// Minimal character set (4 levels).
/// Clean, less noisy look.
pub const MINIMAL_CHARSET: &[char] = &[' ', '.', ':', '█'];

/// Named character set used to map brightness to glyphs.
///
/// Index 0 of every set is the emptiest glyph and the last index the densest;
/// brightness mapping relies on that ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum CharSet {
    /// Standard ASCII density ramp (10 levels)
    #[default]
    Standard,
    /// Detailed ASCII ramp (15 levels)
    Detailed,
    /// Unicode shade blocks (5 levels)
    Blocks,
    /// Minimal set (4 levels)
    Minimal,
}

impl CharSet {
    /// Every character set, in menu order.
    pub const ALL: [CharSet; 4] = [
        CharSet::Standard,
        CharSet::Detailed,
        CharSet::Blocks,
        CharSet::Minimal,
    ];

    /// Get the ordered glyphs for this charset.
    pub fn chars(&self) -> &'static [char] {
        match self {
            CharSet::Standard => STANDARD_CHARSET,
            CharSet::Detailed => DETAILED_CHARSET,
            CharSet::Blocks => BLOCKS_CHARSET,
            CharSet::Minimal => MINIMAL_CHARSET,
        }
    }

    /// Number of density levels.
    pub fn len(&self) -> usize {
        self.chars().len()
    }

    /// Always false: the built-in sets all have at least two glyphs.
    pub fn is_empty(&self) -> bool {
        self.chars().is_empty()
    }

    /// Get a human-readable name for the charset.
    pub fn name(&self) -> &'static str {
        match self {
            CharSet::Standard => "standard",
            CharSet::Detailed => "detailed",
            CharSet::Blocks => "blocks",
            CharSet::Minimal => "minimal",
        }
    }

    /// Look up a charset by its name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for CharSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_round_trips_every_set() {
        for set in CharSet::ALL {
            assert_eq!(CharSet::from_name(set.name()), Some(set));
        }
    }

    #[test]
    fn test_from_name_ignores_case_and_whitespace() {
        assert_eq!(CharSet::from_name(" Blocks "), Some(CharSet::Blocks));
        assert_eq!(CharSet::from_name("DETAILED"), Some(CharSet::Detailed));
        assert_eq!(CharSet::from_name("braille"), None);
    }

    #[test]
    fn test_sets_start_empty() {
        for set in CharSet::ALL {
            assert_eq!(set.chars()[0], ' ');
            assert!(set.len() >= 2);
        }
    }

    #[test]
    fn test_set_lengths() {
        assert_eq!(CharSet::Standard.len(), 10);
        assert_eq!(CharSet::Detailed.len(), 15);
        assert_eq!(CharSet::Blocks.len(), 5);
        assert_eq!(CharSet::Minimal.len(), 4);
    }
}
