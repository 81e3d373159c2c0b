//! Style presets and banter levels

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StylePreset {
    News,
    Friendly,
    Deepdive,
}

impl Default for StylePreset {
    fn default() -> Self {
        StylePreset::Friendly
    }
}

impl StylePreset {
    /// Seconds before a strong reaction may first occur
    pub fn opening_no_reaction_sec(self) -> f64 {
        match self {
            StylePreset::Friendly => 90.0,
            StylePreset::News | StylePreset::Deepdive => 120.0,
        }
    }

    /// Strong-reaction cap per episode
    pub fn strong_reaction_cap(self) -> u32 {
        match self {
            StylePreset::News => 0,
            StylePreset::Friendly => 2,
            StylePreset::Deepdive => 1,
        }
    }

    /// Sentence-length ceiling in characters before a forced split
    pub fn sentence_length_ceiling(self) -> usize {
        match self {
            StylePreset::Deepdive => 30,
            StylePreset::News | StylePreset::Friendly => 25,
        }
    }
}

/// Integer 0-3 controlling reaction/humor injection rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BanterLevel(u8);

impl BanterLevel {
    pub fn new(level: u8) -> Self {
        Self(level.min(3))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for BanterLevel {
    fn default() -> Self {
        Self(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friendly_allows_two_strong_reactions_at_90s() {
        assert_eq!(StylePreset::Friendly.opening_no_reaction_sec(), 90.0);
        assert_eq!(StylePreset::Friendly.strong_reaction_cap(), 2);
    }

    #[test]
    fn news_forbids_strong_reactions() {
        assert_eq!(StylePreset::News.strong_reaction_cap(), 0);
    }

    #[test]
    fn banter_level_clamps_to_three() {
        assert_eq!(BanterLevel::new(9).value(), 3);
    }
}
