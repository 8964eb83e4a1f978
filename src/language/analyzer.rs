use super::{difficulty::DifficultyBand, tables::PhoneticTables};
use crate::corpus::TextItem;
use std::collections::HashMap;

/// Structural statistics of one text, computed on its lower-cased form
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextStatistics {
    pub word_count: usize,
    /// Letters only
    pub char_count: usize,
    pub vowel_count: usize,
    pub consonant_count: usize,
    pub unique_chars: usize,
    /// Sum of (occurrences - 1) over letters seen more than once
    pub repeat_chars: usize,
    pub difficult_sounds: usize,
    pub difficult_combos: usize,
    /// Frequency weighted average of the sound tier weights
    pub sound_complexity: f64,
}

impl TextStatistics {
    /// Weighted linear combination used to band texts.
    ///
    /// The terms are accumulated in a fixed order so that recorded scores
    /// stay bit-identical.
    pub fn difficulty_score(&self) -> f64 {
        let mut score = self.word_count as f64 * 0.5;

        score += self.char_count as f64 * 0.1;

        let consonant_vowel_ratio = if self.vowel_count > 0 {
            self.consonant_count as f64 / self.vowel_count as f64
        } else {
            1.0
        };
        score += consonant_vowel_ratio * 2.0;

        score += self.repeat_chars as f64 * 0.3;
        score += self.difficult_sounds as f64 * 0.5;
        score += self.difficult_combos as f64 * 1.0;
        score += self.sound_complexity * 1.5;

        score
    }
}

/// A text item together with its statistics and difficulty score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredItem {
    pub item: TextItem,
    pub stats: TextStatistics,
    pub score: f64,
}

impl ScoredItem {
    pub fn band(&self) -> DifficultyBand {
        DifficultyBand::classify(self.score)
    }

    pub fn text(&self) -> &str {
        &self.item.text
    }

    pub fn lowercase_text(&self) -> String {
        self.item.text.to_lowercase()
    }
}

/// Turns raw text into statistics and a difficulty score
#[derive(Debug, Clone, Default)]
pub struct TextAnalyzer {
    tables: PhoneticTables,
}

impl TextAnalyzer {
    pub fn new(tables: PhoneticTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &PhoneticTables {
        &self.tables
    }

    pub fn analyze(&self, text: &str) -> TextStatistics {
        let text = text.to_lowercase();
        let mut stats = TextStatistics {
            word_count: text.split_whitespace().count(),
            ..Default::default()
        };

        let mut frequencies: HashMap<char, usize> = HashMap::new();
        let mut tier_weight_sum = 0.0;

        for c in text.chars().filter(|c| c.is_alphabetic()) {
            stats.char_count += 1;
            *frequencies.entry(c).or_insert(0) += 1;

            if self.tables.is_vowel(c) {
                stats.vowel_count += 1;
            } else {
                stats.consonant_count += 1;
            }

            if self.tables.is_hard_sound(c) {
                stats.difficult_sounds += 1;
            }

            if let Some(weight) = self.tables.tier_weight(c) {
                tier_weight_sum += weight;
            }
        }

        stats.unique_chars = frequencies.len();
        stats.repeat_chars = frequencies
            .values()
            .filter(|&&count| count > 1)
            .map(|count| count - 1)
            .sum();
        stats.difficult_combos = self.count_combinations(&text);
        stats.sound_complexity = if stats.char_count == 0 {
            0.0
        } else {
            tier_weight_sum / stats.char_count as f64
        };

        stats
    }

    pub fn score(&self, text: &str) -> (TextStatistics, f64) {
        let stats = self.analyze(text);
        let score = stats.difficulty_score();
        (stats, score)
    }

    pub fn analyze_item(&self, item: TextItem) -> ScoredItem {
        let (stats, score) = self.score(&item.text);
        ScoredItem { item, stats, score }
    }

    /// Non-overlapping occurrences of every listed combination, summed
    pub fn count_combinations(&self, lowercase_text: &str) -> usize {
        self.tables
            .combinations
            .iter()
            .map(|combo| lowercase_text.matches(combo.as_str()).count())
            .sum()
    }

    /// First `limit` combinations (in table order) present in the text
    pub fn found_combinations(&self, lowercase_text: &str, limit: usize) -> Vec<String> {
        self.tables
            .combinations
            .iter()
            .filter(|combo| lowercase_text.contains(combo.as_str()))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Vowel count of a word, at least one
    pub fn syllables_in_word(&self, word: &str) -> usize {
        word.to_lowercase()
            .chars()
            .filter(|&c| self.tables.is_vowel(c))
            .count()
            .max(1)
    }

    pub fn syllables(&self, text: &str) -> usize {
        text.split_whitespace()
            .map(|word| self.syllables_in_word(word))
            .sum()
    }
}
