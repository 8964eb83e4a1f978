/// A group of letters sharing one articulation weight
#[derive(Debug, Clone, PartialEq)]
pub struct SoundTier {
    pub name: String,
    pub sounds: Vec<char>,
    pub weight: f64,
}

impl SoundTier {
    fn new(name: &str, sounds: &str, weight: f64) -> Self {
        Self {
            name: name.to_string(),
            sounds: sounds.chars().collect(),
            weight,
        }
    }
}

/// Fixed phonetic tables driving analysis and categorization.
///
/// `Default` yields the Russian tables the bundled dataset is scored with.
/// Tests and other alphabets can construct their own.
#[derive(Debug, Clone, PartialEq)]
pub struct PhoneticTables {
    pub vowels: Vec<char>,
    /// Letters counted as difficult sounds
    pub hard_sounds: Vec<char>,
    /// Multi-letter clusters counted as difficult combinations
    pub combinations: Vec<String>,
    /// Ordered from easiest to hardest; a letter takes the first tier that lists it
    pub tiers: Vec<SoundTier>,
    pub hissing: Vec<char>,
    pub sibilant: Vec<char>,
    pub sonorant: Vec<char>,
    pub plosive: Vec<char>,
    /// Substring that marks a text as being about tongue twisters themselves
    pub twister_marker: String,
}

impl PhoneticTables {
    pub fn russian() -> Self {
        const COMBINATIONS: [&str; 42] = [
            "ств", "здр", "вств", "стн", "нтг", "рдц", "стл", "нтск", "стск", "тск", "стр", "скр",
            "спр", "взр", "вдр", "встр", "всм", "рщ", "сч", "зщ", "жж", "жд", "жч", "шч", "щч",
            "чщ", "чт", "чш", "шт", "шц", "рл", "лр", "кр", "тр", "рт", "тч", "дж", "дз", "дц",
            "кс", "гз", "бз",
        ];

        Self {
            vowels: "аеёиоуыэюя".chars().collect(),
            hard_sounds: "жшщчцрлфх".chars().collect(),
            combinations: COMBINATIONS.iter().map(|c| c.to_string()).collect(),
            tiers: vec![
                SoundTier::new("simple vowels", "аоуэ", 1.0),
                SoundTier::new("complex vowels", "ыиеёюя", 2.0),
                SoundTier::new("simple consonants", "мнпбтдкгвф", 3.0),
                SoundTier::new("whistling", "сзц", 5.0),
                SoundTier::new("hissing", "шжщч", 7.0),
                SoundTier::new("sonorant", "рлй", 8.0),
            ],
            hissing: "шщжч".chars().collect(),
            sibilant: "сзц".chars().collect(),
            sonorant: "рл".chars().collect(),
            plosive: "пбтдкг".chars().collect(),
            twister_marker: "скороговорк".to_string(),
        }
    }

    pub fn is_vowel(&self, c: char) -> bool {
        self.vowels.contains(&c)
    }

    pub fn is_hard_sound(&self, c: char) -> bool {
        self.hard_sounds.contains(&c)
    }

    pub fn tier_weight(&self, c: char) -> Option<f64> {
        self.tiers
            .iter()
            .find(|tier| tier.sounds.contains(&c))
            .map(|tier| tier.weight)
    }
}

impl Default for PhoneticTables {
    fn default() -> Self {
        Self::russian()
    }
}

/// True when `text` contains any of `letters`
pub fn contains_any(text: &str, letters: &[char]) -> bool {
    text.chars().any(|c| letters.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn russian_tables_have_expected_sizes() {
        let tables = PhoneticTables::russian();
        assert_eq!(tables.vowels.len(), 10);
        assert_eq!(tables.hard_sounds.len(), 9);
        assert_eq!(tables.tiers.len(), 6);
        assert!(tables.combinations.len() >= 40);
    }

    #[test]
    fn tier_weights_ascend() {
        let tables = PhoneticTables::default();
        let weights: Vec<f64> = tables.tiers.iter().map(|t| t.weight).collect();
        assert_eq!(weights, vec![1.0, 2.0, 3.0, 5.0, 7.0, 8.0]);
    }

    #[test]
    fn tier_weight_lookup() {
        let tables = PhoneticTables::default();
        assert_eq!(tables.tier_weight('а'), Some(1.0));
        assert_eq!(tables.tier_weight('ш'), Some(7.0));
        assert_eq!(tables.tier_weight('р'), Some(8.0));
        // soft sign and х are letters without a tier
        assert_eq!(tables.tier_weight('ь'), None);
        assert_eq!(tables.tier_weight('х'), None);
    }

    #[test]
    fn contains_any_matches_single_letter() {
        assert!(contains_any("каша", &['ш']));
        assert!(!contains_any("мама", &['ш', 'щ']));
    }
}
