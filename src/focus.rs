use crate::language::{
    tables::contains_any, Category, DifficultyBand, PhoneticTables, ScoredItem, TextAnalyzer,
};
use clap::ValueEnum;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// The diction dimension a perfection session emphasises
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Focus {
    #[default]
    Articulation,
    Rhythm,
    Stress,
    Breathing,
    Speed,
}

impl Focus {
    pub const ALL: [Focus; 5] = [
        Focus::Articulation,
        Focus::Rhythm,
        Focus::Stress,
        Focus::Breathing,
        Focus::Speed,
    ];

    pub fn description(self) -> &'static str {
        match self {
            Focus::Articulation => "Clear pronunciation of every sound",
            Focus::Rhythm => "An even tempo of speech",
            Focus::Stress => "Correct stress in every word",
            Focus::Breathing => "Breath control through the phrase",
            Focus::Speed => "More speed without losing quality",
        }
    }

    /// The focus worth training after this one
    pub fn next(self) -> Self {
        match self {
            Focus::Articulation => Focus::Rhythm,
            Focus::Rhythm => Focus::Stress,
            Focus::Stress => Focus::Breathing,
            Focus::Breathing => Focus::Speed,
            Focus::Speed => Focus::Articulation,
        }
    }

    pub fn strategy(self) -> Box<dyn FocusStrategy> {
        match self {
            Focus::Articulation => Box::new(ArticulationFocus),
            Focus::Rhythm => Box::new(RhythmFocus),
            Focus::Stress => Box::new(StressFocus),
            Focus::Breathing => Box::new(BreathingFocus),
            Focus::Speed => Box::new(SpeedFocus),
        }
    }
}

/// A labelled figure shown next to a tongue twister
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayField {
    pub label: &'static str,
    pub value: String,
}

impl DisplayField {
    fn new(label: &'static str, value: impl ToString) -> Self {
        Self {
            label,
            value: value.to_string(),
        }
    }
}

/// Per-focus behaviour of a perfection session
pub trait FocusStrategy {
    fn focus(&self) -> Focus;

    /// Buckets this focus adds on top of the four bands
    fn categories(&self) -> &'static [Category];

    /// Focus buckets an item belongs to
    fn memberships(&self, item: &ScoredItem, tables: &PhoneticTables) -> Vec<Category>;

    /// Candidate buckets for a round at `progress` in [0, 1]
    fn tier_menu(&self, progress: f64) -> &'static [Category];

    fn display_fields(&self, item: &ScoredItem, analyzer: &TextAnalyzer) -> Vec<DisplayField>;

    fn advice(
        &self,
        item: &ScoredItem,
        analyzer: &TextAnalyzer,
        round: usize,
        total_rounds: usize,
    ) -> Vec<String>;

    /// Extra profile categories updated after a rating
    fn tracked_categories(&self, _item: &ScoredItem, _tables: &PhoneticTables) -> Vec<Category> {
        Vec::new()
    }

    /// Coaching hint for a rating below 4
    fn feedback_tip(&self, item: &ScoredItem) -> Option<&'static str>;

    /// Closing recommendation for the session summary
    fn closing_tip(&self) -> &'static str;
}

const ARTICULATION_EARLY: &[Category] = &[Category::EASY, Category::MEDIUM, Category::Sibilant];
const ARTICULATION_MIDDLE: &[Category] =
    &[Category::MEDIUM, Category::Hissing, Category::Sibilant];
const ARTICULATION_LATE: &[Category] = &[
    Category::HARD,
    Category::EXPERT,
    Category::Sonorant,
    Category::ComplexCombos,
];

pub struct ArticulationFocus;

impl ArticulationFocus {
    fn sound_groups(item: &ScoredItem, tables: &PhoneticTables) -> Vec<Category> {
        let text = item.lowercase_text();
        [
            (Category::Hissing, &tables.hissing),
            (Category::Sibilant, &tables.sibilant),
            (Category::Sonorant, &tables.sonorant),
        ]
        .into_iter()
        .filter(|(_, letters)| contains_any(&text, letters))
        .map(|(category, _)| category)
        .collect()
    }
}

impl FocusStrategy for ArticulationFocus {
    fn focus(&self) -> Focus {
        Focus::Articulation
    }

    fn categories(&self) -> &'static [Category] {
        &[
            Category::Hissing,
            Category::Sibilant,
            Category::Sonorant,
            Category::ComplexCombos,
        ]
    }

    fn memberships(&self, item: &ScoredItem, tables: &PhoneticTables) -> Vec<Category> {
        let mut categories = Self::sound_groups(item, tables);
        if item.stats.difficult_combos > 2 {
            categories.push(Category::ComplexCombos);
        }
        categories
    }

    fn tier_menu(&self, progress: f64) -> &'static [Category] {
        if progress < 0.3 {
            ARTICULATION_EARLY
        } else if progress < 0.6 {
            ARTICULATION_MIDDLE
        } else {
            ARTICULATION_LATE
        }
    }

    fn display_fields(&self, item: &ScoredItem, analyzer: &TextAnalyzer) -> Vec<DisplayField> {
        let text = item.lowercase_text();
        let combos = analyzer.found_combinations(&text, 3);
        let sounds = text
            .chars()
            .filter(|&c| analyzer.tables().is_hard_sound(c))
            .unique()
            .sorted()
            .join(", ");

        vec![
            DisplayField::new(
                "Difficult combinations",
                if combos.is_empty() {
                    "none".to_string()
                } else {
                    combos.join(", ")
                },
            ),
            DisplayField::new(
                "Difficult sounds",
                if sounds.is_empty() { "none".to_string() } else { sounds },
            ),
            DisplayField::new("Combination count", item.stats.difficult_combos),
        ]
    }

    fn advice(
        &self,
        item: &ScoredItem,
        analyzer: &TextAnalyzer,
        round: usize,
        _total_rounds: usize,
    ) -> Vec<String> {
        let text = item.lowercase_text();
        let tables = analyzer.tables();
        let mut advice = vec![match round {
            1 => "Pronounce every consonant clearly",
            2 => "Bring out the hissing and whistling sounds (ш, щ, ж, с, з)",
            3 => "Work through the consonant clusters",
            4 => "Keep the transitions between sounds smooth",
            _ => "Aim for flawless pronunciation of every sound",
        }
        .to_string()];

        if let Some(combo) = analyzer.found_combinations(&text, 1).first() {
            advice.push(format!("Pay special attention to \"{combo}\""));
        }

        for (group, letters) in [
            ("Hissing", &tables.hissing),
            ("Whistling", &tables.sibilant),
            ("Sonorant", &tables.sonorant),
            ("Plosive", &tables.plosive),
        ] {
            let count = text.chars().filter(|c| letters.contains(c)).count();
            if count > 0 {
                advice.push(format!("{group}: {count} sounds"));
            }
        }

        advice
    }

    fn tracked_categories(&self, item: &ScoredItem, tables: &PhoneticTables) -> Vec<Category> {
        Self::sound_groups(item, tables)
    }

    fn feedback_tip(&self, item: &ScoredItem) -> Option<&'static str> {
        (item.stats.difficult_sounds > 0)
            .then_some("Give the difficult sounds extra care and articulate each one.")
    }

    fn closing_tip(&self) -> &'static str {
        "Warm up your lips and tongue before working on tongue twisters."
    }
}

const RHYTHM_EARLY: &[Category] = &[Category::Short, Category::EASY, Category::MEDIUM];
const RHYTHM_MIDDLE: &[Category] = &[Category::MEDIUM, Category::Rhythmic];
const RHYTHM_LATE: &[Category] = &[Category::Long, Category::HARD, Category::Rhythmic];

pub struct RhythmFocus;

impl FocusStrategy for RhythmFocus {
    fn focus(&self) -> Focus {
        Focus::Rhythm
    }

    fn categories(&self) -> &'static [Category] {
        &[Category::Short, Category::Long, Category::Rhythmic]
    }

    fn memberships(&self, item: &ScoredItem, _tables: &PhoneticTables) -> Vec<Category> {
        let stats = &item.stats;
        let mut categories = Vec::new();
        if stats.word_count <= 3 {
            categories.push(Category::Short);
        } else if stats.word_count >= 7 {
            categories.push(Category::Long);
        }
        if stats.repeat_chars > stats.char_count / 3 {
            categories.push(Category::Rhythmic);
        }
        categories
    }

    fn tier_menu(&self, progress: f64) -> &'static [Category] {
        if progress < 0.4 {
            RHYTHM_EARLY
        } else if progress < 0.7 {
            RHYTHM_MIDDLE
        } else {
            RHYTHM_LATE
        }
    }

    fn display_fields(&self, item: &ScoredItem, analyzer: &TextAnalyzer) -> Vec<DisplayField> {
        let pattern = item
            .text()
            .split_whitespace()
            .map(|word| "•".repeat(analyzer.syllables_in_word(word)))
            .join(" ");

        vec![
            DisplayField::new("Rhythm", pattern),
            DisplayField::new("Syllables", analyzer.syllables(item.text())),
            DisplayField::new("Words", item.stats.word_count),
        ]
    }

    fn advice(
        &self,
        item: &ScoredItem,
        _analyzer: &TextAnalyzer,
        round: usize,
        _total_rounds: usize,
    ) -> Vec<String> {
        let lead = match round {
            1 => "Give every syllable the same weight",
            2 => "Place clean pauses between words",
            3 => "Keep the rhythmic pattern flowing",
            _ => "Keep a natural rhythm without losing clarity",
        };
        let extra = if item.stats.word_count > 5 {
            "Keep the long phrase even from start to finish"
        } else {
            "Keep the short words on a steady beat"
        };
        vec![lead.to_string(), extra.to_string()]
    }

    fn feedback_tip(&self, _item: &ScoredItem) -> Option<&'static str> {
        Some("Clap out the rhythm before saying the twister.")
    }

    fn closing_tip(&self) -> &'static str {
        "Practise with a metronome to steady your rhythm."
    }
}

const STRESS_EASY: &[Category] = &[Category::EASY];
const STRESS_MEDIUM: &[Category] = &[Category::MEDIUM];
const STRESS_HARD: &[Category] = &[Category::HARD];
const STRESS_EXPERT: &[Category] = &[Category::EXPERT];

pub struct StressFocus;

impl FocusStrategy for StressFocus {
    fn focus(&self) -> Focus {
        Focus::Stress
    }

    fn categories(&self) -> &'static [Category] {
        &[]
    }

    fn memberships(&self, _item: &ScoredItem, _tables: &PhoneticTables) -> Vec<Category> {
        Vec::new()
    }

    fn tier_menu(&self, progress: f64) -> &'static [Category] {
        match DifficultyBand::for_progress(progress) {
            DifficultyBand::Easy => STRESS_EASY,
            DifficultyBand::Medium => STRESS_MEDIUM,
            DifficultyBand::Hard => STRESS_HARD,
            DifficultyBand::Expert => STRESS_EXPERT,
        }
    }

    fn display_fields(&self, item: &ScoredItem, analyzer: &TextAnalyzer) -> Vec<DisplayField> {
        let long_words = item
            .text()
            .split_whitespace()
            .filter(|word| analyzer.syllables_in_word(word) > 2)
            .join(", ");

        vec![DisplayField::new(
            "Long words",
            if long_words.is_empty() {
                "none".to_string()
            } else {
                long_words
            },
        )]
    }

    fn advice(
        &self,
        _item: &ScoredItem,
        _analyzer: &TextAnalyzer,
        round: usize,
        _total_rounds: usize,
    ) -> Vec<String> {
        let lead = if round == 1 {
            "Find the stressed syllable in every word before speaking"
        } else {
            "Keep the stress in place as the pace picks up"
        };
        vec![
            lead.to_string(),
            "Pay extra attention to the long words".to_string(),
        ]
    }

    fn feedback_tip(&self, _item: &ScoredItem) -> Option<&'static str> {
        Some("Say the twister slowly, leaning on the stressed syllables.")
    }

    fn closing_tip(&self) -> &'static str {
        "Read strongly rhythmic poetry aloud to work on stress."
    }
}

const BREATHING_EARLY: &[Category] = &[Category::ShortPhrases, Category::EASY];
const BREATHING_LATE: &[Category] = &[Category::LongPhrases, Category::MEDIUM, Category::HARD];

pub struct BreathingFocus;

impl FocusStrategy for BreathingFocus {
    fn focus(&self) -> Focus {
        Focus::Breathing
    }

    fn categories(&self) -> &'static [Category] {
        &[Category::LongPhrases, Category::ShortPhrases]
    }

    fn memberships(&self, item: &ScoredItem, _tables: &PhoneticTables) -> Vec<Category> {
        if item.stats.char_count > 60 {
            vec![Category::LongPhrases]
        } else if item.stats.char_count < 30 {
            vec![Category::ShortPhrases]
        } else {
            Vec::new()
        }
    }

    fn tier_menu(&self, progress: f64) -> &'static [Category] {
        if progress < 0.4 {
            BREATHING_EARLY
        } else {
            BREATHING_LATE
        }
    }

    fn display_fields(&self, item: &ScoredItem, _analyzer: &TextAnalyzer) -> Vec<DisplayField> {
        let stats = &item.stats;
        let letters_per_word = if stats.word_count == 0 {
            0.0
        } else {
            stats.char_count as f64 / stats.word_count as f64
        };

        let mut fields = vec![
            DisplayField::new("Words", stats.word_count),
            DisplayField::new("Letters per word", format!("{letters_per_word:.1}")),
            DisplayField::new("Letters", stats.char_count),
        ];

        let words: Vec<&str> = item.text().split_whitespace().collect();
        if words.len() > 5 {
            fields.push(DisplayField::new(
                "Breath point",
                format!("before \"{}\"", words[words.len() / 2]),
            ));
        }
        fields
    }

    fn advice(
        &self,
        item: &ScoredItem,
        _analyzer: &TextAnalyzer,
        round: usize,
        _total_rounds: usize,
    ) -> Vec<String> {
        let mut advice = vec![match round {
            1 => "Take a full breath before you start",
            2 => "Spend the air evenly across the phrase",
            3 => "Say the whole twister on a single breath",
            _ => "Keep your breath under control at full speed",
        }
        .to_string()];
        if item.stats.char_count > 50 {
            advice.push("Take a short breath in the middle of the phrase".to_string());
        }
        advice
    }

    fn feedback_tip(&self, _item: &ScoredItem) -> Option<&'static str> {
        Some("Take a few deep breaths before you begin.")
    }

    fn closing_tip(&self) -> &'static str {
        "Regular breathing exercises will build your breath control."
    }
}

const SPEED_EARLY: &[Category] = &[Category::EASY];
const SPEED_MIDDLE: &[Category] = &[Category::MEDIUM, Category::Repetitive];
const SPEED_LATE: &[Category] = &[Category::HARD, Category::EXPERT, Category::Repetitive];

const BASE_WORDS_PER_MINUTE: usize = 60;
const MAX_WORDS_PER_MINUTE: usize = 120;

pub struct SpeedFocus;

impl SpeedFocus {
    /// Words per minute to aim for, rising linearly over the session
    pub fn target_tempo(round: usize, total_rounds: usize) -> usize {
        let fraction = round as f64 / total_rounds.max(1) as f64;
        BASE_WORDS_PER_MINUTE
            + ((MAX_WORDS_PER_MINUTE - BASE_WORDS_PER_MINUTE) as f64 * fraction) as usize
    }
}

impl FocusStrategy for SpeedFocus {
    fn focus(&self) -> Focus {
        Focus::Speed
    }

    fn categories(&self) -> &'static [Category] {
        &[Category::Repetitive, Category::TwisterLabeled]
    }

    fn memberships(&self, item: &ScoredItem, tables: &PhoneticTables) -> Vec<Category> {
        let mut categories = Vec::new();
        if item.stats.repeat_chars > item.stats.char_count / 4 {
            categories.push(Category::Repetitive);
        }
        if item.lowercase_text().contains(&tables.twister_marker) {
            categories.push(Category::TwisterLabeled);
        }
        categories
    }

    fn tier_menu(&self, progress: f64) -> &'static [Category] {
        if progress < 0.3 {
            SPEED_EARLY
        } else if progress < 0.6 {
            SPEED_MIDDLE
        } else {
            SPEED_LATE
        }
    }

    fn display_fields(&self, item: &ScoredItem, _analyzer: &TextAnalyzer) -> Vec<DisplayField> {
        vec![
            DisplayField::new("Speed difficulty", format!("{:.1}", item.score)),
            DisplayField::new("Combinations", item.stats.difficult_combos),
            DisplayField::new("Repeated letters", item.stats.repeat_chars),
            DisplayField::new(
                "Estimated time",
                format!("{:.1} s", item.stats.char_count as f64 * 0.1),
            ),
        ]
    }

    fn advice(
        &self,
        item: &ScoredItem,
        _analyzer: &TextAnalyzer,
        round: usize,
        total_rounds: usize,
    ) -> Vec<String> {
        let tempo = Self::target_tempo(round, total_rounds);
        let seconds = item.stats.word_count as f64 / (tempo as f64 / 60.0);

        let mut advice = vec![
            format!("Target tempo: {tempo} words per minute"),
            match round {
                1 => "Start slowly, clarity comes first",
                2 => "Speed up a little while staying clear",
                3 => "Push towards your top speed",
                _ => "Maximum speed with full clarity",
            }
            .to_string(),
            format!("Target time: about {seconds:.1} s"),
        ];
        if item.stats.difficult_combos > 2 {
            advice.push("Ease off slightly on the consonant clusters".to_string());
        }
        advice
    }

    fn feedback_tip(&self, _item: &ScoredItem) -> Option<&'static str> {
        Some("Start very slowly and speed up gradually.")
    }

    fn closing_tip(&self) -> &'static str {
        "Practise daily and raise the tempo a little each time."
    }
}
