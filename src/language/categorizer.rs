use super::{analyzer::ScoredItem, difficulty::DifficultyBand, tables::PhoneticTables};
use crate::focus::FocusStrategy;
use std::collections::BTreeMap;
use std::fmt;

/// Named, possibly overlapping bucket of a session's training subset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Band(DifficultyBand),
    // articulation
    Hissing,
    Sibilant,
    Sonorant,
    ComplexCombos,
    // rhythm
    Short,
    Long,
    Rhythmic,
    // breathing
    LongPhrases,
    ShortPhrases,
    // speed
    Repetitive,
    TwisterLabeled,
}

impl Category {
    pub const EASY: Category = Category::Band(DifficultyBand::Easy);
    pub const MEDIUM: Category = Category::Band(DifficultyBand::Medium);
    pub const HARD: Category = Category::Band(DifficultyBand::Hard);
    pub const EXPERT: Category = Category::Band(DifficultyBand::Expert);

    pub fn name(self) -> &'static str {
        match self {
            Category::Band(band) => band.name(),
            Category::Hissing => "hissing",
            Category::Sibilant => "sibilant",
            Category::Sonorant => "sonorant",
            Category::ComplexCombos => "complex_combos",
            Category::Short => "short",
            Category::Long => "long",
            Category::Rhythmic => "rhythmic",
            Category::LongPhrases => "long_phrases",
            Category::ShortPhrases => "short_phrases",
            Category::Repetitive => "repetitive",
            Category::TwisterLabeled => "twister_labeled",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Multi-map from category to the items it holds, built once per session.
///
/// Items are stored once; buckets hold indices into them.
#[derive(Debug, Clone, Default)]
pub struct Categories {
    items: Vec<ScoredItem>,
    buckets: BTreeMap<Category, Vec<usize>>,
}

impl Categories {
    pub fn build(
        items: Vec<ScoredItem>,
        strategy: &dyn FocusStrategy,
        tables: &PhoneticTables,
    ) -> Self {
        let mut buckets: BTreeMap<Category, Vec<usize>> = DifficultyBand::ALL
            .iter()
            .map(|&band| (Category::Band(band), Vec::new()))
            .chain(strategy.categories().iter().map(|&c| (c, Vec::new())))
            .collect();

        for (idx, item) in items.iter().enumerate() {
            buckets
                .entry(Category::Band(item.band()))
                .or_default()
                .push(idx);

            for category in strategy.memberships(item, tables) {
                buckets.entry(category).or_default().push(idx);
            }
        }

        Self { items, buckets }
    }

    pub fn items(&self) -> &[ScoredItem] {
        &self.items
    }

    pub fn item(&self, idx: usize) -> &ScoredItem {
        &self.items[idx]
    }

    /// Indices held by a category; unknown categories are empty
    pub fn indices(&self, category: Category) -> &[usize] {
        self.buckets
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn get(&self, category: Category) -> impl Iterator<Item = &ScoredItem> {
        self.indices(category).iter().map(|&idx| &self.items[idx])
    }

    pub fn len_of(&self, category: Category) -> usize {
        self.indices(category).len()
    }

    pub fn has_items(&self, category: Category) -> bool {
        !self.indices(category).is_empty()
    }

    pub fn contains(&self, category: Category, idx: usize) -> bool {
        self.indices(category).contains(&idx)
    }

    /// Every category present, including empty ones
    pub fn names(&self) -> impl Iterator<Item = Category> + '_ {
        self.buckets.keys().copied()
    }

    pub fn first_non_empty(&self) -> Option<Category> {
        self.buckets
            .iter()
            .find(|(_, indices)| !indices.is_empty())
            .map(|(&category, _)| category)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Partition `items` into the band buckets plus the focus-specific ones
pub fn categorize(
    items: &[ScoredItem],
    strategy: &dyn FocusStrategy,
    tables: &PhoneticTables,
) -> Categories {
    Categories::build(items.to_vec(), strategy, tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::TextItem;
    use crate::focus::Focus;
    use crate::language::TextAnalyzer;

    fn scored(texts: &[&str]) -> Vec<ScoredItem> {
        let analyzer = TextAnalyzer::default();
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                analyzer.analyze_item(TextItem {
                    number: i.to_string(),
                    date: String::new(),
                    text: text.to_string(),
                })
            })
            .collect()
    }

    fn build(texts: &[&str], focus: Focus) -> Categories {
        categorize(
            &scored(texts),
            focus.strategy().as_ref(),
            &PhoneticTables::default(),
        )
    }

    #[test]
    fn band_buckets_always_exist() {
        let categories = build(&["Оса уснула"], Focus::Stress);
        let names: Vec<Category> = categories.names().collect();
        assert_eq!(
            names,
            vec![
                Category::EASY,
                Category::MEDIUM,
                Category::HARD,
                Category::EXPERT
            ]
        );
        assert!(categories.has_items(Category::EASY));
        assert!(!categories.has_items(Category::EXPERT));
    }

    #[test]
    fn articulation_puts_hissing_text_in_two_buckets() {
        let categories = build(&["Жук жужжит"], Focus::Articulation);
        assert!(categories.contains(Category::Hissing, 0));
        assert!(categories.contains(Category::MEDIUM, 0));
        assert!(!categories.contains(Category::Sibilant, 0));
    }

    #[test]
    fn articulation_files_sh_text_under_hissing_and_its_band() {
        let categories = build(&["Шла Саша по шоссе и сосала сушку"], Focus::Articulation);
        assert!(categories.contains(Category::Hissing, 0));
        assert!(categories.contains(Category::Sibilant, 0));
        assert!(categories.contains(Category::HARD, 0));
        assert!(!categories.contains(Category::MEDIUM, 0));
    }

    #[test]
    fn articulation_creates_empty_focus_buckets() {
        let categories = build(&["Оса уснула"], Focus::Articulation);
        for category in [
            Category::Hissing,
            Category::Sibilant,
            Category::Sonorant,
            Category::ComplexCombos,
        ] {
            assert!(categories.names().any(|c| c == category));
        }
        assert!(categories.has_items(Category::Sibilant));
        assert_eq!(categories.len_of(Category::Hissing), 0);
    }

    #[test]
    fn complex_combos_needs_more_than_two() {
        let categories = build(
            &[
                "Карл у Клары украл кораллы, а Клара у Карла украла кларнет",
                "Тридцать три корабля лавировали, лавировали, да не вылавировали",
                "На дворе трава, на траве дрова",
            ],
            Focus::Articulation,
        );
        // 4 and 3 combinations qualify, 2 does not
        assert!(categories.contains(Category::ComplexCombos, 0));
        assert!(categories.contains(Category::ComplexCombos, 1));
        assert!(!categories.contains(Category::ComplexCombos, 2));
    }

    #[test]
    fn rhythm_buckets_by_word_count_and_repetition() {
        let categories = build(
            &[
                "Лил Лука лук",
                "Шла Саша по шоссе и сосала сушку",
                "Оса уснула",
            ],
            Focus::Rhythm,
        );
        assert!(categories.contains(Category::Short, 0));
        assert!(categories.contains(Category::Long, 1));
        assert!(!categories.contains(Category::Short, 1));
        // 16 repeats over 26 letters is more than a third
        assert!(categories.contains(Category::Rhythmic, 1));
        // 3 repeats over 9 letters is not
        assert!(!categories.contains(Category::Rhythmic, 2));
    }

    #[test]
    fn breathing_buckets_by_letter_count() {
        let categories = build(
            &[
                "Ехал Грека через реку, видит Грека в реке рак. Сунул Грека руку в реку, рак за руку Греку цап",
                "Бык тупогуб",
                "Карл у Клары украл кораллы, а Клара у Карла украла кларнет",
            ],
            Focus::Breathing,
        );
        assert!(categories.contains(Category::LongPhrases, 0));
        assert!(categories.contains(Category::ShortPhrases, 1));
        assert!(!categories.contains(Category::ShortPhrases, 2));
        assert!(!categories.contains(Category::LongPhrases, 2));
    }

    #[test]
    fn speed_detects_repetition_and_label() {
        let categories = build(
            &[
                "Все скороговорки не перескороговоришь, не перевыскороговоришь",
                "Бык тупогуб",
            ],
            Focus::Speed,
        );
        assert!(categories.contains(Category::TwisterLabeled, 0));
        assert!(categories.contains(Category::Repetitive, 0));
        assert!(!categories.contains(Category::TwisterLabeled, 1));
        assert!(!categories.contains(Category::Repetitive, 1));
    }

    #[test]
    fn stress_has_no_extra_buckets() {
        let categories = build(&["Жук жужжит", "Оса уснула"], Focus::Stress);
        assert_eq!(categories.names().count(), 4);
    }

    #[test]
    fn first_non_empty_follows_category_order() {
        let categories = build(&["Карл у Клары украл кораллы, а Клара у Карла украла кларнет"], Focus::Stress);
        assert_eq!(categories.first_non_empty(), Some(Category::EXPERT));
        assert_eq!(Categories::default().first_non_empty(), None);
    }
}
