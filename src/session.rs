use crate::error::{Result, TrainerError};
use crate::focus::{DisplayField, Focus, FocusStrategy};
use crate::language::{Categories, Category, DifficultyBand, ScoredItem, TextAnalyzer};
use crate::util::{mean, std_dev};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use std::collections::BTreeMap;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 5;

/// Running rating a category starts from on first touch
const SEED_RATING: f64 = 3.0;
const KEEP_WEIGHT: f64 = 0.7;
const NEW_WEIGHT: f64 = 0.3;

/// Categories rated below this are reported as weakest
const WEAK_THRESHOLD: f64 = 3.5;

const MIN_TARGET: f64 = 1.0;
const MAX_TARGET: f64 = 5.0;

/// Clamp a raw rating into 1..=5
pub fn clamp_rating(raw: i64) -> u8 {
    let rating = raw.clamp(1, 5);
    if rating != raw {
        log::warn!("rating {raw} is out of range, using {rating}");
    }
    rating as u8
}

fn clamp_level(level: u8) -> u8 {
    let clamped = level.clamp(MIN_LEVEL, MAX_LEVEL);
    if clamped != level {
        log::warn!("perfection level {level} is out of range, using {clamped}");
    }
    clamped
}

/// Progression multiplier for a rating
fn rating_multiplier(rating: u8) -> f64 {
    match rating {
        1 => 0.8,
        2 => 0.9,
        3 => 1.0,
        4 => 1.1,
        _ => 1.2,
    }
}

pub fn rating_message(rating: u8) -> &'static str {
    match rating {
        1 | 2 => "Don't worry! Try it more slowly, or split it into parts.",
        3 => "Good! Keep working on it.",
        4 => "Excellent! Nearly perfect, now try it a little faster.",
        _ => "Superb! You have mastered this one.",
    }
}

/// Per-session running performance, keyed by category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceProfile {
    category_ratings: BTreeMap<Category, f64>,
    ratings: Vec<u8>,
    average: f64,
}

impl PerformanceProfile {
    pub fn record(&mut self, rating: u8, categories: &[Category]) {
        self.ratings.push(rating);
        for &category in categories {
            let running = self
                .category_ratings
                .entry(category)
                .or_insert(SEED_RATING);
            *running = *running * KEEP_WEIGHT + rating as f64 * NEW_WEIGHT;
        }
        self.average = mean(&self.ratings).unwrap_or_default();
    }

    pub fn ratings(&self) -> &[u8] {
        &self.ratings
    }

    pub fn average(&self) -> f64 {
        self.average
    }

    pub fn rating_for(&self, category: Category) -> Option<f64> {
        self.category_ratings.get(&category).copied()
    }

    pub fn category_ratings(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.category_ratings.iter().map(|(&c, &r)| (c, r))
    }

    /// Lowest-rated tracked category, if it is below the weak threshold
    pub fn weakest(&self) -> Option<(Category, f64)> {
        self.category_ratings()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .filter(|&(_, rating)| rating < WEAK_THRESHOLD)
    }
}

/// Per-round target difficulty, nudged by every rating but the last
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyProgression {
    values: Vec<f64>,
}

impl DifficultyProgression {
    pub fn generate(level: u8, rounds: usize, rng: &mut dyn RngCore) -> Self {
        let max_difficulty = (level as f64 * 1.5).max(1.0);
        let step = if rounds > 1 {
            (max_difficulty - 1.0) / (rounds - 1) as f64
        } else {
            0.0
        };

        let values = (0..rounds)
            .map(|i| {
                let jitter = rng.gen_range(0.9..=1.1);
                ((1.0 + i as f64 * step) * jitter).clamp(MIN_TARGET, MAX_TARGET)
            })
            .collect();

        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Target for a 1-based round
    pub fn target(&self, round: usize) -> Option<f64> {
        round.checked_sub(1).and_then(|i| self.values.get(i)).copied()
    }

    /// Scale every slot after `completed_round` by the rating's multiplier
    pub fn adjust(&mut self, completed_round: usize, rating: u8) {
        let multiplier = rating_multiplier(rating);
        for value in self.values.iter_mut().skip(completed_round) {
            *value = (*value * multiplier).clamp(MIN_TARGET, MAX_TARGET);
        }
    }
}

/// Everything shown for one round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundPrompt {
    pub round: usize,
    pub total_rounds: usize,
    pub item: ScoredItem,
    pub category: Category,
    pub target_difficulty: f64,
    pub fields: Vec<DisplayField>,
    pub advice: Vec<String>,
}

impl RoundPrompt {
    pub fn band(&self) -> DifficultyBand {
        self.item.band()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundFeedback {
    pub round: usize,
    pub rating: u8,
    pub message: &'static str,
    pub tip: Option<&'static str>,
    pub average: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SkillStatus {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillStatus {
    pub fn from_average(average: f64) -> Self {
        if average < 2.5 {
            SkillStatus::Beginner
        } else if average < 3.5 {
            SkillStatus::Intermediate
        } else if average < 4.5 {
            SkillStatus::Advanced
        } else {
            SkillStatus::Expert
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub focus: Focus,
    pub rounds: usize,
    pub average: f64,
    pub std_dev: f64,
    pub weakest: Option<(Category, f64)>,
    pub status: SkillStatus,
    pub next_focus: Focus,
    pub closing_tip: &'static str,
    pub category_ratings: Vec<(Category, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    pub prompt: RoundPrompt,
    pub feedback: RoundFeedback,
}

/// Multi-round perfection session over a categorized training subset.
///
/// Rounds alternate strictly between `next_round` and `submit_rating`.
pub struct AdaptiveSession {
    strategy: Box<dyn FocusStrategy>,
    analyzer: TextAnalyzer,
    categories: Categories,
    level: u8,
    total_rounds: usize,
    round: usize,
    pending: Option<RoundPrompt>,
    progression: DifficultyProgression,
    profile: PerformanceProfile,
}

impl AdaptiveSession {
    pub fn new(
        items: Vec<ScoredItem>,
        focus: Focus,
        level: u8,
        analyzer: TextAnalyzer,
        rng: &mut dyn RngCore,
    ) -> Result<Self> {
        if items.is_empty() {
            return Err(TrainerError::EmptyPool(format!("{focus} session")));
        }

        let level = clamp_level(level);
        let total_rounds = level as usize + 2;
        let strategy = focus.strategy();
        let categories = Categories::build(items, strategy.as_ref(), analyzer.tables());
        let progression = DifficultyProgression::generate(level, total_rounds, rng);

        log::info!(
            "perfection session: focus {focus}, level {level}, {total_rounds} rounds over {} items",
            categories.items().len()
        );
        log::debug!("initial progression {:?}", progression.values());

        Ok(Self {
            strategy,
            analyzer,
            categories,
            level,
            total_rounds,
            round: 0,
            pending: None,
            progression,
            profile: PerformanceProfile::default(),
        })
    }

    pub fn focus(&self) -> Focus {
        self.strategy.focus()
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn total_rounds(&self) -> usize {
        self.total_rounds
    }

    /// Rounds presented so far
    pub fn round(&self) -> usize {
        self.round
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    pub fn progression(&self) -> &DifficultyProgression {
        &self.progression
    }

    pub fn profile(&self) -> &PerformanceProfile {
        &self.profile
    }

    pub fn pending(&self) -> Option<&RoundPrompt> {
        self.pending.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.round >= self.total_rounds && self.pending.is_none()
    }

    fn progress(&self, round: usize) -> f64 {
        if self.total_rounds <= 1 {
            0.0
        } else {
            (round - 1) as f64 / (self.total_rounds - 1) as f64
        }
    }

    fn pick_category(&self, round: usize, rng: &mut dyn RngCore) -> Option<Category> {
        if round == 1 && self.categories.has_items(Category::EASY) {
            return Some(Category::EASY);
        }
        if round == self.total_rounds && self.categories.has_items(Category::EXPERT) {
            return Some(Category::EXPERT);
        }

        let progress = self.progress(round);
        let candidates: Vec<Category> = self
            .strategy
            .tier_menu(progress)
            .iter()
            .copied()
            .filter(|&c| self.categories.has_items(c))
            .collect();
        if let Some(&category) = candidates.choose(rng) {
            return Some(category);
        }

        let band = Category::Band(DifficultyBand::for_progress(progress));
        if self.categories.has_items(band) {
            return Some(band);
        }

        self.categories.first_non_empty()
    }

    /// Present the next round, or the same one again while it awaits a rating
    pub fn next_round(&mut self, rng: &mut dyn RngCore) -> Option<RoundPrompt> {
        if let Some(pending) = &self.pending {
            return Some(pending.clone());
        }
        if self.round >= self.total_rounds {
            return None;
        }

        let round = self.round + 1;
        let category = self.pick_category(round, rng)?;
        let &idx = self.categories.indices(category).choose(rng)?;
        let item = self.categories.item(idx).clone();
        log::debug!(
            "round {round}: picked #{} from {category} (score {:.2})",
            item.item.number,
            item.score
        );

        let prompt = RoundPrompt {
            round,
            total_rounds: self.total_rounds,
            category,
            target_difficulty: self.progression.target(round).unwrap_or(MIN_TARGET),
            fields: self.strategy.display_fields(&item, &self.analyzer),
            advice: self
                .strategy
                .advice(&item, &self.analyzer, round, self.total_rounds),
            item,
        };

        self.round = round;
        self.pending = Some(prompt.clone());
        Some(prompt)
    }

    pub fn submit_rating(&mut self, raw: i64) -> Result<RoundFeedback> {
        let prompt = self.pending.take().ok_or(TrainerError::NoPendingRound)?;
        let rating = clamp_rating(raw);

        let mut tracked = vec![Category::Band(prompt.item.band())];
        tracked.extend(
            self.strategy
                .tracked_categories(&prompt.item, self.analyzer.tables()),
        );
        self.profile.record(rating, &tracked);

        if prompt.round < self.total_rounds {
            self.progression.adjust(prompt.round, rating);
            log::debug!("progression after rating {rating}: {:?}", self.progression.values());
        }

        let tip = if rating < 4 {
            self.strategy.feedback_tip(&prompt.item)
        } else {
            None
        };

        Ok(RoundFeedback {
            round: prompt.round,
            rating,
            message: rating_message(rating),
            tip,
            average: self.profile.average(),
        })
    }

    pub fn summary(&self) -> SessionSummary {
        let average = self.profile.average();
        let focus = self.focus();
        SessionSummary {
            focus,
            rounds: self.profile.ratings().len(),
            average,
            std_dev: std_dev(self.profile.ratings()).unwrap_or_default(),
            weakest: self.profile.weakest(),
            status: SkillStatus::from_average(average),
            next_focus: focus.next(),
            closing_tip: self.strategy.closing_tip(),
            category_ratings: self.profile.category_ratings().collect(),
        }
    }

    /// Drive every remaining round, asking `respond` for each rating
    pub fn run<F>(
        &mut self,
        rng: &mut dyn RngCore,
        mut respond: F,
    ) -> Result<(Vec<RoundOutcome>, SessionSummary)>
    where
        F: FnMut(&RoundPrompt) -> i64,
    {
        let mut outcomes = Vec::with_capacity(self.total_rounds);
        while let Some(prompt) = self.next_round(rng) {
            let feedback = self.submit_rating(respond(&prompt))?;
            outcomes.push(RoundOutcome { prompt, feedback });
        }

        let summary = self.summary();
        log::info!(
            "perfection session finished: average {:.2}, status {}",
            summary.average,
            summary.status
        );
        Ok((outcomes, summary))
    }
}

/// Build and run a whole session in one call
pub fn run_session<F>(
    items: Vec<ScoredItem>,
    focus: Focus,
    level: u8,
    analyzer: TextAnalyzer,
    rng: &mut dyn RngCore,
    respond: F,
) -> Result<(Vec<RoundOutcome>, SessionSummary)>
where
    F: FnMut(&RoundPrompt) -> i64,
{
    AdaptiveSession::new(items, focus, level, analyzer, rng)?.run(rng, respond)
}
