use serde::{Deserialize, Serialize};

/// Ordinal difficulty class of a scored text
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
pub enum DifficultyBand {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl DifficultyBand {
    pub const ALL: [DifficultyBand; 4] = [
        DifficultyBand::Easy,
        DifficultyBand::Medium,
        DifficultyBand::Hard,
        DifficultyBand::Expert,
    ];

    /// Step function over the thresholds 10, 20 and 30
    pub fn classify(score: f64) -> Self {
        if score < 10.0 {
            DifficultyBand::Easy
        } else if score < 20.0 {
            DifficultyBand::Medium
        } else if score < 30.0 {
            DifficultyBand::Hard
        } else {
            DifficultyBand::Expert
        }
    }

    /// Band a session should lean on at a given progress through its rounds
    pub fn for_progress(progress: f64) -> Self {
        if progress < 0.3 {
            DifficultyBand::Easy
        } else if progress < 0.6 {
            DifficultyBand::Medium
        } else if progress < 0.9 {
            DifficultyBand::Hard
        } else {
            DifficultyBand::Expert
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            DifficultyBand::Easy => "easy",
            DifficultyBand::Medium => "medium",
            DifficultyBand::Hard => "hard",
            DifficultyBand::Expert => "expert",
        }
    }
}

pub fn classify(score: f64) -> DifficultyBand {
    DifficultyBand::classify(score)
}
