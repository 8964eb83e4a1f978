use crate::error::{Result, TrainerError};
use crate::language::ScoredItem;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How a training subset is worked through
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TrainingMode {
    #[default]
    Standard,
    Timed,
    Repeat,
    Challenge,
    /// Adaptive multi-round session
    Perfection,
}

impl TrainingMode {
    pub fn description(self) -> &'static str {
        match self {
            TrainingMode::Standard => "Read each tongue twister at your own pace",
            TrainingMode::Timed => "Repeat the twister as often as you can before time runs out",
            TrainingMode::Repeat => "Say each twister a fixed number of times",
            TrainingMode::Challenge => "Say each twister at four increasing speeds",
            TrainingMode::Perfection => "Adaptive rounds that follow your self-ratings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ChallengeSpeed {
    Slow,
    Medium,
    Fast,
    #[strum(serialize = "Very fast")]
    VeryFast,
}

impl ChallengeSpeed {
    pub fn next(self) -> Option<Self> {
        match self {
            ChallengeSpeed::Slow => Some(ChallengeSpeed::Medium),
            ChallengeSpeed::Medium => Some(ChallengeSpeed::Fast),
            ChallengeSpeed::Fast => Some(ChallengeSpeed::VeryFast),
            ChallengeSpeed::VeryFast => None,
        }
    }

    pub fn instruction(self) -> &'static str {
        match self {
            ChallengeSpeed::Slow => "Say it slowly, sounding out every letter",
            ChallengeSpeed::Medium => "Say it at a normal speaking pace",
            ChallengeSpeed::Fast => "Say it quickly but clearly",
            ChallengeSpeed::VeryFast => "Say it as fast as you can",
        }
    }
}

/// Where the current item is within its routine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrillStep {
    /// Standard mode: the item is on screen
    Reading,
    /// Waiting for the first Advance of a timed, repeat or challenge item
    Ready,
    Countdown { remaining: f64 },
    /// `done` of `total` repetitions finished
    Repetition { done: u32, total: u32 },
    Speed(ChallengeSpeed),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillProgress {
    Stayed,
    NextItem,
    Finished,
}

/// Fixed routine over a training subset; every item is shown once, in order
#[derive(Debug, Clone)]
pub struct DrillSession {
    items: Vec<ScoredItem>,
    mode: TrainingMode,
    time_secs: u64,
    reps: u32,
    index: usize,
    step: DrillStep,
    finished: bool,
}

impl DrillSession {
    pub fn new(items: Vec<ScoredItem>, mode: TrainingMode, time_secs: u64, reps: u32) -> Result<Self> {
        if items.is_empty() {
            return Err(TrainerError::EmptyPool(format!("{mode} drill")));
        }
        let mode = if mode == TrainingMode::Perfection {
            log::warn!("perfection mode is not a fixed drill, running standard");
            TrainingMode::Standard
        } else {
            mode
        };

        log::info!("{mode} drill over {} items", items.len());
        Ok(Self {
            items,
            mode,
            time_secs: time_secs.max(1),
            reps: reps.max(1),
            index: 0,
            step: Self::initial_step(mode),
            finished: false,
        })
    }

    fn initial_step(mode: TrainingMode) -> DrillStep {
        match mode {
            TrainingMode::Standard | TrainingMode::Perfection => DrillStep::Reading,
            _ => DrillStep::Ready,
        }
    }

    pub fn mode(&self) -> TrainingMode {
        self.mode
    }

    pub fn step(&self) -> DrillStep {
        self.step
    }

    pub fn items(&self) -> &[ScoredItem] {
        &self.items
    }

    pub fn current(&self) -> Option<&ScoredItem> {
        if self.finished {
            None
        } else {
            self.items.get(self.index)
        }
    }

    /// 1-based position of the current item and the subset size
    pub fn position(&self) -> (usize, usize) {
        ((self.index + 1).min(self.items.len()), self.items.len())
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn next_item(&mut self) -> DrillProgress {
        self.index += 1;
        if self.index >= self.items.len() {
            self.finished = true;
            log::info!("{} drill finished", self.mode);
            DrillProgress::Finished
        } else {
            self.step = Self::initial_step(self.mode);
            DrillProgress::NextItem
        }
    }

    /// The user pressed Enter
    pub fn advance(&mut self) -> DrillProgress {
        if self.finished {
            return DrillProgress::Finished;
        }

        match (self.mode, self.step) {
            (TrainingMode::Timed, DrillStep::Ready) => {
                self.step = DrillStep::Countdown {
                    remaining: self.time_secs as f64,
                };
                DrillProgress::Stayed
            }
            (TrainingMode::Repeat, DrillStep::Ready) => {
                self.step = DrillStep::Repetition {
                    done: 0,
                    total: self.reps,
                };
                DrillProgress::Stayed
            }
            (TrainingMode::Repeat, DrillStep::Repetition { done, total }) if done + 1 < total => {
                self.step = DrillStep::Repetition {
                    done: done + 1,
                    total,
                };
                DrillProgress::Stayed
            }
            (TrainingMode::Challenge, DrillStep::Ready) => {
                self.step = DrillStep::Speed(ChallengeSpeed::Slow);
                DrillProgress::Stayed
            }
            (TrainingMode::Challenge, DrillStep::Speed(speed)) => match speed.next() {
                Some(next) => {
                    self.step = DrillStep::Speed(next);
                    DrillProgress::Stayed
                }
                None => self.next_item(),
            },
            _ => self.next_item(),
        }
    }

    /// Time passes; only a running countdown cares
    pub fn on_tick(&mut self, elapsed_secs: f64) -> DrillProgress {
        match self.step {
            DrillStep::Countdown { remaining } if !self.finished => {
                let remaining = remaining - elapsed_secs;
                if remaining <= 0.0 {
                    self.next_item()
                } else {
                    self.step = DrillStep::Countdown { remaining };
                    DrillProgress::Stayed
                }
            }
            _ if self.finished => DrillProgress::Finished,
            _ => DrillProgress::Stayed,
        }
    }
}
