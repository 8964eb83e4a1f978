use super::{
    analyzer::ScoredItem,
    difficulty::DifficultyBand,
    selector::{BalancedSelector, CorpusSelector, SingleBandSelector},
};
use crate::corpus::ScoredCorpus;
use crate::error::Result;
use clap::ValueEnum;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Which part of the corpus a training subset is drawn from
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BandFilter {
    Easy,
    Medium,
    Hard,
    Expert,
    #[default]
    All,
}

impl BandFilter {
    pub fn band(self) -> Option<DifficultyBand> {
        match self {
            BandFilter::Easy => Some(DifficultyBand::Easy),
            BandFilter::Medium => Some(DifficultyBand::Medium),
            BandFilter::Hard => Some(DifficultyBand::Hard),
            BandFilter::Expert => Some(DifficultyBand::Expert),
            BandFilter::All => None,
        }
    }
}

/// The scored corpus split into one pool per band
#[derive(Debug, Clone, Default)]
pub struct BandPools {
    pools: [Vec<ScoredItem>; 4],
}

impl BandPools {
    pub fn from_items(items: &[ScoredItem]) -> Self {
        let mut pools: [Vec<ScoredItem>; 4] = Default::default();
        for item in items {
            pools[item.band().index()].push(item.clone());
        }
        Self { pools }
    }

    pub fn get(&self, band: DifficultyBand) -> &[ScoredItem] {
        &self.pools[band.index()]
    }

    /// Every item, in band order
    pub fn all(&self) -> Vec<ScoredItem> {
        self.pools.iter().flatten().cloned().collect()
    }

    pub fn sizes(&self) -> [usize; 4] {
        [0, 1, 2, 3].map(|i| self.pools[i].len())
    }

    pub fn total(&self) -> usize {
        self.pools.iter().map(Vec::len).sum()
    }
}

impl From<&ScoredCorpus> for BandPools {
    fn from(corpus: &ScoredCorpus) -> Self {
        BandPools::from_items(corpus.items())
    }
}

/// Draw the training subset for a session.
///
/// A balanced mix is only used when no single band was requested; a zero
/// count is raised to one.
pub fn select_corpus(
    corpus: &ScoredCorpus,
    filter: BandFilter,
    count: usize,
    balanced: bool,
    rng: &mut dyn RngCore,
) -> Result<Vec<ScoredItem>> {
    let count = if count == 0 {
        log::warn!("selection count 0 is out of range, using 1");
        1
    } else {
        count
    };

    let pools = BandPools::from(corpus);
    let selector: Box<dyn CorpusSelector> = if balanced && filter == BandFilter::All {
        Box::new(BalancedSelector::default())
    } else {
        Box::new(SingleBandSelector {
            band: filter.band(),
        })
    };

    let selected = selector.select(&pools, count, rng)?;
    log::info!(
        "selected {} of {} tongue twisters ({filter}, balanced: {balanced})",
        selected.len(),
        corpus.len()
    );
    Ok(selected)
}
