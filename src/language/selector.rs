use super::{analyzer::ScoredItem, difficulty::DifficultyBand, selection::BandPools};
use crate::error::{Result, TrainerError};
use rand::seq::SliceRandom;
use rand::RngCore;

/// Share of a balanced selection drawn from each band
pub const BALANCED_RATIOS: [f64; 4] = [0.25, 0.30, 0.30, 0.15];

/// Bands trimmed first when the rounded counts overshoot
const TRIM_ORDER: [DifficultyBand; 4] = [
    DifficultyBand::Expert,
    DifficultyBand::Hard,
    DifficultyBand::Medium,
    DifficultyBand::Easy,
];

/// Bands topped up first when the rounded counts fall short
const FILL_ORDER: [DifficultyBand; 4] = [
    DifficultyBand::Medium,
    DifficultyBand::Easy,
    DifficultyBand::Hard,
    DifficultyBand::Expert,
];

/// Trait for the different ways of drawing a training subset
pub trait CorpusSelector {
    fn select(
        &self,
        pools: &BandPools,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ScoredItem>>;
}

/// Uniform sampling from one band, or from the whole corpus when `band` is None
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleBandSelector {
    pub band: Option<DifficultyBand>,
}

impl CorpusSelector for SingleBandSelector {
    fn select(
        &self,
        pools: &BandPools,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ScoredItem>> {
        let pool = match self.band {
            Some(band) => pools.get(band).to_vec(),
            None => pools.all(),
        };

        if pool.is_empty() {
            let label = self.band.map_or("any difficulty", DifficultyBand::name);
            return Err(TrainerError::EmptyPool(label.to_string()));
        }

        Ok(sample(&pool, count, rng))
    }
}

/// Proportional mix of all four bands, interleaved by a final shuffle
#[derive(Debug, Clone, Copy)]
pub struct BalancedSelector {
    pub ratios: [f64; 4],
}

impl Default for BalancedSelector {
    fn default() -> Self {
        Self {
            ratios: BALANCED_RATIOS,
        }
    }
}

impl CorpusSelector for BalancedSelector {
    fn select(
        &self,
        pools: &BandPools,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ScoredItem>> {
        if pools.total() == 0 {
            return Err(TrainerError::EmptyPool("any difficulty".to_string()));
        }

        let counts = balanced_counts(pools.sizes(), count, self.ratios);
        log::debug!("balanced selection counts {counts:?} for {count} requested");

        let mut selected = Vec::with_capacity(counts.iter().sum());
        for band in DifficultyBand::ALL {
            let wanted = counts[band.index()];
            if wanted > 0 {
                selected.extend(sample(pools.get(band), wanted, rng));
            }
        }

        selected.shuffle(rng);
        Ok(selected)
    }
}

/// Draw `count` distinct items uniformly, or the whole pool when it is not larger than `count`
pub fn sample(pool: &[ScoredItem], count: usize, rng: &mut dyn RngCore) -> Vec<ScoredItem> {
    if count >= pool.len() {
        return pool.to_vec();
    }

    let mut shuffled = pool.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(count);
    shuffled
}

/// Per-band counts for a balanced selection of `total` items.
///
/// Counts start as the rounded ratio shares. Overshoot is trimmed one at a
/// time from Expert, Hard, Medium, Easy; shortfall is filled one at a time
/// into Medium, Easy, Hard, Expert wherever a band still has spare items.
/// Each count is then clamped to its pool size, and the slots lost to the
/// clamp are filled again in the same order. The result falls short of
/// `total` only when the pools hold fewer items.
pub fn balanced_counts(pool_sizes: [usize; 4], total: usize, ratios: [f64; 4]) -> [usize; 4] {
    let mut counts = ratios.map(|ratio| (total as f64 * ratio).round() as usize);

    while counts.iter().sum::<usize>() > total {
        match TRIM_ORDER.iter().find(|band| counts[band.index()] > 0) {
            Some(band) => counts[band.index()] -= 1,
            None => break,
        }
    }

    fill_shortfall(&mut counts, pool_sizes, total);

    for band in DifficultyBand::ALL {
        counts[band.index()] = counts[band.index()].min(pool_sizes[band.index()]);
    }

    fill_shortfall(&mut counts, pool_sizes, total);

    counts
}

fn fill_shortfall(counts: &mut [usize; 4], pool_sizes: [usize; 4], total: usize) {
    while counts.iter().sum::<usize>() < total {
        match FILL_ORDER
            .iter()
            .find(|band| pool_sizes[band.index()] > counts[band.index()])
        {
            Some(band) => counts[band.index()] += 1,
            None => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::TextItem;
    use crate::language::TextStatistics;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn item(number: usize, score: f64) -> ScoredItem {
        ScoredItem {
            item: TextItem {
                number: number.to_string(),
                date: String::new(),
                text: format!("text {number}"),
            },
            stats: TextStatistics::default(),
            score,
        }
    }

    fn pools_with(sizes: [usize; 4]) -> BandPools {
        let scores = [5.0, 15.0, 25.0, 35.0];
        let mut items = Vec::new();
        let mut number = 0;
        for (band, &size) in sizes.iter().enumerate() {
            for _ in 0..size {
                items.push(item(number, scores[band]));
                number += 1;
            }
        }
        BandPools::from_items(&items)
    }

    #[test]
    fn balanced_counts_for_ten() {
        // 2.5, 3, 3, 1.5 round to 3, 3, 3, 2 and Expert gives one back
        let counts = balanced_counts([10; 4], 10, BALANCED_RATIOS);
        assert_eq!(counts, [3, 3, 3, 1]);
        assert_eq!(counts.iter().sum::<usize>(), 10);
    }

    #[test]
    fn balanced_counts_fill_medium_first() {
        // 0.25, 0.3, 0.3, 0.15 all round to 0
        let counts = balanced_counts([10; 4], 1, BALANCED_RATIOS);
        assert_eq!(counts, [0, 1, 0, 0]);
    }

    #[test]
    fn balanced_counts_skip_exhausted_bands() {
        let counts = balanced_counts([5, 0, 5, 5], 1, BALANCED_RATIOS);
        assert_eq!(counts, [1, 0, 0, 0]);
    }

    #[test]
    fn balanced_counts_clamp_to_pool_sizes() {
        let counts = balanced_counts([1, 1, 1, 1], 20, BALANCED_RATIOS);
        assert_eq!(counts, [1, 1, 1, 1]);
    }

    #[test]
    fn balanced_counts_move_clamped_slots_to_bands_with_spare_items() {
        // 3, 3, 3, 1 clamps to 0, 0, 0, 1; the nine lost slots go to Expert
        assert_eq!(balanced_counts([0, 0, 0, 10], 10, BALANCED_RATIOS), [0, 0, 0, 10]);
        // Easy keeps its 3, Medium and Hard clamp to 1, the rest spills to Easy then Expert
        assert_eq!(balanced_counts([4, 1, 1, 10], 10, BALANCED_RATIOS), [4, 1, 1, 4]);
    }

    #[test]
    fn balanced_counts_reach_total_whenever_the_corpus_allows() {
        let shapes = [[0, 0, 0, 10], [10, 0, 0, 0], [2, 7, 0, 1], [1, 1, 1, 9], [0, 3, 3, 0]];
        for sizes in shapes {
            let available: usize = sizes.iter().sum();
            for total in 0..=available + 3 {
                let counts = balanced_counts(sizes, total, BALANCED_RATIOS);
                assert_eq!(
                    counts.iter().sum::<usize>(),
                    total.min(available),
                    "{sizes:?} {total}"
                );
                assert!(counts.iter().zip(sizes).all(|(&c, s)| c <= s));
            }
        }
    }

    #[test]
    fn balanced_counts_always_sum_to_total_when_pools_are_large() {
        for total in 0..60 {
            let counts = balanced_counts([100; 4], total, BALANCED_RATIOS);
            assert_eq!(counts.iter().sum::<usize>(), total, "total {total}");
        }
    }

    #[test]
    fn balanced_selection_returns_requested_count() {
        let pools = pools_with([10, 10, 10, 10]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let selected = BalancedSelector::default()
            .select(&pools, 10, &mut rng)
            .unwrap();

        assert_eq!(selected.len(), 10);
        let mut per_band = [0; 4];
        for s in &selected {
            per_band[s.band().index()] += 1;
        }
        assert_eq!(per_band, [3, 3, 3, 1]);

        let distinct: HashSet<_> = selected.iter().map(|s| s.item.number.clone()).collect();
        assert_eq!(distinct.len(), 10);
    }

    #[test]
    fn balanced_selection_returns_less_when_corpus_is_small() {
        let pools = pools_with([1, 2, 0, 1]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let selected = BalancedSelector::default()
            .select(&pools, 10, &mut rng)
            .unwrap();
        assert_eq!(selected.len(), 4);
    }

    #[test]
    fn balanced_selection_fills_from_a_single_band_corpus() {
        let pools = pools_with([0, 0, 0, 10]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let selected = BalancedSelector::default()
            .select(&pools, 10, &mut rng)
            .unwrap();

        assert_eq!(selected.len(), 10);
        assert!(selected.iter().all(|s| s.band() == DifficultyBand::Expert));
        let distinct: HashSet<_> = selected.iter().map(|s| s.item.number.clone()).collect();
        assert_eq!(distinct.len(), 10);
    }

    #[test]
    fn balanced_selection_rejects_empty_corpus() {
        let pools = pools_with([0, 0, 0, 0]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(BalancedSelector::default()
            .select(&pools, 5, &mut rng)
            .is_err());
    }

    #[test]
    fn single_band_returns_whole_pool_when_count_is_large() {
        let pools = pools_with([0, 4, 0, 0]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let selector = SingleBandSelector {
            band: Some(DifficultyBand::Medium),
        };
        let selected = selector.select(&pools, 10, &mut rng).unwrap();
        assert_eq!(selected, pools.get(DifficultyBand::Medium).to_vec());
    }

    #[test]
    fn single_band_samples_distinct_members() {
        let pools = pools_with([8, 0, 0, 0]);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let selector = SingleBandSelector {
            band: Some(DifficultyBand::Easy),
        };
        let selected = selector.select(&pools, 3, &mut rng).unwrap();

        assert_eq!(selected.len(), 3);
        let pool = pools.get(DifficultyBand::Easy);
        assert!(selected.iter().all(|s| pool.contains(s)));
        let distinct: HashSet<_> = selected.iter().map(|s| s.item.number.clone()).collect();
        assert_eq!(distinct.len(), 3);
    }

    #[test]
    fn single_band_reports_empty_pool() {
        let pools = pools_with([3, 0, 0, 0]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let selector = SingleBandSelector {
            band: Some(DifficultyBand::Expert),
        };
        assert!(matches!(
            selector.select(&pools, 2, &mut rng),
            Err(TrainerError::EmptyPool(_))
        ));
    }

    #[test]
    fn same_seed_gives_same_sample() {
        let pools = pools_with([20, 0, 0, 0]);
        let selector = SingleBandSelector::default();
        let first = selector
            .select(&pools, 5, &mut ChaCha8Rng::seed_from_u64(42))
            .unwrap();
        let second = selector
            .select(&pools, 5, &mut ChaCha8Rng::seed_from_u64(42))
            .unwrap();
        assert_eq!(first, second);
    }
}
