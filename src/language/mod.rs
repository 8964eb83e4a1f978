pub mod analyzer;
pub mod categorizer;
pub mod difficulty;
pub mod selection;
pub mod selector;
pub mod tables;

// Re-export the main types for convenience
pub use analyzer::{ScoredItem, TextAnalyzer, TextStatistics};
pub use categorizer::{categorize, Categories, Category};
pub use difficulty::{classify, DifficultyBand};
pub use selection::{select_corpus, BandFilter, BandPools};
pub use selector::{BalancedSelector, CorpusSelector, SingleBandSelector};
pub use tables::PhoneticTables;
