use crate::error::{Result, TrainerError};
use crate::language::{ScoredItem, TextAnalyzer};
use include_dir::{include_dir, Dir};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

static DATA_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/data");

const SAMPLE_FILE: &str = "sample_twisters.json";

/// Locations tried, in order, when the configured dataset path does not exist
pub const FALLBACK_PATHS: [&str; 3] = [
    "all_twisters.json",
    "../tongue_twisters/all_twisters.json",
    "../../tongue_twisters/all_twisters.json",
];

/// One tongue twister as stored in the scraped dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextItem {
    pub number: String,
    pub date: String,
    pub text: String,
}

pub trait CorpusSource {
    fn load(&self) -> Result<Vec<TextItem>>;
}

/// Reads the dataset from disk, falling back to well known locations
#[derive(Debug, Clone)]
pub struct FileCorpusSource {
    path: PathBuf,
    fallbacks: Vec<PathBuf>,
}

impl FileCorpusSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            fallbacks: FALLBACK_PATHS.iter().map(PathBuf::from).collect(),
        }
    }

    pub fn with_fallbacks<P: AsRef<Path>>(path: P, fallbacks: Vec<PathBuf>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            fallbacks,
        }
    }

    fn candidates(&self) -> impl Iterator<Item = &PathBuf> {
        std::iter::once(&self.path).chain(self.fallbacks.iter())
    }
}

impl CorpusSource for FileCorpusSource {
    fn load(&self) -> Result<Vec<TextItem>> {
        for candidate in self.candidates() {
            match fs::read(candidate) {
                Ok(bytes) => {
                    let items: Vec<TextItem> = serde_json::from_slice(&bytes)?;
                    log::info!(
                        "loaded {} tongue twisters from {}",
                        items.len(),
                        candidate.display()
                    );
                    return Ok(items);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    log::debug!("no dataset at {}", candidate.display());
                }
                Err(source) => {
                    return Err(TrainerError::Io {
                        path: candidate.clone(),
                        source,
                    })
                }
            }
        }

        Err(TrainerError::DatasetUnavailable {
            searched: self.candidates().map(|p| p.display().to_string()).join(", "),
        })
    }
}

/// The small dataset compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedCorpusSource;

impl CorpusSource for EmbeddedCorpusSource {
    fn load(&self) -> Result<Vec<TextItem>> {
        let contents = DATA_DIR
            .get_file(SAMPLE_FILE)
            .and_then(|file| file.contents_utf8())
            .ok_or_else(|| TrainerError::DatasetUnavailable {
                searched: format!("<embedded>/{SAMPLE_FILE}"),
            })?;

        Ok(serde_json::from_str(contents)?)
    }
}

/// Every loaded item analysed once, ordered by ascending score
#[derive(Debug, Clone, Default)]
pub struct ScoredCorpus {
    items: Vec<ScoredItem>,
}

impl ScoredCorpus {
    pub fn analyze(items: Vec<TextItem>, analyzer: &TextAnalyzer) -> Self {
        let mut items: Vec<ScoredItem> = items
            .into_iter()
            .map(|item| analyzer.analyze_item(item))
            .collect();
        items.sort_by(|a, b| a.score.total_cmp(&b.score));
        Self { items }
    }

    pub fn items(&self) -> &[ScoredItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items per band, indexed by `DifficultyBand::index`
    pub fn band_counts(&self) -> [usize; 4] {
        let mut counts = [0; 4];
        for item in &self.items {
            counts[item.band().index()] += 1;
        }
        counts
    }
}
