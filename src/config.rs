use crate::drill::TrainingMode;
use crate::focus::Focus;
use crate::language::BandFilter;
use crate::session::{MAX_LEVEL, MIN_LEVEL};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATASET: &str = "tongue_twisters/all_twisters.json";

/// Stored training preferences; missing fields take their defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub json: PathBuf,
    pub count: usize,
    pub difficulty: BandFilter,
    pub mode: TrainingMode,
    pub time: u64,
    pub reps: u32,
    pub focus: Focus,
    pub level: u8,
    pub mix: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            json: PathBuf::from(DEFAULT_DATASET),
            count: 5,
            difficulty: BandFilter::All,
            mode: TrainingMode::Standard,
            time: 30,
            reps: 3,
            focus: Focus::Articulation,
            level: 3,
            mix: true,
        }
    }
}

impl Config {
    /// Clamp out-of-range values to the nearest valid one
    pub fn sanitized(mut self) -> Self {
        let level = self.level.clamp(MIN_LEVEL, MAX_LEVEL);
        if level != self.level {
            log::warn!("level {} is out of range, using {level}", self.level);
            self.level = level;
        }
        if self.count == 0 {
            log::warn!("count 0 is out of range, using 1");
            self.count = 1;
        }
        if self.time == 0 {
            log::warn!("time 0 is out of range, using 1");
            self.time = 1;
        }
        if self.reps == 0 {
            log::warn!("reps 0 is out of range, using 1");
            self.reps = 1;
        }
        self
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "twistr") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("twistr_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("ignoring unreadable config {}: {err}", self.path.display());
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            json: PathBuf::from("/data/twisters.json"),
            count: 12,
            difficulty: BandFilter::Hard,
            mode: TrainingMode::Perfection,
            time: 45,
            reps: 5,
            focus: Focus::Breathing,
            level: 4,
            mix: false,
        };
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"focus": "speed", "difficulty": "easy"}"#).unwrap();
        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.focus, Focus::Speed);
        assert_eq!(cfg.difficulty, BandFilter::Easy);
        assert_eq!(cfg.count, 5);
        assert!(cfg.mix);
    }

    #[test]
    fn sanitized_clamps_to_valid_range() {
        let cfg = Config {
            level: 9,
            count: 0,
            time: 0,
            reps: 0,
            ..Config::default()
        }
        .sanitized();
        assert_eq!(cfg.level, 5);
        assert_eq!(cfg.count, 1);
        assert_eq!(cfg.time, 1);
        assert_eq!(cfg.reps, 1);

        let cfg = Config {
            level: 0,
            ..Config::default()
        }
        .sanitized();
        assert_eq!(cfg.level, 1);
    }
}
