use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("twistr"),
            )
        } else {
            ProjectDirs::from("", "", "twistr").map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    /// Where the terminal app writes its log
    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("twistr.log"))
    }
}
