// Library surface for the terminal app and the integration tests.
// Presentation lives in the binary; everything here is headless.
pub mod app_dirs;
pub mod config;
pub mod corpus;
pub mod drill;
pub mod error;
pub mod focus;
pub mod language;
pub mod runtime;
pub mod session;
pub mod util;

pub use error::{Result, TrainerError};
