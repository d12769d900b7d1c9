//! Runtime configuration.

use std::env;
use std::path::PathBuf;

/// Environment variable naming the database file.
pub const DB_PATH_ENV: &str = "PHYSIO_DESK_DB";

/// Database file used when nothing else is configured.
pub const DEFAULT_DB_FILE: &str = "physio_desk.db";

/// Process configuration. The only external surface is the database
/// location; the shared access key is seeded data, not configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
}

impl Config {
    /// Read configuration from the environment, falling back to the
    /// default database file in the working directory.
    pub fn from_env() -> Self {
        let database_path = env::var(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_FILE));
        Self { database_path }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DB_FILE),
        }
    }
}
