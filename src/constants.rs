use once_cell::sync::Lazy;
use std::path::PathBuf;

pub static DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var("NOWORNEVER_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/data"))
});

pub static CONFIG_PATH: Lazy<PathBuf> = Lazy::new(|| DATA_DIR.join("config.yaml"));
pub static DATABASE_PATH: Lazy<PathBuf> = Lazy::new(|| DATA_DIR.join("database.sqlite"));

/// Verifying a password hash is CPU-bound and runs off the async runtime;
/// a verification that exceeds this bound counts as a failed login.
pub const PASSWORD_VERIFY_TIMEOUT_SECS: u64 = 5;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Display name used when a deal's restaurant record cannot be resolved.
pub const UNKNOWN_RESTAURANT: &str = "Unknown Restaurant";
