//! Environment-variable helpers shared by service configs.

use std::path::PathBuf;
use std::str::FromStr;

/// Load a `.env` file from the working directory or its parents, returning
/// the path that was read.
///
/// Real environment variables always win over values from the file. Runs
/// before tracing is installed so `RUST_LOG` may come from the file.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenv::dotenv().ok()
}

/// Read a required variable.
///
/// # Panics
///
/// Panics with the variable name if it is unset or empty.
pub fn require(key: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => panic!("{key} must be set"),
    }
}

/// Read an optional variable, treating an empty value as unset.
pub fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Read and parse an optional variable, falling back to `default` when unset
/// or unparsable.
pub fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    parse_value(std::env::var(key).ok().as_deref(), default)
}

fn parse_value<T: FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
