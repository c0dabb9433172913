//! Loading of formatter and linter rules files.
//!
//! A rules file is a JSON object whose `rules` member holds the settings:
//!
//! ```json
//! { "rules": { "spacesBeforeColon": 0, "spacesAfterColon": 1 } }
//! ```

use std::path::Path;

use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ConfigError;

#[derive(Deserialize)]
struct RulesFile<T> {
    rules: T,
}

pub(crate) fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, ConfigError> {
    let file: RulesFile<T> = serde_json::from_str(json)?;
    Ok(file.rules)
}

pub(crate) fn from_path<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::RulesIo {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("loading rules from {}", path.display());
    from_json(&json)
}
