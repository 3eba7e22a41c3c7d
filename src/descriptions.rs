use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Mapping key for the algorithm description slot.
pub const ALG_DESC: &str = "ALG_DESC";
/// Mapping key for the algorithm author slot.
pub const ALG_CREATOR: &str = "ALG_CREATOR";
/// Mapping key for the help author slot.
pub const ALG_HELP_CREATOR: &str = "ALG_HELP_CREATOR";

#[derive(Debug, Error)]
pub enum DescriptionsError {
    #[error("failed to read descriptions file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse descriptions file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A read-only mapping from slot keys to human-readable help text, loaded
/// from a JSON help file. Keys beyond the `ALG_*` constants are parameter
/// and output names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct DescriptionMap(HashMap<String, String>);

impl DescriptionMap {
    /// Loads a description mapping from `path`.
    ///
    /// A missing file is not an error and yields `Ok(None)`; unreadable or
    /// malformed files propagate with the offending path attached.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>, DescriptionsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let data = fs::read(path).map_err(|source| DescriptionsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let map: Self = serde_json::from_slice(&data).map_err(|source| {
            DescriptionsError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;

        debug!(
            target: "help2html",
            path = %path.display(),
            entries = map.0.len(),
            "loaded description map"
        );
        Ok(Some(map))
    }

    /// The text stored under `key` with newlines rewritten to `<br>`, or the
    /// empty string when the key is absent.
    #[must_use]
    pub fn lookup(&self, key: &str) -> String {
        self.0
            .get(key)
            .map(|text| text.replace('\n', "<br>"))
            .unwrap_or_default()
    }
}

impl From<HashMap<String, String>> for DescriptionMap {
    fn from(entries: HashMap<String, String>) -> Self {
        Self(entries)
    }
}

impl FromIterator<(String, String)> for DescriptionMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
