use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{RefGraphError, Result};

/// Name of the configuration file stored inside the `.refgraph` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the hidden directory used to store refgraph metadata.
pub const REFGRAPH_DIR: &str = ".refgraph";

/// Text the host puts in the first entry of an empty result list.
pub const NO_RESULTS_TEXT: &str = "Search found no results";

/// Tuning for incremental reference searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Wall-clock budget of one slice, in milliseconds.
    pub slice_budget_ms: u64,
    /// Slices are run until the counter exceeds this value.
    pub max_slices: u32,
    /// Reference categories that never produce an edge (definitions, comments).
    pub ignored_categories: Vec<u16>,
    /// First-entry text meaning the search produced nothing.
    pub no_results_text: String,
    /// Entry texts that stand in for results still being computed.
    pub processing_markers: Vec<String>,
    /// Failed sub-list expansions tolerated before an item is abandoned.
    pub max_expand_attempts: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            version: 1,
            slice_budget_ms: 3000,
            max_slices: 4,
            ignored_categories: vec![12, 5],
            no_results_text: NO_RESULTS_TEXT.to_string(),
            processing_markers: vec![
                "Please Wait...".to_string(),
                "% of items left to process".to_string(),
            ],
            max_expand_attempts: 3,
        }
    }
}

impl SearchConfig {
    pub fn slice_budget(&self) -> Duration {
        Duration::from_millis(self.slice_budget_ms)
    }

    pub fn is_ignored_category(&self, category: u16) -> bool {
        self.ignored_categories.contains(&category)
    }
}

/// Returns the path to the `.refgraph` directory within the given project root.
pub fn get_refgraph_dir(project_root: &Path) -> PathBuf {
    project_root.join(REFGRAPH_DIR)
}

/// Returns the path to the configuration file within the `.refgraph` directory.
pub fn get_config_path(project_root: &Path) -> PathBuf {
    get_refgraph_dir(project_root).join(CONFIG_FILENAME)
}

/// Loads the configuration from disk.
///
/// If the configuration file does not exist, returns the default configuration.
/// Fields missing from the file take their default values.
pub fn load_config(project_root: &Path) -> Result<SearchConfig> {
    let config_path = get_config_path(project_root);

    if !config_path.exists() {
        return Ok(SearchConfig::default());
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| RefGraphError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    let config: SearchConfig =
        serde_json::from_str(&contents).map_err(|e| RefGraphError::Config {
            message: format!(
                "failed to parse config file '{}': {}",
                config_path.display(),
                e
            ),
        })?;

    if config.max_expand_attempts == 0 {
        return Err(RefGraphError::Config {
            message: "max_expand_attempts must be at least 1".to_string(),
        });
    }

    Ok(config)
}

/// Saves the configuration to disk using an atomic write.
///
/// Writes to a temporary file first and then renames it into place.
pub fn save_config(project_root: &Path, config: &SearchConfig) -> Result<()> {
    let refgraph_dir = get_refgraph_dir(project_root);
    fs::create_dir_all(&refgraph_dir).map_err(|e| RefGraphError::Config {
        message: format!(
            "failed to create refgraph directory '{}': {}",
            refgraph_dir.display(),
            e
        ),
    })?;

    let config_path = get_config_path(project_root);
    let tmp_path = config_path.with_extension("tmp");

    let json = serde_json::to_string_pretty(config).map_err(|e| RefGraphError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &json).map_err(|e| RefGraphError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, &config_path).map_err(|e| RefGraphError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            config_path.display(),
            e
        ),
    })?;

    Ok(())
}
