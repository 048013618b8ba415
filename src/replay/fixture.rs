use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{RefGraphError, Result};
use crate::types::{CursorElement, DocumentPosition, Entity, SourceSymbol};

/// A recorded host session: what the search service returns for each term,
/// where every reference leads, and the entities known to the database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub source: SourceSymbol,
    /// Result items per search term. Unknown terms yield the
    /// "no results" sentinel entry.
    pub searches: BTreeMap<String, Vec<FixtureItem>>,
    /// Terms whose search fails with an interface mismatch.
    pub mismatched_terms: Vec<String>,
    /// The search service cannot be reached at all.
    pub unavailable: bool,
    pub entities: Vec<Entity>,
    /// Nodes present in the graph before the search.
    pub nodes: Vec<String>,
    pub selected: Option<String>,
    /// Where the user's cursor is when the search starts.
    pub active: Option<DocumentPosition>,
    pub open_documents: Vec<String>,
    /// Simulated cost of every navigation. When set, slices are timed
    /// against this virtual clock instead of the system clock.
    pub navigation_cost_ms: Option<u64>,
}

/// A top-level search result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureItem {
    pub text: String,
    pub category: u16,
    /// First slice (1-based) in which the item is done computing.
    pub ready_at_slice: u32,
    /// Number of initial expansion attempts that fail.
    pub expand_failures: u32,
    pub references: Vec<FixtureReference>,
}

/// One reference occurrence under an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureReference {
    pub text: String,
    pub category: u16,
    pub ready_at_slice: u32,
    pub navigable: bool,
    /// Number of initial navigation attempts that fail.
    pub navigation_failures: u32,
    pub target: Option<FixtureTarget>,
}

impl Default for FixtureReference {
    fn default() -> Self {
        Self {
            text: String::new(),
            category: 0,
            ready_at_slice: 0,
            navigable: true,
            navigation_failures: 0,
            target: None,
        }
    }
}

/// Where a navigation lands.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureTarget {
    pub path: String,
    pub line: u32,
    pub column: u32,
    /// Element under the cursor at the landing site.
    pub element: Option<CursorElement>,
}

impl Fixture {
    /// Reads a fixture from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| RefGraphError::Fixture {
            message: format!("failed to read fixture: {e}"),
            path: path.display().to_string(),
        })?;
        Self::from_json(&contents).map_err(|e| match e {
            RefGraphError::Json(e) => RefGraphError::Fixture {
                message: format!("failed to parse fixture: {e}"),
                path: path.display().to_string(),
            },
            other => other,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
