use std::collections::{HashMap, HashSet};

use crate::host::ObjectList;
use crate::types::SourceSymbol;

/// Mutable state of one reference search.
///
/// All dedup state lives here, so dropping the session forgets everything the
/// search has seen.
#[derive(Default)]
pub struct SearchSession {
    pub(crate) source: SourceSymbol,
    /// `None` when no search is running or the results are drained.
    pub(crate) results: Option<Box<dyn ObjectList>>,
    /// Top-level entries whose occurrences are all handled.
    pub(crate) item_records: HashSet<String>,
    /// Occurrences already linked or ignored.
    pub(crate) reference_records: HashSet<String>,
    /// Failed sub-list expansions per top-level entry.
    pub(crate) expand_failures: HashMap<String, u32>,
    pub(crate) slice_count: u32,
}

impl SearchSession {
    pub fn new(source: SourceSymbol) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    pub fn source(&self) -> &SourceSymbol {
        &self.source
    }

    /// Whether a result list is still attached.
    pub fn is_active(&self) -> bool {
        self.results.is_some()
    }

    pub fn slice_count(&self) -> u32 {
        self.slice_count
    }

    pub fn is_item_handled(&self, text: &str) -> bool {
        self.item_records.contains(text)
    }

    pub fn is_reference_handled(&self, text: &str) -> bool {
        self.reference_records.contains(text)
    }

    pub fn handled_item_count(&self) -> usize {
        self.item_records.len()
    }

    pub fn handled_reference_count(&self) -> usize {
        self.reference_records.len()
    }

    /// Releases the result list, ending the search.
    pub fn discard_results(&mut self) {
        self.results = None;
    }

    /// Attaches a result list, e.g. one obtained by a launcher other than
    /// [`begin_search`](super::begin_search).
    pub fn attach_results(&mut self, results: Box<dyn ObjectList>) {
        self.results = Some(results);
    }
}

impl std::fmt::Debug for SearchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("source", &self.source)
            .field("active", &self.is_active())
            .field("items", &self.item_records.len())
            .field("references", &self.reference_records.len())
            .field("slice_count", &self.slice_count)
            .finish()
    }
}
