use tracing::debug;

use crate::config::SearchConfig;
use crate::host::{ObjectList, SymbolSearchService};
use crate::types::{SearchCriteria, SourceSymbol};

use super::session::SearchSession;

/// Starts a fresh search for `source`, replacing everything in `session`.
///
/// The qualified name is searched first; if that yields nothing usable the
/// short name is tried once, even when both names are the same. Returns `true` if a result list with at least
/// one real entry is now attached to the session.
pub fn begin_search(
    session: &mut SearchSession,
    source: SourceSymbol,
    service: &dyn SymbolSearchService,
    config: &SearchConfig,
) -> bool {
    *session = SearchSession::new(source);

    let mut results = launch_search(service, &session.source.long_name, config);
    if results.is_none() {
        results = launch_search(service, &session.source.name, config);
    }

    session.results = results;
    session.slice_count = 0;
    session.is_active()
}

/// Runs one search and returns the result list if it holds real results.
pub fn launch_search(
    service: &dyn SymbolSearchService,
    term: &str,
    config: &SearchConfig,
) -> Option<Box<dyn ObjectList>> {
    if term.is_empty() {
        return None;
    }

    let results = match service.search(&SearchCriteria::references_to(term)) {
        Ok(list) => list,
        Err(e) => {
            debug!(term, error = %e, "search launch failed");
            return None;
        }
    };

    let count = match results.item_count() {
        Ok(count) => count,
        Err(e) => {
            debug!(term, error = %e, "could not read result count");
            return None;
        }
    };
    if count == 0 {
        debug!(term, "search returned an empty list");
        return None;
    }

    match results.item(0) {
        Ok(first) if first.text == config.no_results_text => {
            debug!(term, "search found no results");
            None
        }
        Ok(_) => Some(results),
        Err(e) => {
            debug!(term, error = %e, "could not read first result");
            None
        }
    }
}
