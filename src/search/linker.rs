use tracing::debug;

use crate::host::{GraphLock, Host};
use crate::types::{EntitySearchRequest, LinkOutcome, SourceSymbol};

/// Links the entity under the cursor to `source`.
///
/// Called right after a jump to a reference occurrence. The element under the
/// cursor is looked up in the entity database, first constrained by its
/// qualified name and then without it. On a match, both entities become graph
/// nodes and an edge from the match to `source` is added under the graph lock.
pub fn link_target(source: &SourceSymbol, host: &Host) -> LinkOutcome {
    let Some(element) = host.cursor.element_under_cursor() else {
        debug!("go to source failed, no element under cursor");
        return LinkOutcome::NoElement;
    };

    let request = EntitySearchRequest::for_element(&element);
    let mut widened = false;
    let mut found = host.entities.search(&request);
    if found.is_none() && request.has_long_name() {
        widened = true;
        found = host.entities.search(&request.widened());
    }

    let Some(entity) = found else {
        debug!(name = %element.name, file = %element.file_path, line = element.line, "no entity matches element");
        return LinkOutcome::NoMatch;
    };

    let edge_added = {
        let _lock = GraphLock::acquire(host.graph.as_ref());
        host.graph.add_node(&entity.id);
        host.graph.add_node(&source.unique_name);
        host.graph.add_edge(&entity.id, &source.unique_name)
    };
    debug!(from = %entity.id, to = %source.unique_name, edge_added, "add edge");

    LinkOutcome::Linked {
        entity_id: entity.id,
        edge_added,
        widened,
    }
}
