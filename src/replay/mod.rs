//! Deterministic host built from a recorded fixture.
//!
//! Lets a complete reference search run outside an IDE: the fixture supplies
//! the search results, the landing site of every reference and the entity
//! catalog, while the graph is an in-memory [`SceneGraph`].

mod backend;
mod fixture;

use std::path::Path;
use std::rc::Rc;

use crate::errors::Result;
use crate::graph::SceneGraph;
use crate::host::{Clock, DocumentService, GraphLock, GraphModel, Host, SystemClock};
use crate::resolution::EntityCatalog;
use crate::types::{DocumentPosition, SourceSymbol};

pub use backend::ReplayBackend;
pub use fixture::{Fixture, FixtureItem, FixtureReference, FixtureTarget};

/// All collaborators of a replayed session.
pub struct ReplayHost {
    backend: ReplayBackend,
    graph: Rc<SceneGraph>,
    catalog: Rc<EntityCatalog>,
}

impl ReplayHost {
    pub fn new(fixture: Fixture) -> Self {
        let graph = Rc::new(SceneGraph::with_nodes(fixture.nodes.iter().cloned()));
        if let Some(selected) = &fixture.selected {
            let _lock = GraphLock::acquire(graph.as_ref());
            graph.select_node(selected);
        }
        let catalog = Rc::new(EntityCatalog::new(fixture.entities.clone()));

        Self {
            backend: ReplayBackend::new(fixture),
            graph,
            catalog,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(Fixture::load(path)?))
    }

    /// The symbol the fixture was recorded for.
    pub fn source(&self) -> SourceSymbol {
        self.backend.fixture().source.clone()
    }

    /// Builds the collaborator set. The clock is virtual when the fixture
    /// sets a navigation cost.
    pub fn host(&self) -> Host {
        let clock: Rc<dyn Clock> = if self.backend.fixture().navigation_cost_ms.is_some() {
            Rc::new(self.backend.clone())
        } else {
            Rc::new(SystemClock)
        };
        self.host_with_clock(clock)
    }

    pub fn host_with_clock(&self, clock: Rc<dyn Clock>) -> Host {
        Host {
            search: Rc::new(self.backend.clone()),
            cursor: Rc::new(self.backend.clone()),
            entities: self.catalog.clone(),
            graph: self.graph.clone(),
            documents: Rc::new(self.backend.clone()),
            clock,
        }
    }

    pub fn backend(&self) -> &ReplayBackend {
        &self.backend
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn catalog(&self) -> &EntityCatalog {
        &self.catalog
    }

    pub fn active_position(&self) -> Option<DocumentPosition> {
        self.backend.active_position()
    }
}
