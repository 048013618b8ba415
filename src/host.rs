//! Interfaces to the host environment.
//!
//! The engine never owns the symbol search facility, the entity database, the
//! graph or the documents; it drives them through these traits. All methods
//! take `&self`: the host is single-threaded and implementations use interior
//! mutability, which also lets a navigation call re-enter the host.

use std::rc::Rc;
use std::time::Instant;

use crate::errors::Result;
use crate::types::*;

/// A possibly still-growing list of search results.
///
/// Top-level lists hold one entry per matched symbol; `expand` yields the
/// list of reference occurrences under an entry, which can be navigated to.
pub trait ObjectList {
    fn item_count(&self) -> Result<u32>;

    fn item(&self, index: u32) -> Result<ListEntry>;

    fn expand(&self, index: u32) -> Result<Box<dyn ObjectList>>;

    fn can_navigate(&self, index: u32) -> Result<bool>;

    /// Jumps the active document and cursor to the entry's source location.
    fn navigate(&self, index: u32) -> Result<()>;
}

/// The host's symbol search facility.
pub trait SymbolSearchService {
    fn search(&self, criteria: &SearchCriteria) -> Result<Box<dyn ObjectList>>;
}

pub trait CursorNavigator {
    /// The code element under the cursor of the active document.
    fn element_under_cursor(&self) -> Option<CursorElement>;
}

pub trait EntityDatabase {
    /// Returns the best entity matching the request, if any.
    fn search(&self, request: &EntitySearchRequest) -> Option<Entity>;
}

/// The shared visualization graph.
pub trait GraphModel {
    fn acquire_lock(&self);

    fn release_lock(&self);

    fn selected_nodes(&self) -> Vec<String>;

    /// Selects the node with the given id; an empty or unknown id clears the
    /// selection.
    fn select_node(&self, id: &str);

    fn add_node(&self, id: &str);

    /// Adds a directed edge, returning `false` if it was not added.
    fn add_edge(&self, from: &str, to: &str) -> bool;
}

pub trait DocumentService {
    /// Document and cursor position the user is currently at.
    fn active_position(&self) -> Option<DocumentPosition>;

    fn is_open(&self, path: &str) -> bool;

    /// Handle of an already open document.
    fn document(&self, path: &str) -> Option<DocumentHandle>;

    fn open(&self, path: &str) -> Result<DocumentHandle>;

    fn activate(&self, document: &DocumentHandle);

    fn move_cursor_to(&self, document: &DocumentHandle, line: u32, column: u32) -> bool;
}

/// Source of the current time, used to enforce slice budgets.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Reads the system monotonic clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Every collaborator the engine talks to.
#[derive(Clone)]
pub struct Host {
    pub search: Rc<dyn SymbolSearchService>,
    pub cursor: Rc<dyn CursorNavigator>,
    pub entities: Rc<dyn EntityDatabase>,
    pub graph: Rc<dyn GraphModel>,
    pub documents: Rc<dyn DocumentService>,
    pub clock: Rc<dyn Clock>,
}

/// Holds the graph lock until dropped.
pub struct GraphLock<'a> {
    graph: &'a dyn GraphModel,
}

impl<'a> GraphLock<'a> {
    pub fn acquire(graph: &'a dyn GraphModel) -> Self {
        graph.acquire_lock();
        Self { graph }
    }
}

impl Drop for GraphLock<'_> {
    fn drop(&mut self) {
        self.graph.release_lock();
    }
}
