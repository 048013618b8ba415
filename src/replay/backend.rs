use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::config::NO_RESULTS_TEXT;
use crate::errors::{RefGraphError, Result};
use crate::host::{Clock, CursorNavigator, DocumentService, ObjectList, SymbolSearchService};
use crate::types::*;

use super::fixture::{Fixture, FixtureItem, FixtureReference};

#[derive(Default)]
struct ReplayState {
    cursor: Option<DocumentPosition>,
    element: Option<CursorElement>,
    open: Vec<DocumentHandle>,
    next_document_id: u64,
    expand_attempts: HashMap<String, u32>,
    navigation_attempts: HashMap<String, u32>,
    searches: Vec<SearchCriteria>,
    navigations: Vec<String>,
    elapsed: Duration,
}

struct Shared {
    fixture: Fixture,
    state: RefCell<ReplayState>,
    epoch: Instant,
    navigation_hook: RefCell<Option<Rc<dyn Fn()>>>,
}

/// Plays back a [`Fixture`] as the host's search service, cursor navigator,
/// document service and (optionally) clock.
///
/// Cloning is cheap; clones share all state.
#[derive(Clone)]
pub struct ReplayBackend {
    shared: Rc<Shared>,
}

impl ReplayBackend {
    pub fn new(fixture: Fixture) -> Self {
        let mut state = ReplayState::default();
        for path in &fixture.open_documents {
            open_document(&mut state, path);
        }
        if let Some(active) = &fixture.active {
            open_document(&mut state, &active.path);
            state.cursor = Some(active.clone());
        }

        Self {
            shared: Rc::new(Shared {
                fixture,
                state: RefCell::new(state),
                epoch: Instant::now(),
                navigation_hook: RefCell::new(None),
            }),
        }
    }

    pub fn fixture(&self) -> &Fixture {
        &self.shared.fixture
    }

    /// Terms searched so far, in order.
    pub fn searched_terms(&self) -> Vec<String> {
        self.shared
            .state
            .borrow()
            .searches
            .iter()
            .map(|c| c.term.clone())
            .collect()
    }

    pub fn searches(&self) -> Vec<SearchCriteria> {
        self.shared.state.borrow().searches.clone()
    }

    /// Texts of the references navigated to successfully, in order.
    pub fn navigations(&self) -> Vec<String> {
        self.shared.state.borrow().navigations.clone()
    }

    /// Runs `hook` after every successful navigation, the way a host pumps
    /// its message loop while jumping to source.
    pub fn set_navigation_hook(&self, hook: impl Fn() + 'static) {
        *self.shared.navigation_hook.borrow_mut() = Some(Rc::new(hook));
    }

    fn navigate_to(&self, reference: &FixtureReference) -> Result<()> {
        {
            let mut state = self.shared.state.borrow_mut();
            let attempts = state
                .navigation_attempts
                .entry(reference.text.clone())
                .or_insert(0);
            *attempts += 1;
            if *attempts <= reference.navigation_failures {
                return Err(RefGraphError::NavigationFailed {
                    message: format!("cannot open source of '{}'", reference.text),
                    index: *attempts,
                });
            }

            match &reference.target {
                Some(target) => {
                    if !target.path.is_empty() {
                        open_document(&mut state, &target.path);
                        state.cursor = Some(DocumentPosition {
                            path: target.path.clone(),
                            line: target.line,
                            column: target.column,
                        });
                    }
                    state.element = target.element.clone();
                }
                None => state.element = None,
            }
            state.navigations.push(reference.text.clone());
            if let Some(cost) = self.shared.fixture.navigation_cost_ms {
                state.elapsed += Duration::from_millis(cost);
            }
        }

        let hook = self.shared.navigation_hook.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
        Ok(())
    }
}

fn open_document(state: &mut ReplayState, path: &str) -> DocumentHandle {
    if let Some(handle) = state.open.iter().find(|d| d.path == path) {
        return handle.clone();
    }
    state.next_document_id += 1;
    let handle = DocumentHandle {
        path: path.to_string(),
        id: state.next_document_id,
    };
    state.open.push(handle.clone());
    handle
}

enum ListLevel {
    Items(Vec<FixtureItem>),
    References(Vec<FixtureReference>),
}

/// A result list produced by one search. Every top-level `item_count` call
/// starts a new generation, so the launch check is generation 1 and the
/// n-th slice sees generation n + 1.
struct ReplayList {
    backend: ReplayBackend,
    generation: Rc<Cell<u32>>,
    level: ListLevel,
}

impl ReplayList {
    fn slice(&self) -> u32 {
        self.generation.get().saturating_sub(1)
    }

    fn out_of_range(index: u32) -> RefGraphError {
        RefGraphError::ReadFailed {
            message: "entry index out of range".to_string(),
            index: Some(index),
        }
    }
}

impl ObjectList for ReplayList {
    fn item_count(&self) -> Result<u32> {
        match &self.level {
            ListLevel::Items(items) => {
                self.generation.set(self.generation.get() + 1);
                Ok(items.len() as u32)
            }
            ListLevel::References(references) => Ok(references.len() as u32),
        }
    }

    fn item(&self, index: u32) -> Result<ListEntry> {
        let (text, category, ready_at) = match &self.level {
            ListLevel::Items(items) => {
                let item = items
                    .get(index as usize)
                    .ok_or_else(|| Self::out_of_range(index))?;
                (&item.text, item.category, item.ready_at_slice)
            }
            ListLevel::References(references) => {
                let reference = references
                    .get(index as usize)
                    .ok_or_else(|| Self::out_of_range(index))?;
                (&reference.text, reference.category, reference.ready_at_slice)
            }
        };
        Ok(ListEntry {
            text: text.clone(),
            category,
            still_computing: self.slice() < ready_at,
        })
    }

    fn expand(&self, index: u32) -> Result<Box<dyn ObjectList>> {
        let ListLevel::Items(items) = &self.level else {
            return Err(RefGraphError::InterfaceMismatch {
                message: "reference entries do not expand".to_string(),
            });
        };
        let item = items
            .get(index as usize)
            .ok_or_else(|| Self::out_of_range(index))?;

        let attempts = {
            let mut state = self.backend.shared.state.borrow_mut();
            let attempts = state.expand_attempts.entry(item.text.clone()).or_insert(0);
            *attempts += 1;
            *attempts
        };
        if attempts <= item.expand_failures {
            return Err(RefGraphError::ServiceUnavailable {
                service: format!("reference list of '{}'", item.text),
            });
        }

        Ok(Box::new(ReplayList {
            backend: self.backend.clone(),
            generation: Rc::clone(&self.generation),
            level: ListLevel::References(item.references.clone()),
        }))
    }

    fn can_navigate(&self, index: u32) -> Result<bool> {
        match &self.level {
            ListLevel::Items(_) => Ok(false),
            ListLevel::References(references) => references
                .get(index as usize)
                .map(|r| r.navigable)
                .ok_or_else(|| Self::out_of_range(index)),
        }
    }

    fn navigate(&self, index: u32) -> Result<()> {
        let ListLevel::References(references) = &self.level else {
            return Err(RefGraphError::NavigationFailed {
                message: "result items have no source location".to_string(),
                index,
            });
        };
        let reference = references
            .get(index as usize)
            .ok_or_else(|| Self::out_of_range(index))?;
        self.backend.navigate_to(reference)
    }
}

impl SymbolSearchService for ReplayBackend {
    fn search(&self, criteria: &SearchCriteria) -> Result<Box<dyn ObjectList>> {
        self.shared
            .state
            .borrow_mut()
            .searches
            .push(criteria.clone());

        let fixture = &self.shared.fixture;
        if fixture.unavailable {
            return Err(RefGraphError::ServiceUnavailable {
                service: "symbol search".to_string(),
            });
        }
        if fixture.mismatched_terms.contains(&criteria.term) {
            return Err(RefGraphError::InterfaceMismatch {
                message: format!("result list for '{}' has no item interface", criteria.term),
            });
        }

        let items = fixture
            .searches
            .get(&criteria.term)
            .filter(|items| !items.is_empty())
            .cloned()
            .unwrap_or_else(|| {
                vec![FixtureItem {
                    text: NO_RESULTS_TEXT.to_string(),
                    ..FixtureItem::default()
                }]
            });

        Ok(Box::new(ReplayList {
            backend: self.clone(),
            generation: Rc::new(Cell::new(0)),
            level: ListLevel::Items(items),
        }))
    }
}

impl CursorNavigator for ReplayBackend {
    fn element_under_cursor(&self) -> Option<CursorElement> {
        self.shared.state.borrow().element.clone()
    }
}

impl DocumentService for ReplayBackend {
    fn active_position(&self) -> Option<DocumentPosition> {
        self.shared.state.borrow().cursor.clone()
    }

    fn is_open(&self, path: &str) -> bool {
        self.shared.state.borrow().open.iter().any(|d| d.path == path)
    }

    fn document(&self, path: &str) -> Option<DocumentHandle> {
        self.shared
            .state
            .borrow()
            .open
            .iter()
            .find(|d| d.path == path)
            .cloned()
    }

    fn open(&self, path: &str) -> Result<DocumentHandle> {
        if path.is_empty() {
            return Err(RefGraphError::ReadFailed {
                message: "empty document path".to_string(),
                index: None,
            });
        }
        Ok(open_document(&mut self.shared.state.borrow_mut(), path))
    }

    fn activate(&self, document: &DocumentHandle) {
        let mut state = self.shared.state.borrow_mut();
        let already_active = state
            .cursor
            .as_ref()
            .is_some_and(|c| c.path == document.path);
        if !already_active {
            state.cursor = Some(DocumentPosition {
                path: document.path.clone(),
                line: 1,
                column: 1,
            });
        }
    }

    fn move_cursor_to(&self, document: &DocumentHandle, line: u32, column: u32) -> bool {
        let mut state = self.shared.state.borrow_mut();
        match state.cursor.as_mut() {
            Some(cursor) if cursor.path == document.path => {
                cursor.line = line;
                cursor.column = column;
                true
            }
            _ => false,
        }
    }
}

impl Clock for ReplayBackend {
    fn now(&self) -> Instant {
        self.shared.epoch + self.shared.state.borrow().elapsed
    }
}
