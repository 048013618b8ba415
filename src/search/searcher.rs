use std::cell::{Cell, Ref, RefCell};

use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::host::{GraphLock, Host};
use crate::types::*;

use super::launcher::begin_search;
use super::processor::process_slice;
use super::session::SearchSession;

/// Drives a reference search one slice at a time.
///
/// The host calls [`advance`](Self::advance) from a periodic trigger. A slice
/// navigates the user's editor around, so the searcher records the cursor and
/// graph selection before each slice and puts them back afterwards.
///
/// Navigation hands control back to the host, which may fire the trigger
/// again while a slice is still running. The searcher state is checked before
/// anything else, and the session is moved out of its cell for the duration of
/// the slice, so such a nested call is a no-op.
pub struct ReferenceSearcher {
    host: Host,
    config: SearchConfig,
    state: Cell<SearchState>,
    session: RefCell<SearchSession>,
    last_report: Cell<Option<SliceReport>>,
    /// Set when `drop_session` is called while a slice runs.
    drop_requested: Cell<bool>,
}

impl ReferenceSearcher {
    pub fn new(host: Host, config: SearchConfig) -> Self {
        Self {
            host,
            config,
            state: Cell::new(SearchState::Exhausted),
            session: RefCell::new(SearchSession::default()),
            last_report: Cell::new(None),
            drop_requested: Cell::new(false),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn state(&self) -> SearchState {
        self.state.get()
    }

    /// The current session. Between slices this is the live session; while a
    /// slice runs it is an empty placeholder.
    pub fn session(&self) -> Ref<'_, SearchSession> {
        self.session.borrow()
    }

    pub fn is_active(&self) -> bool {
        self.state.get() == SearchState::Idle && self.session.borrow().is_active()
    }

    pub fn slice_count(&self) -> u32 {
        self.session.borrow().slice_count()
    }

    /// Report of the most recent slice, if any ran since the last launch.
    pub fn last_report(&self) -> Option<SliceReport> {
        self.last_report.get()
    }

    /// Starts a new search for usages of `source`, discarding any previous
    /// session and its dedup state.
    ///
    /// Refused while a slice is running.
    pub fn begin_search(&self, source: SourceSymbol) -> bool {
        if self.state.get() == SearchState::SlicingInProgress {
            warn!(symbol = %source.long_name, "cannot start a search while a slice is running");
            return false;
        }

        let mut session = SearchSession::default();
        let launched = begin_search(&mut session, source, self.host.search.as_ref(), &self.config);
        if launched {
            info!(symbol = %session.source().long_name, "reference search started");
        } else {
            info!(symbol = %session.source().long_name, "reference search found nothing");
        }

        *self.session.borrow_mut() = session;
        self.last_report.set(None);
        self.state.set(if launched {
            SearchState::Idle
        } else {
            SearchState::Exhausted
        });
        launched
    }

    /// Runs one slice of the active search.
    ///
    /// Does nothing if there is no active search, a slice is already running,
    /// or the slice counter is past the limit. Returns a narration when the
    /// search completed or hit the slice limit.
    pub fn advance(&self) -> Option<Narration> {
        if self.state.get() != SearchState::Idle {
            return None;
        }
        {
            let session = self.session.borrow();
            if !session.is_active() || session.slice_count() > self.config.max_slices {
                return None;
            }
        }

        self.state.set(SearchState::SlicingInProgress);
        let mut session = self.session.take();

        let position = self.host.documents.active_position();
        let selected = self.host.graph.selected_nodes().into_iter().next();

        let report = process_slice(&mut session, &self.host, &self.config);
        debug!(
            slice = session.slice_count(),
            complete = report.is_complete,
            linked = report.linked,
            ignored = report.ignored,
            timed_out = report.timed_out,
            "slice finished"
        );
        if report.is_complete {
            session.discard_results();
        }

        self.restore_selection(selected.as_deref());
        if let Some(position) = position {
            self.restore_position(&position);
        }

        session.slice_count += 1;
        let dropped = self.drop_requested.replace(false);
        let narration = if report.is_complete {
            Some(Narration::Completed)
        } else if dropped {
            None
        } else if session.slice_count() > self.config.max_slices {
            Some(Narration::LimitReached)
        } else {
            None
        };
        if dropped {
            info!(symbol = %session.source().long_name, "reference search dropped");
            session.discard_results();
        }

        let exhausted = !session.is_active();
        *self.session.borrow_mut() = session;
        self.last_report.set(Some(report));
        self.state.set(if exhausted {
            SearchState::Exhausted
        } else {
            SearchState::Idle
        });

        if let Some(narration) = narration {
            info!("{narration}");
        }
        narration
    }

    /// Drops the active search, if any. Called while a slice runs, the drop
    /// takes effect as soon as that slice finishes.
    pub fn drop_session(&self) {
        if self.state.get() == SearchState::SlicingInProgress {
            debug!("drop requested during a slice, deferred");
            self.drop_requested.set(true);
            return;
        }
        self.drop_requested.set(false);
        self.session.borrow_mut().discard_results();
        self.state.set(SearchState::Exhausted);
    }

    fn restore_selection(&self, selected: Option<&str>) {
        let graph = self.host.graph.as_ref();
        let _lock = GraphLock::acquire(graph);
        graph.select_node(selected.unwrap_or_default());
    }

    fn restore_position(&self, position: &DocumentPosition) -> bool {
        let documents = self.host.documents.as_ref();
        let document = if documents.is_open(&position.path) {
            documents.document(&position.path)
        } else {
            match documents.open(&position.path) {
                Ok(document) => Some(document),
                Err(e) => {
                    warn!(path = %position.path, error = %e, "could not reopen document");
                    None
                }
            }
        };

        let Some(document) = document else {
            return false;
        };
        documents.activate(&document);
        let moved = documents.move_cursor_to(&document, position.line, position.column);
        if !moved {
            warn!(
                path = %position.path,
                line = position.line,
                column = position.column,
                "could not restore cursor"
            );
        }
        moved
    }
}
