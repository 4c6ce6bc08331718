//! The search screen's state container.
//!
//! All transitions go through the named operations below and run to
//! completion; the event loop is the only writer. Lookups are not run here:
//! operations that need one hand back a [`LookupTicket`] and the caller
//! reports the outcome through [`SearchScreen::complete`].

use serde::Serialize;
use tracing::debug;

use crate::model::types::{ResultSet, UserId};
use crate::mutate;
use crate::search::client::LookupError;
use crate::search::debounce::{Clock, Debouncer, SystemClock};
use crate::search::orchestrator::{
    Applied, ErrorKind, Generation, LookupTicket, SearchOrchestrator,
};
use crate::selection::{SelectionStore, TriState};

pub const EMPTY_QUERY_NOTICE: &str = "Search a Github user by typing something in the search bar.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorView {
    pub kind: ErrorKind,
    pub message: &'static str,
    pub retryable: bool,
}

/// Read-only view handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub query: String,
    pub loading: bool,
    pub error: Option<ErrorView>,
    pub results: Option<ResultSet>,
    pub selected: Vec<UserId>,
    pub selected_count: usize,
    pub all_selected: TriState,
    pub edit_mode: bool,
    pub notice: Option<String>,
}

impl Snapshot {
    pub fn is_selected(&self, id: UserId) -> bool {
        self.selected.binary_search(&id).is_ok()
    }
}

pub struct SearchScreen<C: Clock = SystemClock> {
    query: String,
    debouncer: Debouncer<String, C>,
    orchestrator: SearchOrchestrator,
    selection: SelectionStore,
    edit_mode: bool,
}

impl<C: Clock> SearchScreen<C> {
    pub fn new(debouncer: Debouncer<String, C>) -> Self {
        Self {
            query: String::new(),
            debouncer,
            orchestrator: SearchOrchestrator::new(),
            selection: SelectionStore::new(),
            edit_mode: false,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn debounced_query(&self) -> &str {
        self.orchestrator.debounced_query()
    }

    pub fn results(&self) -> Option<&ResultSet> {
        self.orchestrator.results()
    }

    pub fn is_loading(&self) -> bool {
        self.orchestrator.is_loading()
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn debouncer(&self) -> &Debouncer<String, C> {
        &self.debouncer
    }

    /// Replace the raw query and restart the quiet window.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
        self.debouncer.schedule(self.query.clone());
    }

    /// Release a due debounced query, if any, and return the lookup it needs.
    pub fn tick(&mut self) -> Option<LookupTicket> {
        let debounced = self.debouncer.poll()?;
        if debounced == self.orchestrator.debounced_query() {
            return None;
        }
        debug!(query = %debounced, "debounced query changed");
        self.selection.clear();
        self.orchestrator.on_debounced(&debounced)
    }

    pub fn retry(&mut self) -> Option<LookupTicket> {
        let ticket = self.orchestrator.retry()?;
        self.selection.clear();
        Some(ticket)
    }

    pub fn complete(
        &mut self,
        generation: Generation,
        outcome: Result<ResultSet, LookupError>,
    ) -> Applied {
        self.orchestrator.complete(generation, outcome)
    }

    pub fn toggle_one(&mut self, id: UserId, selected: bool) {
        self.selection
            .toggle_one(self.orchestrator.results(), id, selected);
    }

    pub fn toggle_all(&mut self, selected: bool) {
        self.selection.toggle_all(self.orchestrator.results(), selected);
    }

    pub fn is_selected(&self, id: UserId) -> bool {
        self.selection.contains(id)
    }

    pub fn all_selected(&self) -> TriState {
        self.selection.tri_state(self.orchestrator.results())
    }

    pub fn duplicate_selected(&mut self) -> usize {
        let added = match self.orchestrator.results_mut() {
            Some(rs) => mutate::duplicate(rs, self.selection.ids()),
            None => 0,
        };
        self.selection.clear();
        added
    }

    pub fn remove_selected(&mut self) -> usize {
        let removed = match self.orchestrator.results_mut() {
            Some(rs) => mutate::remove(rs, self.selection.ids()),
            None => 0,
        };
        self.selection.clear();
        removed
    }

    pub fn toggle_edit_mode(&mut self) -> bool {
        self.edit_mode = !self.edit_mode;
        self.edit_mode
    }

    pub fn set_edit_mode(&mut self, on: bool) {
        self.edit_mode = on;
    }

    /// Stop the pending debounce, if any. Used on teardown.
    pub fn cancel_pending(&mut self) -> bool {
        self.debouncer.cancel()
    }

    pub fn snapshot(&self) -> Snapshot {
        let results = self.orchestrator.results().cloned();
        let error = self.orchestrator.error().map(|kind| ErrorView {
            kind,
            message: kind.message(),
            retryable: true,
        });
        let notice = if self.orchestrator.debounced_query().is_empty() && !self.is_loading() {
            Some(EMPTY_QUERY_NOTICE.to_string())
        } else {
            match &results {
                Some(rs) if rs.is_empty() => Some(format!(
                    "No result for \"{}\"",
                    self.orchestrator.debounced_query()
                )),
                _ => None,
            }
        };
        Snapshot {
            query: self.query.clone(),
            loading: self.is_loading(),
            error,
            selected: self.selection.ids().iter().copied().collect(),
            selected_count: self.selection.len(),
            all_selected: self.all_selected(),
            edit_mode: self.edit_mode,
            notice,
            results,
        }
    }
}
