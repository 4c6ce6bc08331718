//! Request lifecycle for debounced queries.
//!
//! Every lookup is tagged with a generation. Only the outcome carrying the
//! latest generation is applied; anything older was superseded while in
//! flight and is dropped. The underlying request is never aborted.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::model::types::ResultSet;
use crate::search::client::LookupError;

/// Status code the lookup service uses to signal throttling.
pub const RATE_LIMIT_STATUS: u16 = 403;

pub const RATE_LIMITED_MESSAGE: &str =
    "Rate limit exceeded: please wait a few seconds before retrying.";
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred: Please try again in a few seconds.";

/// Monotonic tag identifying one issued lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Generation(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    RateLimited,
    Generic,
}

impl ErrorKind {
    pub fn classify(err: &LookupError) -> Self {
        match err.status() {
            Some(RATE_LIMIT_STATUS) => ErrorKind::RateLimited,
            _ => ErrorKind::Generic,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::RateLimited => RATE_LIMITED_MESSAGE,
            ErrorKind::Generic => GENERIC_ERROR_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success(ResultSet),
    Error(ErrorKind),
}

/// A lookup the caller must run and report back through
/// [`SearchOrchestrator::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub generation: Generation,
    pub query: String,
}

/// What happened to a reported outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Success,
    Failed(ErrorKind),
    Stale,
}

#[derive(Debug, Default)]
pub struct SearchOrchestrator {
    debounced: String,
    generation: Generation,
    state: RequestState,
}

impl SearchOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debounced_query(&self) -> &str {
        &self.debounced
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, RequestState::Loading)
    }

    pub fn error(&self) -> Option<ErrorKind> {
        match self.state {
            RequestState::Error(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn results(&self) -> Option<&ResultSet> {
        match &self.state {
            RequestState::Success(rs) => Some(rs),
            _ => None,
        }
    }

    /// Mutable access for local list transforms. The orchestrator stays the
    /// single owner of the authoritative copy.
    pub fn results_mut(&mut self) -> Option<&mut ResultSet> {
        match &mut self.state {
            RequestState::Success(rs) => Some(rs),
            _ => None,
        }
    }

    /// Apply a new debounced query. Returns the lookup to run, if any.
    ///
    /// Re-emitting the current value is not a change and issues nothing.
    pub fn on_debounced(&mut self, query: &str) -> Option<LookupTicket> {
        if query == self.debounced {
            debug!(query, "debounced query unchanged");
            return None;
        }
        self.debounced = query.to_string();
        if query.is_empty() {
            // Outstanding lookups become stale.
            self.generation = Generation(self.generation.0 + 1);
            self.state = RequestState::Idle;
            debug!(generation = self.generation.0, "empty query, idle");
            return None;
        }
        Some(self.issue())
    }

    /// Re-issue the lookup for the current debounced query under a new
    /// generation. No-op when there is nothing to search for.
    pub fn retry(&mut self) -> Option<LookupTicket> {
        if self.debounced.is_empty() {
            return None;
        }
        info!(query = %self.debounced, "retrying lookup");
        Some(self.issue())
    }

    fn issue(&mut self) -> LookupTicket {
        self.generation = Generation(self.generation.0 + 1);
        self.state = RequestState::Loading;
        info!(
            generation = self.generation.0,
            query = %self.debounced,
            "lookup_issued"
        );
        LookupTicket {
            generation: self.generation,
            query: self.debounced.clone(),
        }
    }

    /// Report the outcome of a lookup. Outcomes of superseded generations are
    /// discarded.
    pub fn complete(
        &mut self,
        generation: Generation,
        outcome: Result<ResultSet, LookupError>,
    ) -> Applied {
        if generation != self.generation {
            debug!(
                generation = generation.0,
                latest = self.generation.0,
                "discarding stale lookup outcome"
            );
            return Applied::Stale;
        }
        match outcome {
            Ok(rs) => {
                info!(
                    generation = generation.0,
                    count = rs.len(),
                    total = rs.total_count,
                    "lookup_succeeded"
                );
                self.state = RequestState::Success(rs);
                Applied::Success
            }
            Err(err) => {
                let kind = ErrorKind::classify(&err);
                warn!(generation = generation.0, error = %err, ?kind, "lookup_failed");
                self.state = RequestState::Error(kind);
                Applied::Failed(kind)
            }
        }
    }
}
