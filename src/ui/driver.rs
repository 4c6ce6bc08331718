//! Async plumbing around [`SearchScreen`].
//!
//! Lookups run on spawned tasks and report `(generation, outcome)` back over a
//! channel. The screen decides whether an outcome still matters, so a
//! superseded task simply finishes into the void.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::model::types::ResultSet;
use crate::search::client::{LookupError, ProfileLookup};
use crate::search::debounce::Clock;
use crate::search::orchestrator::{Applied, Generation, LookupTicket};
use crate::ui::state::SearchScreen;

type Completion = (Generation, Result<ResultSet, LookupError>);

pub struct SessionDriver<L: ProfileLookup, C: Clock> {
    screen: SearchScreen<C>,
    lookup: Arc<L>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl<L: ProfileLookup, C: Clock> SessionDriver<L, C> {
    pub fn new(screen: SearchScreen<C>, lookup: Arc<L>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            screen,
            lookup,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn screen(&self) -> &SearchScreen<C> {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut SearchScreen<C> {
        &mut self.screen
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Run `ticket` in the background.
    pub fn spawn(&mut self, ticket: LookupTicket) {
        let lookup = Arc::clone(&self.lookup);
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let LookupTicket { generation, query } = ticket;
            let outcome = lookup.search_profiles(&query).await;
            // Receiver gone means the session ended; nothing to report to.
            let _ = tx.send((generation, outcome));
        });
    }

    pub fn retry(&mut self) {
        if let Some(ticket) = self.screen.retry() {
            self.spawn(ticket);
        }
    }

    /// Process everything that is ready without waiting. Returns whether the
    /// visible state may have changed.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        if let Some(ticket) = self.screen.tick() {
            self.spawn(ticket);
            changed = true;
        }
        while let Ok((generation, outcome)) = self.rx.try_recv() {
            changed |= self.apply(generation, outcome);
        }
        changed
    }

    fn apply(&mut self, generation: Generation, outcome: Result<ResultSet, LookupError>) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        let applied = self.screen.complete(generation, outcome);
        debug!(generation = generation.0, ?applied, "lookup completion");
        applied != Applied::Stale
    }

    /// Wait until no debounce is pending and the current lookup (if any) has
    /// settled. Stale completions that arrive meanwhile are drained.
    pub async fn settle(&mut self) {
        loop {
            self.pump();
            if let Some(deadline) = self.screen.debouncer().deadline() {
                tokio::time::sleep_until(deadline).await;
                continue;
            }
            if !self.screen.is_loading() {
                return;
            }
            match self.rx.recv().await {
                Some((generation, outcome)) => {
                    self.apply(generation, outcome);
                }
                None => return,
            }
        }
    }

    /// Tear the session down: a pending debounce never fires.
    pub fn shutdown(&mut self) {
        if self.screen.cancel_pending() {
            debug!("cancelled pending debounce on shutdown");
        }
    }
}
