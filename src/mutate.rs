//! Optimistic, local edits of the displayed result set.
//!
//! Nothing here talks to the lookup service. Callers clear the selection once
//! an edit completes.

use std::collections::BTreeSet;

use tracing::info;

use crate::model::types::{ResultSet, UserId, UserRecord};

/// Suffix appended to the login of a duplicated record.
pub const COPY_SUFFIX: &str = " (copy)";

/// Append a copy of every selected record, in display order.
///
/// Copies get ids above the current maximum, so they are distinct from every
/// existing id and from each other. Once the id space above the maximum runs
/// out, the smallest unused ids are handed out instead. Returns the number of
/// records added.
pub fn duplicate(results: &mut ResultSet, selected: &BTreeSet<UserId>) -> usize {
    let mut ids = IdAllocator::new(results);
    let copies: Vec<UserRecord> = results
        .items
        .iter()
        .filter(|u| selected.contains(&u.id))
        .map(|u| UserRecord {
            id: ids.next_id(),
            login: format!("{}{COPY_SUFFIX}", u.login),
            ..u.clone()
        })
        .collect();
    let added = copies.len();
    results.items.extend(copies);
    results.total_count = results.total_count.saturating_add(added as u64);
    info!(added, total = results.total_count, "duplicated records");
    added
}

/// Hands out ids not present in a result set.
struct IdAllocator {
    used: BTreeSet<UserId>,
    above: Option<UserId>,
    lowest_free: UserId,
}

impl IdAllocator {
    fn new(results: &ResultSet) -> Self {
        let used: BTreeSet<UserId> = results.ids().collect();
        let above = used.last().map_or(Some(1), |max| max.checked_add(1));
        Self {
            used,
            above,
            lowest_free: 0,
        }
    }

    fn next_id(&mut self) -> UserId {
        let id = match self.above {
            Some(id) => {
                self.above = id.checked_add(1);
                id
            }
            None => {
                while self.used.contains(&self.lowest_free) {
                    self.lowest_free += 1;
                }
                self.lowest_free
            }
        };
        self.used.insert(id);
        id
    }
}

/// Drop every selected record. Returns the number of records removed.
pub fn remove(results: &mut ResultSet, selected: &BTreeSet<UserId>) -> usize {
    let before = results.items.len();
    results.items.retain(|u| !selected.contains(&u.id));
    let removed = before - results.items.len();
    results.total_count = results.total_count.saturating_sub(removed as u64);
    info!(removed, total = results.total_count, "removed records");
    removed
}
