//! List state as a transition table.
//!
//! Every change to a cached list goes through [`ListState::apply`]. Fetches
//! (load, search, filter) carry a [`Ticket`] issued when the request started;
//! only the most recently issued ticket may replace the list, so an older
//! response that resolves late is discarded. A successful append, patch or
//! remove also advances the sequence: a fetch already in flight was answered
//! from data that predates the mutation and must not undo it.

use crate::models::Entity;

/// Sequence number of a fetch-family request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// What produced the items currently held
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ListScope {
    #[default]
    All,
    Search(String),
    Filter(String),
}

#[derive(Debug, Clone)]
pub enum ListOp<T> {
    Replace {
        ticket: Ticket,
        scope: ListScope,
        items: Vec<T>,
    },
    Append(T),
    Patch(T),
    Remove(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Changed,
    /// Replace carried a ticket older than the latest issued one
    Stale,
    /// Patch or Remove named an id that is not cached
    Missing,
}

#[derive(Debug, Clone)]
pub struct ListState<T> {
    items: Vec<T>,
    scope: ListScope,
    issued: u64,
    loaded: bool,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            scope: ListScope::All,
            issued: 0,
            loaded: false,
        }
    }
}

impl<T: Entity> ListState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn scope(&self) -> &ListScope {
        &self.scope
    }

    /// True once any fetch has been applied
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }

    pub fn apply(&mut self, op: ListOp<T>) -> Applied {
        match op {
            ListOp::Replace { ticket, scope, items } => {
                if !self.is_latest(ticket) {
                    return Applied::Stale;
                }
                self.items = items;
                self.scope = scope;
                self.loaded = true;
                Applied::Changed
            }
            ListOp::Append(item) => {
                self.items.push(item);
                self.invalidate_in_flight()
            }
            ListOp::Patch(item) => match self.items.iter_mut().find(|cur| cur.id() == item.id()) {
                Some(slot) => {
                    *slot = item;
                    self.invalidate_in_flight()
                }
                None => Applied::Missing,
            },
            ListOp::Remove(id) => {
                let before = self.items.len();
                self.items.retain(|item| item.id() != id);
                if self.items.len() < before {
                    self.invalidate_in_flight()
                } else {
                    Applied::Missing
                }
            }
        }
    }

    fn invalidate_in_flight(&mut self) -> Applied {
        self.issued += 1;
        Applied::Changed
    }
}
