//! Append-only chat history.
//!
//! Every handled statement appends two entries: the inbound user text and the
//! engine's aggregate answer. Both share the turn's `SubQuery` list so an
//! explorer can drill down from either side.
//!
//! The history is written by whichever thread handles a statement and read by
//! explorer/UI threads. Readers never iterate the live vector; they take a
//! [`HistorySnapshot`] (a cheap copy of `Arc`s taken under the read lock).

use super::resolve::{MatchOutcome, SubQuery};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

bitflags::bitflags! {
    /// What kind of entry this is and how its turn resolved.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EntryFlags: u8 {
        /// Text typed by the user.
        const INBOUND       = 1 << 0;
        /// Text produced by the engine.
        const GENERATED     = 1 << 1;
        /// At least one sentence fell back to the fallback template.
        const FALLBACK      = 1 << 2;
        /// At least one sentence tripped the match guard.
        const GUARD_TRIPPED = 1 << 3;
    }
}

/// One line of chat history.
#[derive(Debug, Clone)]
pub struct ChatHistoryEntry {
    sequence: u64,
    timestamp: DateTime<Utc>,
    user: String,
    flags: EntryFlags,
    text: String,
    sub_queries: Arc<[SubQuery]>,
}

impl ChatHistoryEntry {
    /// Position in the history (0-based, gap-free).
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The user whose statement started the turn.
    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn flags(&self) -> EntryFlags {
        self.flags
    }

    pub fn is_inbound(&self) -> bool {
        self.flags.contains(EntryFlags::INBOUND)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sub_queries(&self) -> &[SubQuery] {
        &self.sub_queries
    }
}

/// Thread-safe, append-only history.
#[derive(Debug, Default)]
pub struct ChatHistory {
    entries: RwLock<Vec<Arc<ChatHistoryEntry>>>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the inbound and generated entries of one turn under a single
    /// write lock, so they are always adjacent.
    pub(crate) fn record_turn(
        &self,
        user: &str,
        inbound: &str,
        generated: &str,
        sub_queries: Arc<[SubQuery]>,
    ) -> (Arc<ChatHistoryEntry>, Arc<ChatHistoryEntry>) {
        let mut outcome_flags = EntryFlags::empty();
        for sq in sub_queries.iter() {
            match sq.outcome() {
                MatchOutcome::Matched => {}
                MatchOutcome::Unmatched => outcome_flags |= EntryFlags::FALLBACK,
                MatchOutcome::GuardExceeded => outcome_flags |= EntryFlags::FALLBACK | EntryFlags::GUARD_TRIPPED,
            }
        }

        let timestamp = Utc::now();
        let mut entries = self.entries.write();
        let next = entries.len() as u64;

        let inbound = Arc::new(ChatHistoryEntry {
            sequence: next,
            timestamp,
            user: user.to_string(),
            flags: EntryFlags::INBOUND,
            text: inbound.to_string(),
            sub_queries: Arc::clone(&sub_queries),
        });
        let generated = Arc::new(ChatHistoryEntry {
            sequence: next + 1,
            timestamp,
            user: user.to_string(),
            flags: EntryFlags::GENERATED | outcome_flags,
            text: generated.to_string(),
            sub_queries,
        });

        entries.push(Arc::clone(&inbound));
        entries.push(Arc::clone(&generated));
        (inbound, generated)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn last(&self) -> Option<Arc<ChatHistoryEntry>> {
        self.entries.read().last().cloned()
    }

    /// Stable copy for enumeration; later appends do not show up in it.
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot { entries: self.entries.read().clone() }
    }
}

/// Point-in-time view of the history.
#[derive(Debug, Clone, Default)]
pub struct HistorySnapshot {
    entries: Vec<Arc<ChatHistoryEntry>>,
}

impl HistorySnapshot {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ChatHistoryEntry> {
        self.entries.get(index).map(Arc::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatHistoryEntry> {
        self.entries.iter().map(Arc::as_ref)
    }
}
