//! Offset table with per-kind one-shot discovery state

use std::thread::{self, ThreadId};

use parking_lot::{Condvar, Mutex, RwLock};
use uelayout_sdk::{DescriptorKind, LayoutField};

use crate::gamedata::FallbackOffsets;

/// Discovery state of one descriptor kind
///
/// `NotAttempted -> Attempting -> { Resolved | FailedUsingFallback }`.
/// Both settled states are terminal.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindState {
    NotAttempted = 0,
    Attempting = 1,
    Resolved = 2,
    FailedUsingFallback = 3,
}

impl KindState {
    /// True once discovery has finished, successfully or not
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Resolved | Self::FailedUsingFallback)
    }
}

/// Where an offset came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetSource {
    Fallback,
    Discovered,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    offset: u32,
    source: OffsetSource,
}

#[derive(Debug)]
struct SlotState {
    state: KindState,
    owner: Option<ThreadId>,
}

#[derive(Debug)]
struct KindSlot {
    state: Mutex<SlotState>,
    settled: Condvar,
}

impl KindSlot {
    fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                state: KindState::NotAttempted,
                owner: None,
            }),
            settled: Condvar::new(),
        }
    }
}

/// Result of trying to start discovery for a kind
#[derive(Debug)]
pub enum Claim<'a> {
    /// The caller owns the scan and must settle it
    Claimed(ClaimGuard<'a>),
    /// Discovery already finished with this state
    Settled(KindState),
    /// The calling thread is already scanning this kind
    Reentrant,
}

/// Discovered offsets plus the discovery state of every kind
///
/// Offsets start at their fallbacks and are replaced at most once. Readers
/// never block on a scan; only [`OffsetTable::claim`] waits.
#[derive(Debug)]
pub struct OffsetTable {
    entries: RwLock<[Entry; LayoutField::COUNT]>,
    slots: [KindSlot; DescriptorKind::COUNT],
}

impl OffsetTable {
    /// Create a table seeded with `fallback`
    pub fn new(fallback: &FallbackOffsets) -> Self {
        let entries = LayoutField::ALL.map(|field| Entry {
            offset: fallback.get(field),
            source: OffsetSource::Fallback,
        });

        Self {
            entries: RwLock::new(entries),
            slots: [(); DescriptorKind::COUNT].map(|_| KindSlot::new()),
        }
    }

    /// Current offset of `field`
    pub fn offset(&self, field: LayoutField) -> u32 {
        self.entries.read()[field.index()].offset
    }

    /// Where the current offset of `field` came from
    pub fn source(&self, field: LayoutField) -> OffsetSource {
        self.entries.read()[field.index()].source
    }

    /// True if `field` was discovered rather than left at its fallback
    pub fn is_discovered(&self, field: LayoutField) -> bool {
        self.source(field) == OffsetSource::Discovered
    }

    /// Every offset in `LayoutField` order
    pub fn snapshot(&self) -> [u32; LayoutField::COUNT] {
        self.entries.read().map(|entry| entry.offset)
    }

    /// Current state of `kind`
    pub fn state(&self, kind: DescriptorKind) -> KindState {
        self.slots[kind.index()].state.lock().state
    }

    /// Start discovery for `kind`
    ///
    /// The first caller gets [`Claim::Claimed`]. Callers on other threads
    /// block until the owner settles, then get [`Claim::Settled`]. A call
    /// from the owning thread itself returns [`Claim::Reentrant`].
    pub fn claim(&self, kind: DescriptorKind) -> Claim<'_> {
        let slot = &self.slots[kind.index()];
        let current = thread::current().id();
        let mut state = slot.state.lock();

        loop {
            match state.state {
                KindState::NotAttempted => {
                    state.state = KindState::Attempting;
                    state.owner = Some(current);
                    return Claim::Claimed(ClaimGuard {
                        table: self,
                        kind,
                        settled: false,
                    });
                }
                KindState::Attempting if state.owner == Some(current) => {
                    return Claim::Reentrant;
                }
                KindState::Attempting => slot.settled.wait(&mut state),
                settled => return Claim::Settled(settled),
            }
        }
    }

    /// Replace a fallback with a discovered offset; returns false if already set
    fn commit(&self, field: LayoutField, offset: u32) -> bool {
        let mut entries = self.entries.write();
        let entry = &mut entries[field.index()];
        if entry.source == OffsetSource::Discovered {
            return false;
        }
        *entry = Entry {
            offset,
            source: OffsetSource::Discovered,
        };
        true
    }

    fn settle(&self, kind: DescriptorKind, outcome: KindState) {
        let slot = &self.slots[kind.index()];
        let mut state = slot.state.lock();
        state.state = outcome;
        state.owner = None;
        slot.settled.notify_all();
    }
}

/// Exclusive right to run discovery for one kind
///
/// Dropping the guard without settling (e.g. during a panic) settles the
/// kind as [`KindState::FailedUsingFallback`].
#[derive(Debug)]
pub struct ClaimGuard<'a> {
    table: &'a OffsetTable,
    kind: DescriptorKind,
    settled: bool,
}

impl ClaimGuard<'_> {
    /// Kind being discovered
    pub fn kind(&self) -> DescriptorKind {
        self.kind
    }

    /// Record a discovered offset
    ///
    /// Offsets are write-once: returns false if `field` was already discovered.
    pub fn commit(&self, field: LayoutField, offset: u32) -> bool {
        self.table.commit(field, offset)
    }

    /// Settle as resolved
    pub fn resolve(self) -> KindState {
        self.finish(KindState::Resolved)
    }

    /// Settle as failed, keeping fallbacks for anything not committed
    pub fn fail(self) -> KindState {
        self.finish(KindState::FailedUsingFallback)
    }

    fn finish(mut self, outcome: KindState) -> KindState {
        self.settled = true;
        self.table.settle(self.kind, outcome);
        outcome
    }
}

impl Drop for ClaimGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            if thread::panicking() {
                tracing::error!("[{}] Discovery panicked, using fallback offsets", self.kind);
            }
            self.table.settle(self.kind, KindState::FailedUsingFallback);
        }
    }
}
