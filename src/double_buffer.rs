//! The producer/consumer hand-off at the heart of the engine.
//!
//! Two owned, fixed-capacity byte regions trade roles: producers append to
//! the frontend region under a mutex; the consumer exchanges its spare
//! region for the filled frontend (an O(1) ownership swap, never a byte
//! copy) and drains it outside the lock. The shutdown flag lives inside the
//! same mutex as the offset so neither side can miss the final wake during
//! teardown.

use parking_lot::{Condvar, Mutex};

use crate::config::CongestionControlPolicy;

/// Result of a producer append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PushOutcome {
    /// The record's bytes were copied into the frontend region.
    Queued,
    /// The record was discarded: frontend full under the Dropping policy,
    /// or the record can never fit a region of this capacity.
    Dropped,
    /// The pipeline is tearing down; the record was discarded.
    ShutDown,
}

/// Result of a consumer drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DrainOutcome {
    /// The caller's spare region now holds this many pending bytes.
    Drained(usize),
    /// Shutdown was requested and no bytes remain.
    ShutDown,
}

struct Frontend {
    region: Box<[u8]>,
    offset: usize,
    shutdown: bool,
}

pub(crate) struct DoubleBuffer {
    capacity: usize,
    frontend: Mutex<Frontend>,
    not_full: Condvar,
    not_empty: Condvar,
}

impl DoubleBuffer {
    /// Allocates both regions. The second region is returned to the caller
    /// and becomes the consumer's spare; `drain_into` exchanges the two.
    pub(crate) fn new(capacity: usize) -> (Self, Box<[u8]>) {
        let buffer = Self {
            capacity,
            frontend: Mutex::new(Frontend {
                region: vec![0u8; capacity].into_boxed_slice(),
                offset: 0,
                shutdown: false,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        };
        (buffer, vec![0u8; capacity].into_boxed_slice())
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends one record to the frontend region.
    ///
    /// The capacity check happens exactly once: with insufficient room the
    /// Dropping policy discards immediately while the Blocking policy waits
    /// on the not-full condition, re-checking the predicate on every wake.
    /// A caller never both drops and waits. The mutex is held across the
    /// whole byte copy, so no two producers can observe overlapping
    /// destination ranges.
    pub(crate) fn push(&self, record: &[u8], policy: CongestionControlPolicy) -> PushOutcome {
        // A record this long can never satisfy the wait predicate; blocking
        // on it would never return.
        if record.len() >= self.capacity {
            return PushOutcome::Dropped;
        }
        let mut frontend = self.frontend.lock();
        if frontend.shutdown {
            return PushOutcome::ShutDown;
        }
        if frontend.offset + record.len() >= self.capacity {
            match policy {
                CongestionControlPolicy::Dropping => return PushOutcome::Dropped,
                CongestionControlPolicy::Blocking => {
                    while frontend.offset + record.len() >= self.capacity && !frontend.shutdown {
                        self.not_full.wait(&mut frontend);
                    }
                    if frontend.shutdown {
                        return PushOutcome::ShutDown;
                    }
                }
            }
        }
        let offset = frontend.offset;
        frontend.region[offset..offset + record.len()].copy_from_slice(record);
        frontend.offset = offset + record.len();
        self.not_empty.notify_one();
        PushOutcome::Queued
    }

    /// Blocks until bytes are pending or shutdown is requested, then swaps
    /// the filled frontend region with the caller's spare and resets the
    /// offset. The caller drains `spare[..n]` with no lock held.
    ///
    /// After shutdown, pending bytes are still handed out once; only an
    /// empty frontend reports `ShutDown`.
    pub(crate) fn drain_into(&self, spare: &mut Box<[u8]>) -> DrainOutcome {
        let mut frontend = self.frontend.lock();
        while frontend.offset == 0 && !frontend.shutdown {
            self.not_empty.wait(&mut frontend);
        }
        if frontend.offset == 0 {
            return DrainOutcome::ShutDown;
        }
        std::mem::swap(&mut frontend.region, spare);
        let drained = frontend.offset;
        frontend.offset = 0;
        self.not_full.notify_all();
        DrainOutcome::Drained(drained)
    }

    /// Requests teardown and wakes both sides. Producers parked on the
    /// not-full condition return `ShutDown`; the consumer drains at most
    /// one final time.
    pub(crate) fn shutdown(&self) {
        let mut frontend = self.frontend.lock();
        frontend.shutdown = true;
        drop(frontend);
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }
}
