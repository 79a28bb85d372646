//! Per-thread state stamped into every rendered line.
//!
//! The context key is a short string a thread sets once to correlate its
//! records with a logical unit of work. It is genuine thread-local storage:
//! not synchronized (only the owning thread writes it) and not inherited by
//! spawned threads, which must set their own key explicitly. The default is
//! the empty string.

use std::cell::{Cell, RefCell};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

thread_local! {
    static CONTEXT_KEY: RefCell<String> = const { RefCell::new(String::new()) };
    static THREAD_ID: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Sets the calling thread's context key. Every record this thread emits
/// carries the key until it is overwritten.
pub fn set_thread_context_key(key: &str) {
    CONTEXT_KEY.with(|slot| {
        let mut current = slot.borrow_mut();
        current.clear();
        current.push_str(key);
    });
}

/// Runs `f` with the calling thread's current context key.
pub(crate) fn with_thread_context_key<R>(f: impl FnOnce(&str) -> R) -> R {
    CONTEXT_KEY.with(|slot| f(slot.borrow().as_str()))
}

/// A stable numeric identifier for the calling thread, derived by hashing
/// its `ThreadId` once and caching the result.
pub(crate) fn current_thread_id() -> u64 {
    THREAD_ID.with(|slot| match slot.get() {
        Some(id) => id,
        None => {
            let mut hasher = DefaultHasher::new();
            thread::current().id().hash(&mut hasher);
            let id = hasher.finish();
            slot.set(Some(id));
            id
        }
    })
}
