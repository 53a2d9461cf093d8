//! Re-armable, multi-waiter value cell.
//!
//! A [`FutureCell`] is not a one-shot promise. Each [`FutureCell::set`]
//! delivers its value to the waiters queued at that moment and then returns
//! the cell to the unset state, ready for the next round. Waiters that arrive
//! after a `set` has finished wait for the next one.
//!
//! The cell is single-threaded (`!Send`): registration and delivery are both
//! synchronous and nothing suspends inside `wait` or `set`.
//!
//! # Reentrancy
//!
//! Delivery iterates a snapshot of the queue taken when `set` starts, so a
//! callback may call `wait` or `set` on the same cell:
//!
//! - `wait` from inside a callback sees the value being delivered and fires
//!   immediately.
//! - A nested `set` delivers to whatever is queued at that point, then the
//!   outer delivery resumes with its own value.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use futures::channel::oneshot;
use tracing::trace;

type Waiter<T> = Box<dyn FnOnce(&T)>;

/// Settable value cell that notifies every queued waiter on each `set`.
pub struct FutureCell<T> {
    value: RefCell<Option<Rc<T>>>,
    waiters: RefCell<Vec<Waiter<T>>>,
}

impl<T> FutureCell<T> {
    /// Create an unset cell with no waiters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: RefCell::new(None),
            waiters: RefCell::new(Vec::new()),
        }
    }

    /// Register `callback` for the current or next value.
    ///
    /// Fires synchronously when a value is being delivered right now,
    /// otherwise queues until the next [`set`](Self::set). Returns the cell
    /// for chaining.
    pub fn wait(&self, callback: impl FnOnce(&T) + 'static) -> &Self {
        let current = self.value.borrow().clone();
        match current {
            Some(value) => callback(&value),
            None => self.waiters.borrow_mut().push(Box::new(callback)),
        }
        self
    }

    /// Alias for [`wait`](Self::wait).
    pub fn get(&self, callback: impl FnOnce(&T) + 'static) -> &Self {
        self.wait(callback)
    }

    /// Deliver `value` to every queued waiter in registration order, then
    /// return to the unset state.
    ///
    /// # Panics
    ///
    /// A panicking waiter propagates out of `set`. The cell still returns to
    /// its prior state, and the waiters after it in the snapshot are dropped
    /// without being called.
    pub fn set(&self, value: T) {
        let value = Rc::new(value);
        let _restore = Restore {
            slot: &self.value,
            previous: self.value.replace(Some(Rc::clone(&value))),
        };
        let waiters = std::mem::take(&mut *self.waiters.borrow_mut());

        trace!(waiters = waiters.len(), "delivering future cell value");
        for waiter in waiters {
            waiter(&value);
        }
    }

    /// Number of waiters queued for the next `set`.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.waiters.borrow().len()
    }

    /// True only while a `set` is delivering.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.value.borrow().is_some()
    }
}

impl<T: Clone + 'static> FutureCell<T> {
    /// Await the next value from async code.
    ///
    /// Resolves with [`oneshot::Canceled`] if the cell is dropped before a
    /// value arrives.
    pub fn next(&self) -> oneshot::Receiver<T> {
        let (tx, rx) = oneshot::channel();
        self.wait(move |value: &T| {
            let _ = tx.send(value.clone());
        });
        rx
    }
}

impl<T> Default for FutureCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Puts back the value that was current before a `set`, on return or unwind.
struct Restore<'a, T> {
    slot: &'a RefCell<Option<Rc<T>>>,
    previous: Option<Rc<T>>,
}

impl<T> Drop for Restore<'_, T> {
    fn drop(&mut self) {
        self.slot.replace(self.previous.take());
    }
}

impl<T> fmt::Debug for FutureCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FutureCell")
            .field("is_set", &self.is_set())
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&'static str) -> Box<dyn FnOnce(&String)>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let make = move |tag: &'static str| -> Box<dyn FnOnce(&String)> {
            let sink = Rc::clone(&sink);
            Box::new(move |value: &String| sink.borrow_mut().push(format!("{tag}:{value}")))
        };
        (log, make)
    }

    #[test]
    fn set_delivers_to_waiters_in_order() {
        let cell = FutureCell::new();
        let (log, waiter) = recorder();

        cell.wait(waiter("first")).wait(waiter("second"));
        assert_eq!(cell.pending(), 2);

        cell.set("v".to_string());
        assert_eq!(*log.borrow(), vec!["first:v", "second:v"]);
        assert_eq!(cell.pending(), 0);
        assert!(!cell.is_set());
    }

    #[test]
    fn late_waiter_fires_only_on_next_set() {
        let cell = FutureCell::new();
        let (log, waiter) = recorder();

        cell.wait(waiter("first")).wait(waiter("second"));
        cell.set("v".to_string());

        cell.wait(waiter("third"));
        assert_eq!(log.borrow().len(), 2);

        cell.set("w".to_string());
        assert_eq!(*log.borrow(), vec!["first:v", "second:v", "third:w"]);
    }

    #[test]
    fn set_without_waiters_is_not_remembered() {
        let cell = FutureCell::new();
        let (log, waiter) = recorder();

        cell.set("lost".to_string());
        cell.get(waiter("late"));
        assert!(log.borrow().is_empty());
        assert_eq!(cell.pending(), 1);
    }

    #[test]
    fn wait_during_delivery_fires_immediately() {
        let cell = Rc::new(FutureCell::new());
        let (log, waiter) = recorder();

        let inner_cell = Rc::clone(&cell);
        let inner = waiter("inner");
        cell.wait(move |_: &String| {
            assert!(inner_cell.is_set());
            inner_cell.wait(inner);
        });

        cell.set("v".to_string());
        assert_eq!(*log.borrow(), vec!["inner:v"]);
        assert_eq!(cell.pending(), 0);
    }

    #[test]
    fn nested_set_does_not_disturb_outer_delivery() {
        let cell = Rc::new(FutureCell::new());
        let (log, waiter) = recorder();

        let nested = Rc::clone(&cell);
        cell.wait(move |_: &String| nested.set("inner".to_string()));
        cell.wait(waiter("outer"));

        cell.set("v".to_string());
        assert_eq!(*log.borrow(), vec!["outer:v"]);
        assert!(!cell.is_set());
    }

    #[test]
    fn panicking_waiter_leaves_cell_unset() {
        let cell = FutureCell::new();
        let (log, waiter) = recorder();

        cell.wait(|_: &String| panic!("waiter failed"));
        cell.wait(waiter("skipped"));
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            cell.set("v".to_string());
        }));

        assert!(outcome.is_err());
        assert!(!cell.is_set());
        assert_eq!(cell.pending(), 0);

        cell.wait(waiter("late"));
        assert!(log.borrow().is_empty());

        cell.set("w".to_string());
        assert_eq!(*log.borrow(), vec!["late:w"]);
    }

    #[test]
    fn cell_rearms_across_rounds() {
        let cell = FutureCell::new();
        for round in 0..3 {
            let seen = Rc::new(RefCell::new(None));
            let sink = Rc::clone(&seen);
            cell.wait(move |value: &u32| *sink.borrow_mut() = Some(*value));
            cell.set(round);
            assert_eq!(*seen.borrow(), Some(round));
        }
    }

    #[test]
    fn next_resolves_from_async_code() {
        let cell = FutureCell::new();
        let pending = cell.next();
        cell.set(7_u32);
        assert_eq!(block_on(pending), Ok(7));
    }

    #[test]
    fn next_is_canceled_when_cell_drops() {
        let cell: FutureCell<u32> = FutureCell::new();
        let pending = cell.next();
        drop(cell);
        assert!(block_on(pending).is_err());
    }
}
