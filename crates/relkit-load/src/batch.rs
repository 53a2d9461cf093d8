//! Fetch many resources at once and resolve when all complete.
//!
//! Two variants share the same contract:
//!
//! - [`load_all`] drives [`Loader`] futures with `try_join_all`.
//! - [`load_all_into`] drives [`CallbackLoader`]s and settles a
//!   [`FutureCell`], for callback-style single-threaded hosts.
//!
//! # Contract
//!
//! - A scalar resource is fetched as a one-element batch and its result is
//!   unwrapped into [`Loaded::One`].
//! - Results are positioned by input order, never by completion order.
//! - The first failure fails the whole batch and is returned unchanged;
//!   results of the other fetches are dropped.
//! - No retries, no timeouts. Those belong to the loader.

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::try_join_all;
use relkit_core::FutureCell;
use tracing::{debug, instrument, trace, warn};

use crate::loader::{CallbackLoader, Completion, Loader};
use crate::payload::LoadOptions;

// ---------------------------------------------------------------------------
// Resources / Loaded
// ---------------------------------------------------------------------------

/// A single resource or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resources {
    One(String),
    Many(Vec<String>),
}

impl Resources {
    /// The resources as a list; a scalar becomes a one-element slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(resource) => std::slice::from_ref(resource),
            Self::Many(resources) => resources,
        }
    }

    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Self::One(_))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl From<&str> for Resources {
    fn from(resource: &str) -> Self {
        Self::One(resource.to_string())
    }
}

impl From<String> for Resources {
    fn from(resource: String) -> Self {
        Self::One(resource)
    }
}

impl From<Vec<String>> for Resources {
    fn from(resources: Vec<String>) -> Self {
        Self::Many(resources)
    }
}

impl From<Vec<&str>> for Resources {
    fn from(resources: Vec<&str>) -> Self {
        Self::Many(resources.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Resources {
    fn from(resources: [&str; N]) -> Self {
        Self::Many(resources.into_iter().map(str::to_string).collect())
    }
}

/// Results of a batch, shaped like the [`Resources`] that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Loaded<T> {
    fn from_results(scalar: bool, results: Vec<T>) -> Self {
        if !scalar {
            return Self::Many(results);
        }
        match <[T; 1]>::try_from(results) {
            Ok([only]) => Self::One(only),
            Err(results) => Self::Many(results),
        }
    }

    /// Flatten into a list in input order.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(only) => vec![only],
            Self::Many(all) => all,
        }
    }
}

// ---------------------------------------------------------------------------
// Future-based batch
// ---------------------------------------------------------------------------

/// Fetch every resource concurrently through `loader`.
///
/// # Errors
///
/// Returns the error of the first fetch observed to fail, unchanged.
#[allow(clippy::future_not_send)]
#[instrument(level = "debug", skip_all)]
pub async fn load_all<L>(
    loader: &L,
    resources: impl Into<Resources>,
    opts: &LoadOptions,
) -> Result<Loaded<L::Output>, L::Error>
where
    L: Loader + ?Sized,
{
    let resources = resources.into();
    debug!(
        count = resources.len(),
        response_type = opts.response_type.as_str(),
        "issuing batch fetch"
    );

    let fetches = resources
        .as_slice()
        .iter()
        .map(|resource| loader.load(resource, opts));

    match try_join_all(fetches).await {
        Ok(results) => {
            debug!(count = results.len(), "batch fetch complete");
            Ok(Loaded::from_results(resources.is_scalar(), results))
        }
        Err(err) => {
            warn!(count = resources.len(), "batch fetch failed");
            Err(err)
        }
    }
}

// ---------------------------------------------------------------------------
// FutureCell-based batch
// ---------------------------------------------------------------------------

/// Outcome delivered to the cell passed to [`load_all_into`].
pub type BatchOutcome<T, E> = Result<Loaded<T>, E>;

/// Fetch every resource through a callback loader and settle `cell` once.
///
/// `cell` is set exactly once: with the first error, or with all results
/// once every position is filled. Register waiters on `cell` before calling;
/// a loader that completes synchronously settles the cell before this
/// function returns.
pub fn load_all_into<L>(
    loader: &L,
    resources: impl Into<Resources>,
    opts: &LoadOptions,
    cell: &Rc<FutureCell<BatchOutcome<L::Output, L::Error>>>,
) where
    L: CallbackLoader + ?Sized,
    L::Output: 'static,
    L::Error: 'static,
{
    let resources = resources.into();
    let scalar = resources.is_scalar();
    debug!(count = resources.len(), "issuing callback batch fetch");

    if resources.is_empty() {
        cell.set(Ok(Loaded::Many(Vec::new())));
        return;
    }

    let batch: Rc<RefCell<PendingBatch<L::Output, L::Error>>> =
        Rc::new(RefCell::new(PendingBatch::new(resources.len(), scalar)));
    for (position, resource) in resources.as_slice().iter().enumerate() {
        let batch = Rc::clone(&batch);
        let cell = Rc::clone(cell);
        let done: Completion<L::Output, L::Error> = Box::new(move |result| {
            let settled = batch.borrow_mut().complete(position, result);
            if let Some(outcome) = settled {
                cell.set(outcome);
            }
        });
        loader.load(resource, opts, done);
    }
}

/// Result slots for one callback batch. Each position is written once.
struct PendingBatch<T, E> {
    slots: Vec<Option<T>>,
    remaining: usize,
    scalar: bool,
    settled: bool,
    _error: std::marker::PhantomData<fn() -> E>,
}

impl<T, E> PendingBatch<T, E> {
    fn new(len: usize, scalar: bool) -> Self {
        Self {
            slots: std::iter::repeat_with(|| None).take(len).collect(),
            remaining: len,
            scalar,
            settled: false,
            _error: std::marker::PhantomData,
        }
    }

    /// Record one completion; returns the outcome when the batch settles.
    fn complete(&mut self, position: usize, result: Result<T, E>) -> Option<BatchOutcome<T, E>> {
        if self.settled {
            trace!(position, "ignoring completion after batch settled");
            return None;
        }

        match result {
            Err(err) => {
                warn!(position, "fetch failed; failing batch");
                self.settled = true;
                self.slots.clear();
                Some(Err(err))
            }
            Ok(value) => {
                let slot = self.slots.get_mut(position)?;
                if slot.replace(value).is_none() {
                    self.remaining -= 1;
                }
                if self.remaining > 0 {
                    return None;
                }

                self.settled = true;
                let results: Vec<T> = self.slots.drain(..).flatten().collect();
                debug!(count = results.len(), "callback batch fetch complete");
                Some(Ok(Loaded::from_results(self.scalar, results)))
            }
        }
    }
}
