//! Loader capabilities injected into the batch loader.
//!
//! Transport (HTTP, sockets, fixtures) lives behind these traits; the batch
//! loader only coordinates completion.

use futures::future::LocalBoxFuture;

use crate::payload::LoadOptions;

/// Completion handler for [`CallbackLoader`].
pub type Completion<T, E> = Box<dyn FnOnce(Result<T, E>)>;

/// Fetches one resource and yields its result as a future.
///
/// The future is not required to be `Send`, so loaders may keep `Rc` and
/// `RefCell` state and batches run on a single-threaded executor.
pub trait Loader {
    type Output;
    type Error;

    /// Start fetching `resource`. The returned future resolves once, with
    /// the decoded payload or the transport failure.
    fn load(&self, resource: &str, opts: &LoadOptions)
    -> LocalBoxFuture<'_, Result<Self::Output, Self::Error>>;
}

/// Fetches one resource and reports its result through a callback.
///
/// `done` is called exactly once, either before `load` returns or later from
/// the same thread.
pub trait CallbackLoader {
    type Output;
    type Error;

    fn load(
        &self,
        resource: &str,
        opts: &LoadOptions,
        done: Completion<Self::Output, Self::Error>,
    );
}

impl<L: Loader + ?Sized> Loader for &L {
    type Output = L::Output;
    type Error = L::Error;

    fn load(
        &self,
        resource: &str,
        opts: &LoadOptions,
    ) -> LocalBoxFuture<'_, Result<Self::Output, Self::Error>> {
        (**self).load(resource, opts)
    }
}
