//! Load-once collection state shared by the list views.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use licverify_api::ApiError;
use tracing::warn;

use crate::lock;

/// Items, loading flag and last error of a fetched collection.
///
/// Everything sits behind `&self` so the view can be rendered while a
/// fetch is in flight.
#[derive(Debug)]
pub struct ListState<T> {
    items: Mutex<Vec<T>>,
    loading: AtomicUsize,
    error: Mutex<Option<String>>,
}

/// Clears one unit of the loading count on drop.
struct LoadingGuard<'a>(&'a AtomicUsize);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl<T: Clone> ListState<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            loading: AtomicUsize::new(0),
            error: Mutex::new(None),
        }
    }

    /// Run one fetch. Failure clears any stale items.
    pub async fn load<F>(&self, what: &str, fetch: F)
    where
        F: Future<Output = Result<Vec<T>, ApiError>>,
    {
        self.loading.fetch_add(1, Ordering::AcqRel);
        let _guard = LoadingGuard(&self.loading);
        *lock(&self.error) = None;

        match fetch.await {
            Ok(items) => *lock(&self.items) = items,
            Err(e) => {
                warn!(error = %e, "failed to load {what}");
                lock(&self.items).clear();
                *lock(&self.error) = Some(format!("Failed to load {what}: {e}"));
            }
        }
    }

    pub fn items(&self) -> Vec<T> {
        lock(&self.items).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.items).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.items).is_empty()
    }

    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        lock(&self.items).iter().find(|item| pred(item)).cloned()
    }

    pub fn retain(&self, keep: impl FnMut(&T) -> bool) {
        lock(&self.items).retain(keep);
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire) > 0
    }

    pub fn error(&self) -> Option<String> {
        lock(&self.error).clone()
    }
}

impl<T: Clone> Default for ListState<T> {
    fn default() -> Self {
        Self::new()
    }
}
