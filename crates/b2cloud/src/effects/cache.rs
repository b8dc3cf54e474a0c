use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Mutex;

/// A single cache slot with whole-value replacement and single-flight refresh.
///
/// Readers take an `Arc` snapshot under a short synchronous read lock and
/// never hold it across an await. Refreshes are serialized by an async gate:
/// the first caller that misses runs the refresh, later callers wait on the
/// gate and then re-check the slot before refreshing themselves. A refresh
/// that fails or is dropped leaves the previous value in place.
pub(crate) struct RefreshSlot<T> {
    current: RwLock<Option<Arc<T>>>,
    gate: Mutex<()>,
}

impl<T> Default for RefreshSlot<T> {
    fn default() -> Self {
        Self {
            current: RwLock::new(None),
            gate: Mutex::new(()),
        }
    }
}

impl<T> RefreshSlot<T> {
    pub(crate) fn new() -> Self { Self::default() }

    pub(crate) fn snapshot(&self) -> Option<Arc<T>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn replace(&self, value: T) -> Arc<T> {
        let value = Arc::new(value);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&value));
        value
    }

    pub(crate) fn clear(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Return the cached value if `is_usable` accepts it, otherwise run
    /// `refresh` (at most one at a time) and store its result.
    pub(crate) async fn get_or_refresh<F, Fut, E>(
        &self,
        is_usable: impl Fn(&T) -> bool,
        refresh: F,
    ) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.snapshot().filter(|v| is_usable(&**v)) {
            return Ok(value);
        }

        let _gate = self.gate.lock().await;
        if let Some(value) = self.snapshot().filter(|v| is_usable(&**v)) {
            return Ok(value);
        }

        let value = refresh().await?;
        Ok(self.replace(value))
    }
}
