//! Generation-counter page cache implementing `PageRevalidator` and
//! `PageInvalidations`.
//!
//! Pages are rendered per request, so nothing is stored here beyond a
//! generation number per path. Revalidating a path bumps its generation and
//! notifies subscribers over a `watch` channel; the management console uses
//! that signal to re-fetch its list.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, error};

use crate::domain::ports::{PageInvalidations, PageRevalidator};

/// Shared handle; clones observe the same generations.
#[derive(Clone, Default)]
pub struct PageCache {
    paths: Arc<Mutex<HashMap<String, watch::Sender<u64>>>>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receiver notified whenever `path` is revalidated.
    ///
    /// # Examples
    /// ```
    /// use user_admin::domain::ports::PageRevalidator;
    /// use user_admin::outbound::cache::PageCache;
    ///
    /// let cache = PageCache::new();
    /// let mut home = cache.subscribe("/");
    /// cache.revalidate_path("/");
    /// assert!(home.has_changed().expect("sender alive"));
    /// assert_eq!(*home.borrow_and_update(), 1);
    /// ```
    pub fn subscribe(&self, path: &str) -> watch::Receiver<u64> {
        match self.paths.lock() {
            Ok(mut paths) => paths
                .entry(path.to_owned())
                .or_insert_with(|| watch::channel(0).0)
                .subscribe(),
            Err(_) => {
                error!(path, "page cache lock poisoned; subscription will never fire");
                watch::channel(0).1
            }
        }
    }

    /// Current generation of `path`; zero when never revalidated.
    pub fn generation(&self, path: &str) -> u64 {
        self.paths
            .lock()
            .ok()
            .and_then(|paths| paths.get(path).map(|sender| *sender.borrow()))
            .unwrap_or(0)
    }
}

impl PageInvalidations for PageCache {
    fn subscribe(&self, path: &str) -> watch::Receiver<u64> {
        Self::subscribe(self, path)
    }
}

impl PageRevalidator for PageCache {
    fn revalidate_path(&self, path: &str) {
        let Ok(mut paths) = self.paths.lock() else {
            error!(path, "page cache lock poisoned; revalidation dropped");
            return;
        };
        let sender = paths
            .entry(path.to_owned())
            .or_insert_with(|| watch::channel(0).0);
        sender.send_modify(|generation| *generation = generation.wrapping_add(1));
        debug!(path, generation = *sender.borrow(), "page revalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn revalidation_bumps_only_the_named_path() {
        let cache = PageCache::new();
        cache.revalidate_path("/");
        cache.revalidate_path("/");
        cache.revalidate_path("/other");

        assert_eq!(cache.generation("/"), 2);
        assert_eq!(cache.generation("/other"), 1);
        assert_eq!(cache.generation("/never"), 0);
    }

    #[tokio::test]
    async fn subscribers_wake_on_revalidation() {
        let cache = PageCache::new();
        let mut home = cache.subscribe("/");

        let notifier = cache.clone();
        tokio::spawn(async move { notifier.revalidate_path("/") });

        home.changed().await.expect("sender alive");
        assert_eq!(*home.borrow_and_update(), 1);
    }

    #[rstest]
    fn subscribers_ignore_other_paths() {
        let cache = PageCache::new();
        let home = cache.subscribe("/");
        cache.revalidate_path("/other");
        assert!(!home.has_changed().expect("sender alive"));
    }
}
