//! Driven ports for invalidating rendered pages after a write and observing
//! those invalidations.

use tokio::sync::watch;

/// Marks a rendered path stale so the next render recomputes it.
#[cfg_attr(test, mockall::automock)]
pub trait PageRevalidator: Send + Sync {
    fn revalidate_path(&self, path: &str);
}

/// Publishes a generation counter per path that advances on every
/// revalidation.
pub trait PageInvalidations: Send + Sync {
    fn subscribe(&self, path: &str) -> watch::Receiver<u64>;
}

/// Path of the users page, the only page whose rendering depends on stored
/// users.
pub const USERS_PAGE_PATH: &str = "/";
