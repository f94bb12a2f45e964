//! Rendered-page cache bookkeeping.

mod page_cache;

pub use page_cache::PageCache;
