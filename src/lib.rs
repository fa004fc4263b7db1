//! Single-slot caches with caller-supplied transforms.
//!
//! [`InMemoryCache`] keeps its payload in process memory.
//! [`PropertyListCache`] writes it as a binary property list into the cache
//! directory of a [`Bundle`]. Both implement [`Cache`], and neither ever
//! returns an error: failures are logged through `tracing` and read as a miss.

pub mod contexts;
pub mod data;

pub use contexts::{InMemoryCache, PropertyListCache};
pub use data::{Bundle, Cache, CacheError, Identity, Transform};
