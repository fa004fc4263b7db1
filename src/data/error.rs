use std::path::PathBuf;
use thiserror::Error;

/// Failures a cache handles internally.
///
/// None of these escape the public `Cache` operations: each one is logged and
/// turned into a no-op or a miss at the call site.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("payload cannot be stored as a property list: {0}")]
    Encode(String),

    #[error("failed to write cache file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cache data cannot be decoded: {0}")]
    Decode(String),
}
