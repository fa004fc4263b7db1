mod bundle;
mod cache;
mod error;

pub use bundle::Bundle;
pub use cache::{Cache, Identity, Transform};
pub use error::CacheError;
