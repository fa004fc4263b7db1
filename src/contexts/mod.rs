mod in_memory_cache;
pub mod property_list;
mod property_list_cache;

pub use in_memory_cache::InMemoryCache;
pub use property_list_cache::{Location, PropertyListCache};
