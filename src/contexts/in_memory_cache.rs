use crate::data::Cache;
use std::any::Any;
use std::marker::PhantomData;
use tracing::{debug, info};

/// InMemoryCache is an implementation of the Cache trait that holds its payload
/// in process memory.
///
/// Nothing survives a restart of the application, and two instances never
/// share state, so this is not a production caching mechanism.
pub struct InMemoryCache<T> {
    cache_type: String,
    cache: Option<Box<dyn Any>>,
    payload: PhantomData<fn() -> T>,
}

impl<T> InMemoryCache<T> {
    /// Creates a new InMemoryCache instance
    ///
    /// # Arguments
    /// * `cache_type` - A user-readable representation of the type being cached
    pub fn new(cache_type: impl Into<String>) -> Self {
        Self {
            cache_type: cache_type.into(),
            cache: None,
            payload: PhantomData,
        }
    }

    pub fn cache_type(&self) -> &str {
        &self.cache_type
    }
}

impl<T> Cache<T> for InMemoryCache<T> {
    type Repr = Box<dyn Any>;

    fn persist<S>(&mut self, payload: Option<T>, serialize: S)
    where
        S: FnOnce(T) -> Self::Repr,
    {
        let Some(payload) = payload else {
            debug!(cache_type = %self.cache_type, "Did not persist payload");
            return;
        };

        info!(cache_type = %self.cache_type, "Persisting payload");
        self.cache = Some(serialize(payload));
        debug!(cache_type = %self.cache_type, "Persisted payload");
    }

    fn retrieve<D>(&self, deserialize: D) -> Option<T>
    where
        D: FnOnce(&Self::Repr) -> Option<T>,
    {
        let Some(cache) = &self.cache else {
            debug!(cache_type = %self.cache_type, "Did not retrieve payload");
            return None;
        };

        info!(cache_type = %self.cache_type, "Retrieving payload");
        let payload = deserialize(cache);
        debug!(cache_type = %self.cache_type, "Retrieved payload");
        payload
    }
}

impl<T> std::fmt::Debug for InMemoryCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCache")
            .field("cache_type", &self.cache_type)
            .field("populated", &self.cache.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> InMemoryCache<String> {
        InMemoryCache::new("String")
    }

    #[test]
    fn test_persists_none() {
        let mut cache = cache();
        cache.persist_identity(None);
        assert_eq!(cache.retrieve_identity(), None);
    }

    #[test]
    fn test_persists_some() {
        let mut cache = cache();
        cache.persist_identity(Some("test-payload".to_string()));
        assert_eq!(cache.retrieve_identity(), Some("test-payload".to_string()));
    }

    #[test]
    fn test_calls_serializer_once() {
        let mut cache = cache();
        let mut calls = 0;

        cache.persist(Some("test-payload".to_string()), |payload| {
            calls += 1;
            Box::new(payload)
        });

        assert_eq!(calls, 1);
    }

    #[test]
    fn test_none_skips_serializer_and_keeps_value() {
        let mut cache = cache();
        cache.persist_identity(Some("first".to_string()));

        let mut called = false;
        cache.persist(None, |payload| {
            called = true;
            Box::new(payload)
        });

        assert!(!called);
        assert_eq!(cache.retrieve_identity(), Some("first".to_string()));
    }

    #[test]
    fn test_calls_deserializer_once() {
        let mut cache = cache();
        cache.persist_identity(Some("test-payload".to_string()));

        let mut calls = 0;
        let payload = cache.retrieve(|repr| {
            calls += 1;
            repr.downcast_ref::<String>().cloned()
        });

        assert_eq!(calls, 1);
        assert_eq!(payload, Some("test-payload".to_string()));
    }

    #[test]
    fn test_empty_cache_skips_deserializer() {
        let cache = cache();
        let mut called = false;

        let payload = cache.retrieve(|_| {
            called = true;
            Some("unexpected".to_string())
        });

        assert!(!called);
        assert_eq!(payload, None);
    }

    #[test]
    fn test_custom_transform_pair() {
        let mut cache: InMemoryCache<u32> = InMemoryCache::new("u32");
        cache.persist(Some(7), |n| Box::new(n.to_string()));

        let payload = cache.retrieve(|repr| repr.downcast_ref::<String>()?.parse().ok());
        assert_eq!(payload, Some(7));
    }

    #[test]
    fn test_mismatched_repr_reads_none() {
        let mut cache = cache();
        cache.persist(Some("text".to_string()), |_| Box::new(42u8));
        assert_eq!(cache.retrieve_identity(), None);
    }

    #[test]
    fn test_overwrites_slot() {
        let mut cache = cache();
        cache.persist_identity(Some("first".to_string()));
        cache.persist_identity(Some("second".to_string()));
        assert_eq!(cache.retrieve_identity(), Some("second".to_string()));
    }

    #[test]
    fn test_instances_are_independent() {
        let mut a = cache();
        let b = cache();
        a.persist_identity(Some("only-a".to_string()));
        assert_eq!(b.retrieve_identity(), None);
    }
}
