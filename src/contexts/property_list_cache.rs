use crate::contexts::property_list;
use crate::data::{Bundle, Cache, CacheError};
use plist::Value;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

const EXTENSION: &str = "plist";

/// Where a PropertyListCache keeps its file, decided once at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Located(PathBuf),
    Unavailable,
}

/// PropertyListCache is an implementation of the Cache trait that persists its
/// payload as a binary property list in the cache directory of a bundle.
///
/// The file lives at `{cache root}/{bundle identifier}/{cache type}.plist` and
/// survives restarts. Cached data must be made up of property list types:
/// strings, integers, finite reals, booleans, data, arrays and dictionaries.
/// If the location cannot be resolved every operation is a no-op.
#[derive(Debug)]
pub struct PropertyListCache<T> {
    cache_type: String,
    location: Location,
    payload: PhantomData<fn() -> T>,
}

impl<T> PropertyListCache<T> {
    /// Creates a new PropertyListCache instance
    ///
    /// # Arguments
    /// * `cache_type` - A user-readable representation of the type being cached,
    ///   also used as the file name
    /// * `bundle` - The bundle whose cache directory the file is written into
    pub fn new(cache_type: impl Into<String>, bundle: &Bundle) -> Self {
        let cache_type = cache_type.into();
        let location = match Self::resolve(&cache_type, bundle) {
            Ok(path) => Location::Located(path),
            Err(e) => {
                warn!(cache_type = %cache_type, error = %e, "Cache disabled");
                Location::Unavailable
            }
        };

        Self {
            cache_type,
            location,
            payload: PhantomData,
        }
    }

    /// Creates a PropertyListCache in the running program's bundle
    pub fn in_main_bundle(cache_type: impl Into<String>) -> Self {
        Self::new(cache_type, &Bundle::main())
    }

    pub fn cache_type(&self) -> &str {
        &self.cache_type
    }

    /// The file this cache reads and writes, if one could be resolved
    pub fn location(&self) -> Option<&Path> {
        match &self.location {
            Location::Located(path) => Some(path),
            Location::Unavailable => None,
        }
    }

    fn resolve(cache_type: &str, bundle: &Bundle) -> Result<PathBuf, CacheError> {
        if cache_type.is_empty() || cache_type.contains(['/', '\\']) {
            return Err(CacheError::LocationUnavailable(format!(
                "cache type {:?} is not a valid file name",
                cache_type
            )));
        }

        let directory = bundle.cache_directory()?;
        Ok(directory.join(format!("{}.{}", cache_type, EXTENSION)))
    }

    fn read(&self, path: &Path) -> Option<Value> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                // Never persisted, or unreadable - both are a miss
                debug!(cache_type = %self.cache_type, path = %path.display(), error = %e, "No cache file");
                return None;
            }
        };

        match property_list::decode(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                error!(cache_type = %self.cache_type, path = %path.display(), error = %e, "Unable to convert data to property list");
                None
            }
        }
    }

    fn store(&self, path: &Path, value: &Value) {
        debug!(path = %path.display(), "Persisting to file");

        let written = property_list::encode(value)
            .and_then(|bytes| property_list::write_atomically(path, &bytes));

        match written {
            Ok(()) => debug!(cache_type = %self.cache_type, "Persisted payload"),
            Err(e) => error!(cache_type = %self.cache_type, error = %e, "Did not persist payload"),
        }
    }
}

impl<T> Cache<T> for PropertyListCache<T> {
    type Repr = Value;

    fn persist<S>(&mut self, payload: Option<T>, serialize: S)
    where
        S: FnOnce(T) -> Self::Repr,
    {
        let (Location::Located(path), Some(payload)) = (&self.location, payload) else {
            debug!(cache_type = %self.cache_type, "Did not persist payload");
            return;
        };

        info!(cache_type = %self.cache_type, "Persisting payload");
        let value = serialize(payload);
        self.store(path, &value);
    }

    fn retrieve<D>(&self, deserialize: D) -> Option<T>
    where
        D: FnOnce(&Self::Repr) -> Option<T>,
    {
        let Location::Located(path) = &self.location else {
            debug!(cache_type = %self.cache_type, "Did not retrieve payload");
            return None;
        };

        let Some(value) = self.read(path) else {
            debug!(cache_type = %self.cache_type, "Did not retrieve payload");
            return None;
        };

        info!(cache_type = %self.cache_type, "Retrieving payload");
        debug!(path = %path.display(), "Retrieving from file");

        let payload = deserialize(&value);
        debug!(cache_type = %self.cache_type, "Retrieved payload");
        payload
    }
}

impl<T: Serialize> PropertyListCache<T> {
    /// Persists a payload by mapping it to a property list with serde.
    ///
    /// A payload serde cannot express as a storable property list is logged
    /// and not written.
    pub fn persist_serialized(&mut self, payload: Option<&T>) {
        let (Location::Located(path), Some(payload)) = (&self.location, payload) else {
            debug!(cache_type = %self.cache_type, "Did not persist payload");
            return;
        };

        let value = match plist::to_value(payload) {
            Ok(value) => value,
            Err(e) => {
                error!(cache_type = %self.cache_type, error = %e, "Payload cannot be converted to a property list");
                return;
            }
        };

        info!(cache_type = %self.cache_type, "Persisting payload");
        self.store(path, &value);
    }
}

impl<T: DeserializeOwned> PropertyListCache<T> {
    /// Retrieves a payload by mapping the stored property list with serde
    pub fn retrieve_deserialized(&self) -> Option<T> {
        self.retrieve(|value| match plist::from_value(value) {
            Ok(payload) => Some(payload),
            Err(e) => {
                error!(cache_type = %self.cache_type, error = %e, "Property list does not match payload");
                None
            }
        })
    }
}
