use std::any::Any;

/// Cache trait for persisting a single payload and retrieving it later.
///
/// Each instance manages exactly one slot. Implementations are free to choose
/// how the payload is stored, and must handle errors gracefully without
/// panicking: a failed write is a no-op and a failed read is a miss.
pub trait Cache<T> {
    /// The intermediate form a payload is converted into before storage.
    type Repr;

    /// Persists a payload for later retrieval.
    ///
    /// # Arguments
    /// * `payload` - The payload to persist. `None` leaves the slot untouched.
    /// * `serialize` - Maps the payload into cached data. Only called if the
    ///   payload is `Some`.
    fn persist<S>(&mut self, payload: Option<T>, serialize: S)
    where
        S: FnOnce(T) -> Self::Repr;

    /// Retrieves a payload from an earlier persistence.
    ///
    /// # Arguments
    /// * `deserialize` - Maps the cached data back into the payload. Only
    ///   called if cached data exists.
    ///
    /// # Returns
    /// * `Some(T)` - The payload if one has been persisted and it deserializes
    /// * `None` - If nothing was ever persisted, the data is unreadable, or
    ///   the deserializer rejects it
    fn retrieve<D>(&self, deserialize: D) -> Option<T>
    where
        D: FnOnce(&Self::Repr) -> Option<T>;

    /// Persists a payload through the [`Identity`] transform.
    fn persist_identity(&mut self, payload: Option<T>)
    where
        Identity: Transform<T, Self::Repr>,
    {
        self.persist(payload, <Identity as Transform<T, Self::Repr>>::serialize)
    }

    /// Retrieves a payload through the [`Identity`] transform.
    fn retrieve_identity(&self) -> Option<T>
    where
        Identity: Transform<T, Self::Repr>,
    {
        self.retrieve(<Identity as Transform<T, Self::Repr>>::deserialize)
    }
}

/// A serializer/deserializer pair between a payload `T` and a stored form `R`.
pub trait Transform<T, R> {
    fn serialize(payload: T) -> R;

    fn deserialize(repr: &R) -> Option<T>;
}

/// Passes payloads through unchanged.
///
/// For boxed storage the value is boxed on the way in and downcast on the way
/// out; a stored value of another type reads back as `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<T: Any + Clone> Transform<T, Box<dyn Any>> for Identity {
    fn serialize(payload: T) -> Box<dyn Any> {
        Box::new(payload)
    }

    fn deserialize(repr: &Box<dyn Any>) -> Option<T> {
        repr.downcast_ref::<T>().cloned()
    }
}

impl Transform<plist::Value, plist::Value> for Identity {
    fn serialize(payload: plist::Value) -> plist::Value {
        payload
    }

    fn deserialize(repr: &plist::Value) -> Option<plist::Value> {
        Some(repr.clone())
    }
}
