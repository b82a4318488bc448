use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::key::Key;

/// A record type stored and retrieved by a repository.
///
/// Usually implemented with `#[derive(Entity)]`, which resolves the single
/// field marked `#[entity(key)]` at compile time. Zero key fields, or more
/// than one, is rejected by the derive:
///
/// ```ignore
/// use crud_rust::Entity;
///
/// #[derive(Clone, Serialize, Deserialize, Entity)]
/// struct Tag {
///     #[entity(key)]
///     id: i32,
///     name: String,
///     description: String,
/// }
/// ```
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The type of the key field.
    type Key: Key;

    /// The collection name for this entity type (e.g., "tags", "blogs").
    /// Maps to a table in the SQLite backend and a key space in memory.
    const COLLECTION: &'static str;

    /// The current value of the key field.
    fn key(&self) -> Self::Key;

    /// Overwrites the key field.
    fn set_key(&mut self, key: Self::Key);
}
