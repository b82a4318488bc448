use crate::entity::Entity;
use crate::error::RepositoryError;

/// The uniform CRUD contract every backend implements identically.
///
/// Callers written against this trait are backend-agnostic: the in-memory,
/// SQLite, and remote HTTP repositories are interchangeable behind it.
pub trait Repository<E: Entity>: Send + Sync {
    /// Gets 'all' the entities from the store, with optional paging.
    ///
    /// `None` (or zero) means "no skip" / "no limit". Order is
    /// backend-defined.
    fn get_all(
        &self,
        skip: Option<usize>,
        take: Option<usize>,
    ) -> Result<Vec<E>, RepositoryError>;

    /// Gets an entity by its key. `Ok(None)` when absent; absence is
    /// never an error.
    fn get_by_id(&self, id: E::Key) -> Result<Option<E>, RepositoryError>;

    /// Adds an entity to the store and returns the stored entity.
    ///
    /// An unassigned key (the type's default value) is allocated before
    /// storing. If the key already matches a stored entity, the insert is
    /// a no-op and the existing entity is returned unchanged.
    fn insert(&self, entity: E) -> Result<E, RepositoryError>;

    /// Replaces the stored entity sharing the argument's key.
    ///
    /// Behavior when no such entity exists is backend-specific: the
    /// in-memory backend silently returns the input unchanged, the SQLite
    /// backend upserts.
    fn update(&self, entity: E) -> Result<E, RepositoryError>;

    /// Deletes the entity with the argument's key. `Ok(false)` when
    /// nothing was removed.
    fn delete(&self, entity: &E) -> Result<bool, RepositoryError>;

    /// Deletes by key. `Ok(false)` when nothing was removed; deleting a
    /// missing key is not an error.
    fn delete_by_id(&self, id: E::Key) -> Result<bool, RepositoryError>;
}
