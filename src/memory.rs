//! In-memory repository backed by a keyed map, generally used for tests
//! and samples.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::entity::Entity;
use crate::error::RepositoryError;
use crate::key::{Key, KeyAccessor};
use crate::query::Query;
use crate::repository::{Repository, RepositoryExtended};

/// A process-local repository over an owned key→entity map.
///
/// Not persisted across restarts. Clone-friendly via `Arc`: clones share
/// the same store. Individual operations take the interior lock for their
/// duration, but there is no coordination beyond that; callers must
/// serialize their own read-modify-write sequences.
///
/// The include list of a [`Query`] is ignored; there is no related data to
/// materialize here.
pub struct MemoryRepository<E: Entity> {
    data: Arc<RwLock<HashMap<E::Key, E>>>,
    key_accessor: KeyAccessor<E>,
}

impl<E: Entity> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Clone for MemoryRepository<E> {
    fn clone(&self) -> Self {
        MemoryRepository {
            data: Arc::clone(&self.data),
            key_accessor: self.key_accessor.clone(),
        }
    }
}

impl<E: Entity> MemoryRepository<E> {
    /// Creates a new empty repository. Its key allocator draws from the
    /// process-wide counter for `E`, so keys are unique across instances.
    pub fn new() -> Self {
        MemoryRepository {
            data: Arc::new(RwLock::new(HashMap::new())),
            key_accessor: KeyAccessor::new(),
        }
    }

    /// A snapshot of the current values.
    fn snapshot(&self) -> Result<Vec<E>, RepositoryError> {
        let data = self
            .data
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("read"))?;
        Ok(data.values().cloned().collect())
    }
}

impl<E: Entity> Repository<E> for MemoryRepository<E> {
    fn get_all(
        &self,
        skip: Option<usize>,
        take: Option<usize>,
    ) -> Result<Vec<E>, RepositoryError> {
        self.get(Query::page(skip, take))
    }

    fn get_by_id(&self, id: E::Key) -> Result<Option<E>, RepositoryError> {
        let data = self
            .data
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("read"))?;
        Ok(data.get(&id).cloned())
    }

    fn insert(&self, mut entity: E) -> Result<E, RepositoryError> {
        let mut key = self.key_accessor.get_key(&entity);
        if key.is_unassigned() {
            key = self.key_accessor.next_key()?;
            self.key_accessor.set_key(&mut entity, key);
        }

        let mut data = self
            .data
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("write"))?;

        if let Some(existing) = data.get(&key) {
            return Ok(existing.clone());
        }

        data.insert(key, entity.clone());
        Ok(entity)
    }

    fn update(&self, entity: E) -> Result<E, RepositoryError> {
        let key = self.key_accessor.get_key(&entity);

        let mut data = self
            .data
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("write"))?;

        // Replaces only an existing entry; updating a missing key is a
        // silent no-op that hands the input back.
        if data.contains_key(&key) {
            data.insert(key, entity.clone());
        }

        Ok(entity)
    }

    fn delete(&self, entity: &E) -> Result<bool, RepositoryError> {
        self.delete_by_id(self.key_accessor.get_key(entity))
    }

    fn delete_by_id(&self, id: E::Key) -> Result<bool, RepositoryError> {
        let mut data = self
            .data
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("write"))?;
        Ok(data.remove(&id).is_some())
    }
}

impl<E: Entity> RepositoryExtended<E> for MemoryRepository<E> {
    fn get(&self, query: Query<E>) -> Result<Vec<E>, RepositoryError> {
        Ok(query.apply(self.snapshot()?))
    }

    fn get_projection<P, F>(
        &self,
        project: F,
        query: Query<E>,
    ) -> Result<Vec<P>, RepositoryError>
    where
        F: Fn(E) -> P,
    {
        let items = query.apply(self.snapshot()?);
        Ok(items.into_iter().map(project).collect())
    }
}
