//! Service-layer wrapper around a repository.

use std::marker::PhantomData;

use crate::entity::Entity;
use crate::error::RepositoryError;
use crate::query::Query;
use crate::repository::{Repository, RepositoryExtended};

/// Wraps any repository so cross-cutting behavior can be added in front of
/// a backend without touching it, and the backend swapped without touching
/// callers.
///
/// Every operation is pure delegation. Services layer behavior by wrapping
/// the manager and intercepting calls before or after forwarding, e.g. a
/// service that seeds data or imposes a default ordering on its listing
/// (see the blog sample in the integration tests).
///
/// The extended operations `get`/`get_projection` exist only when the
/// wrapped repository implements [`RepositoryExtended`]; asking a manager
/// over the remote HTTP backend for a customized query is a missing-bound
/// compile error rather than a runtime fault.
pub struct Manager<R, E> {
    repository: R,
    _marker: PhantomData<fn() -> E>,
}

impl<R, E> Manager<R, E> {
    pub fn new(repository: R) -> Self {
        Manager {
            repository,
            _marker: PhantomData,
        }
    }

    /// Access the wrapped repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }
}

impl<R: Repository<E>, E: Entity> Repository<E> for Manager<R, E> {
    fn get_all(
        &self,
        skip: Option<usize>,
        take: Option<usize>,
    ) -> Result<Vec<E>, RepositoryError> {
        self.repository.get_all(skip, take)
    }

    fn get_by_id(&self, id: E::Key) -> Result<Option<E>, RepositoryError> {
        self.repository.get_by_id(id)
    }

    fn insert(&self, entity: E) -> Result<E, RepositoryError> {
        self.repository.insert(entity)
    }

    fn update(&self, entity: E) -> Result<E, RepositoryError> {
        self.repository.update(entity)
    }

    fn delete(&self, entity: &E) -> Result<bool, RepositoryError> {
        self.repository.delete(entity)
    }

    fn delete_by_id(&self, id: E::Key) -> Result<bool, RepositoryError> {
        self.repository.delete_by_id(id)
    }
}

impl<R: RepositoryExtended<E>, E: Entity> RepositoryExtended<E> for Manager<R, E> {
    fn get(&self, query: Query<E>) -> Result<Vec<E>, RepositoryError> {
        self.repository.get(query)
    }

    fn get_projection<P, F>(
        &self,
        project: F,
        query: Query<E>,
    ) -> Result<Vec<P>, RepositoryError>
    where
        F: Fn(E) -> P,
    {
        self.repository.get_projection(project, query)
    }
}
