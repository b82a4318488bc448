use crate::entity::Entity;
use crate::error::RepositoryError;
use crate::query::Query;
use crate::repository::Repository;

/// Adds customizable retrieval on top of the basic contract.
///
/// A backend that cannot customize queries (the remote HTTP client) simply
/// does not implement this trait, so support is visible in the type system
/// rather than probed at runtime.
pub trait RepositoryExtended<E: Entity>: Repository<E> {
    /// Gets entities using a customized query. The stages apply in a fixed
    /// order: filter, related-data inclusion, ordering, skip, take.
    fn get(&self, query: Query<E>) -> Result<Vec<E>, RepositoryError>;

    /// Same query construction, then maps each entity through `project`
    /// into a different result shape as rows are materialized.
    fn get_projection<P, F>(
        &self,
        project: F,
        query: Query<E>,
    ) -> Result<Vec<P>, RepositoryError>
    where
        F: Fn(E) -> P;
}
