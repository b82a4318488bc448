//! The tag service from the blog sample: a manager wrapper that seeds the
//! sample data and lists tags ordered by name.

use std::ops::Deref;

use crud_rust::{Manager, Query, Repository, RepositoryError, RepositoryExtended};

use super::models::{tag, Tag};

pub struct TagService<R> {
    manager: Manager<R, Tag>,
}

impl<R: RepositoryExtended<Tag>> TagService<R> {
    pub fn new(repository: R) -> Self {
        TagService {
            manager: Manager::new(repository),
        }
    }

    pub fn seed_data(&self) -> Result<(), RepositoryError> {
        self.manager
            .insert(tag(1, "Data Access", "All about managing data"))?;
        self.manager.insert(tag(2, "C#", "All about C#"))?;
        self.manager.insert(tag(3, "Rust", "All about Rust"))?;
        self.manager.insert(tag(4, "Tutorial", "Tutorials"))?;
        Ok(())
    }

    /// The service's default listing: tags ordered by name, with optional
    /// paging layered on top of the manager's plain `get_all`.
    pub fn list(
        &self,
        skip: Option<usize>,
        take: Option<usize>,
    ) -> Result<Vec<Tag>, RepositoryError> {
        let mut query = Query::new().order_by_key(|t: &Tag| t.name.clone());
        if let Some(skip) = skip {
            query = query.skip(skip);
        }
        if let Some(take) = take {
            query = query.take(take);
        }
        self.manager.get(query)
    }
}

impl<R> Deref for TagService<R> {
    type Target = Manager<R, Tag>;

    fn deref(&self) -> &Self::Target {
        &self.manager
    }
}
