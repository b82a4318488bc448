//! SQLite-backed repository.
//!
//! Entities live one table per collection: the key `Display`-encoded in the
//! `id` column, the entity JSON-serialized in the `body` column. Every
//! operation takes the connection mutex for the duration of one call and
//! caches nothing between calls.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};

use crate::entity::Entity;
use crate::error::RepositoryError;
use crate::key::{Key, KeyAccessor};
use crate::query::{effective, Query};
use crate::repository::{Repository, RepositoryExtended};

type IncludeLoader<E> =
    Box<dyn Fn(&Connection, &mut E) -> Result<(), RepositoryError> + Send + Sync>;

/// A repository over one SQLite collection table.
///
/// `update` upserts: an entity whose key has no stored row is written
/// anyway, matching the coarse-grained "attach and mark modified" behavior
/// of session-style stores. `delete_by_id` fetches the entity first and
/// then deletes by entity, so it costs two round trips.
pub struct SqliteRepository<E: Entity> {
    conn: Mutex<Connection>,
    key_accessor: KeyAccessor<E>,
    includes: HashMap<String, IncludeLoader<E>>,
}

impl<E: Entity> SqliteRepository<E> {
    /// Opens (or creates) a database file and bootstraps the collection
    /// table.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let conn = match Connection::open(path) {
            Ok(conn) => conn,
            Err(err) => {
                error!(
                    "event=db_open collection={} mode=file status=error error={}",
                    E::COLLECTION,
                    err
                );
                return Err(err.into());
            }
        };
        info!(
            "event=db_open collection={} mode=file status=ok",
            E::COLLECTION
        );
        Self::with_connection(conn)
    }

    /// An in-memory database, for tests.
    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        let conn = Connection::open_in_memory()?;
        info!(
            "event=db_open collection={} mode=memory status=ok",
            E::COLLECTION
        );
        Self::with_connection(conn)
    }

    /// Wraps an existing connection, creating the collection table if it
    /// does not exist yet.
    pub fn with_connection(conn: Connection) -> Result<Self, RepositoryError> {
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, body TEXT NOT NULL);",
            E::COLLECTION
        ))?;
        Ok(SqliteRepository {
            conn: Mutex::new(conn),
            key_accessor: KeyAccessor::new(),
            includes: HashMap::new(),
        })
    }

    /// Registers a loader for a named related-data set. Queries that
    /// `include` the name run the loader on each retrieved entity to
    /// eagerly materialize its related data. Include names with no
    /// registered loader are ignored.
    pub fn with_include(
        mut self,
        name: &str,
        loader: impl Fn(&Connection, &mut E) -> Result<(), RepositoryError> + Send + Sync + 'static,
    ) -> Self {
        self.includes.insert(name.to_string(), Box::new(loader));
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.conn
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned("connection"))
    }

    fn encode(entity: &E) -> Result<String, RepositoryError> {
        serde_json::to_string(entity).map_err(|e| RepositoryError::Serde(e.to_string()))
    }

    fn decode(body: &str) -> Result<E, RepositoryError> {
        serde_json::from_str(body).map_err(|e| RepositoryError::Serde(e.to_string()))
    }

    fn fetch(conn: &Connection, id: &E::Key) -> Result<Option<E>, RepositoryError> {
        let body: Option<String> = conn
            .query_row(
                &format!("SELECT body FROM {} WHERE id = ?1;", E::COLLECTION),
                params![id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        body.as_deref().map(Self::decode).transpose()
    }

    /// Selects rows for a query. Paging is pushed down into SQL when
    /// neither filter nor ordering is present; the returned flag says
    /// whether that happened.
    fn select(conn: &Connection, query: &Query<E>) -> Result<(Vec<E>, bool), RepositoryError> {
        let pushdown = query.filter.is_none() && query.order.is_none();

        let mut sql = format!("SELECT body FROM {}", E::COLLECTION);
        if pushdown {
            let take = effective(query.take).map(|t| t as i64).unwrap_or(-1);
            let skip = effective(query.skip).unwrap_or(0);
            if take >= 0 || skip > 0 {
                sql.push_str(&format!(" LIMIT {} OFFSET {}", take, skip));
            }
        }
        sql.push(';');

        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let body: String = row.get(0)?;
            items.push(Self::decode(&body)?);
        }
        Ok((items, pushdown))
    }

    fn load_includes(
        &self,
        conn: &Connection,
        query: &Query<E>,
        items: &mut [E],
    ) -> Result<(), RepositoryError> {
        for name in &query.include {
            if let Some(loader) = self.includes.get(name) {
                for item in items.iter_mut() {
                    loader(conn, item)?;
                }
            }
        }
        Ok(())
    }

    /// The five query stages: filter, inclusion, ordering, skip, take.
    fn run_query(&self, conn: &Connection, query: &Query<E>) -> Result<Vec<E>, RepositoryError> {
        let (mut items, pushed_down) = Self::select(conn, query)?;
        if !pushed_down {
            query.apply_filter(&mut items);
        }
        self.load_includes(conn, query, &mut items)?;
        if !pushed_down {
            query.apply_order_and_page(&mut items);
        }
        Ok(items)
    }
}

impl<E: Entity> Repository<E> for SqliteRepository<E> {
    fn get_all(
        &self,
        skip: Option<usize>,
        take: Option<usize>,
    ) -> Result<Vec<E>, RepositoryError> {
        self.get(Query::page(skip, take))
    }

    fn get_by_id(&self, id: E::Key) -> Result<Option<E>, RepositoryError> {
        let conn = self.lock()?;
        Self::fetch(&conn, &id)
    }

    fn insert(&self, mut entity: E) -> Result<E, RepositoryError> {
        let mut key = self.key_accessor.get_key(&entity);
        if key.is_unassigned() {
            key = self.key_accessor.next_key()?;
            self.key_accessor.set_key(&mut entity, key);
        }

        let conn = self.lock()?;
        if let Some(existing) = Self::fetch(&conn, &key)? {
            return Ok(existing);
        }

        conn.execute(
            &format!("INSERT INTO {} (id, body) VALUES (?1, ?2);", E::COLLECTION),
            params![key.to_string(), Self::encode(&entity)?],
        )?;
        Ok(entity)
    }

    fn update(&self, entity: E) -> Result<E, RepositoryError> {
        let key = self.key_accessor.get_key(&entity);
        let conn = self.lock()?;
        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO {} (id, body) VALUES (?1, ?2);",
                E::COLLECTION
            ),
            params![key.to_string(), Self::encode(&entity)?],
        )?;
        Ok(entity)
    }

    fn delete(&self, entity: &E) -> Result<bool, RepositoryError> {
        let key = self.key_accessor.get_key(entity);
        let conn = self.lock()?;
        let changed = conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1;", E::COLLECTION),
            params![key.to_string()],
        )?;
        Ok(changed > 0)
    }

    fn delete_by_id(&self, id: E::Key) -> Result<bool, RepositoryError> {
        // Fetch first, then delete by entity. Two round trips.
        let existing = {
            let conn = self.lock()?;
            Self::fetch(&conn, &id)?
        };
        match existing {
            Some(entity) => self.delete(&entity),
            None => Ok(false),
        }
    }
}

impl<E: Entity> RepositoryExtended<E> for SqliteRepository<E> {
    fn get(&self, query: Query<E>) -> Result<Vec<E>, RepositoryError> {
        let conn = self.lock()?;
        self.run_query(&conn, &query)
    }

    fn get_projection<P, F>(
        &self,
        project: F,
        query: Query<E>,
    ) -> Result<Vec<P>, RepositoryError>
    where
        F: Fn(E) -> P,
    {
        let conn = self.lock()?;
        let items = self.run_query(&conn, &query)?;
        Ok(items.into_iter().map(project).collect())
    }
}
