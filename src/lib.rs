//! Generic CRUD data access: one repository contract, pluggable backends.
//!
//! Callers (service-layer managers, web handlers) are written against the
//! [`Repository`] contract and stay backend-agnostic: the in-memory,
//! SQLite, and remote HTTP repositories are interchangeable behind it.
//! Backends that support customized retrieval additionally implement
//! [`RepositoryExtended`].
//!
//! ## Example
//!
//! ```ignore
//! use crud_rust::{Entity, MemoryRepository, Query, Repository, RepositoryExtended};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Serialize, Deserialize, Entity)]
//! struct Tag {
//!     #[entity(key)]
//!     id: i32,
//!     name: String,
//! }
//!
//! let repo = MemoryRepository::<Tag>::new();
//! let saved = repo.insert(Tag { id: 0, name: "Rust".into() })?;
//! let found = repo.get(Query::new().filter(|t: &Tag| t.name == "Rust"))?;
//! ```

mod entity;
mod envelope;
mod error;
mod key;
mod manager;
mod memory;
mod query;
mod repository;

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "server")]
mod server;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use entity::Entity;
pub use envelope::{EntityResponse, ListResponse};
pub use error::RepositoryError;
pub use key::{key_registry, Key, KeyAccessor, KeyError, KeyRegistry};
pub use manager::Manager;
pub use memory::MemoryRepository;
pub use query::Query;
pub use repository::{Repository, RepositoryExtended};

#[cfg(feature = "http")]
pub use http::ApiRepository;
#[cfg(feature = "server")]
pub use server::{repository_router, serve, ResourceState};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;

// Re-export the derive macro so `#[derive(Entity)]` works with just this
// crate as a dependency.
pub use crud_rust_macros::Entity;
