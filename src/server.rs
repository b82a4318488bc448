//! Axum router serving the remote resource protocol, the server-side
//! counterpart of `ApiRepository`.
//!
//! ## Routes
//!
//! - `GET /?skip=&take=` — list envelope
//! - `GET /:id` — single envelope (`success: true`, null data when absent)
//! - `POST /` — insert the body entity
//! - `PUT /` — update the body entity (no id in the path)
//! - `DELETE /:id` — 200 when removed, 404 when not
//!
//! ## Example
//!
//! ```ignore
//! use crud_rust::{repository_router, serve, MemoryRepository, ResourceState};
//!
//! let repo = MemoryRepository::<Tag>::new();
//! let app = axum::Router::new()
//!     .nest("/api/tags", repository_router(ResourceState::new(repo)));
//! serve(app, "0.0.0.0:3000").await?;
//! ```

use std::sync::Arc;

use axum::extract::{Path, Query as UrlQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::error;
use serde::Deserialize;

use crate::entity::Entity;
use crate::envelope::{EntityResponse, ListResponse};
use crate::error::RepositoryError;
use crate::query::Query;
use crate::repository::RepositoryExtended;

/// Server-side wiring for one resource: the repository plus the fixed
/// query its list endpoint always applies (filter, ordering, inclusion),
/// the way a controller bakes them in. Request paging is layered on top.
pub struct ResourceState<R, E> {
    repository: R,
    list_query: Option<Box<dyn Fn() -> Query<E> + Send + Sync>>,
}

impl<R, E> ResourceState<R, E> {
    pub fn new(repository: R) -> Self {
        ResourceState {
            repository,
            list_query: None,
        }
    }

    /// Fixed query applied to every list request. The factory runs once
    /// per request; `skip`/`take` from the request override its paging.
    pub fn with_list_query(
        mut self,
        factory: impl Fn() -> Query<E> + Send + Sync + 'static,
    ) -> Self {
        self.list_query = Some(Box::new(factory));
        self
    }
}

/// Builds a router serving the resource protocol over the repository.
/// Mount it under the resource path (`"/api/tags"`).
pub fn repository_router<R, E>(state: ResourceState<R, E>) -> Router
where
    R: RepositoryExtended<E> + 'static,
    E: Entity,
{
    Router::new()
        .route(
            "/",
            get(list::<R, E>).post(create::<R, E>).put(replace::<R, E>),
        )
        .route("/:id", get(find::<R, E>).delete(remove::<R, E>))
        .with_state(Arc::new(state))
}

/// Serves a router at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve(router: Router, addr: &str) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

#[derive(Deserialize)]
struct Paging {
    skip: Option<usize>,
    take: Option<usize>,
}

fn failure<E: Entity>(operation: &str, err: RepositoryError) -> Response {
    error!(
        "event=resource_{} collection={} status=error error={}",
        operation,
        E::COLLECTION,
        err
    );
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

async fn list<R, E>(
    State(state): State<Arc<ResourceState<R, E>>>,
    UrlQuery(paging): UrlQuery<Paging>,
) -> Response
where
    R: RepositoryExtended<E>,
    E: Entity,
{
    let mut query = state
        .list_query
        .as_ref()
        .map(|factory| factory())
        .unwrap_or_default();
    query.skip = paging.skip;
    query.take = paging.take;

    match state.repository.get(query) {
        Ok(items) => Json(ListResponse::ok(items)).into_response(),
        Err(err) => failure::<E>("list", err),
    }
}

async fn find<R, E>(
    State(state): State<Arc<ResourceState<R, E>>>,
    Path(id): Path<String>,
) -> Response
where
    R: RepositoryExtended<E>,
    E: Entity,
{
    let id = match id.parse::<E::Key>() {
        Ok(id) => id,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    match state.repository.get_by_id(id) {
        // A missing key is still a successful envelope with null data.
        Ok(found) => Json(EntityResponse::ok(found)).into_response(),
        Err(err) => failure::<E>("get", err),
    }
}

async fn create<R, E>(
    State(state): State<Arc<ResourceState<R, E>>>,
    Json(entity): Json<E>,
) -> Response
where
    R: RepositoryExtended<E>,
    E: Entity,
{
    match state.repository.insert(entity) {
        Ok(saved) => Json(EntityResponse::ok(Some(saved))).into_response(),
        Err(err) => failure::<E>("insert", err),
    }
}

async fn replace<R, E>(
    State(state): State<Arc<ResourceState<R, E>>>,
    Json(entity): Json<E>,
) -> Response
where
    R: RepositoryExtended<E>,
    E: Entity,
{
    match state.repository.update(entity) {
        Ok(saved) => Json(EntityResponse::ok(Some(saved))).into_response(),
        Err(err) => failure::<E>("update", err),
    }
}

async fn remove<R, E>(
    State(state): State<Arc<ResourceState<R, E>>>,
    Path(id): Path<String>,
) -> Response
where
    R: RepositoryExtended<E>,
    E: Entity,
{
    let id = match id.parse::<E::Key>() {
        Ok(id) => id,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    match state.repository.delete_by_id(id) {
        Ok(true) => StatusCode::OK.into_response(),
        Ok(false) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => failure::<E>("delete", err),
    }
}
