//! Remote repository speaking the envelope protocol over HTTP.
//!
//! Implements the basic contract only. The customizable query surface is
//! not available remotely, so [`ApiRepository`] does not implement
//! `RepositoryExtended`.

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;

use crate::entity::Entity;
use crate::envelope::{EntityResponse, ListResponse};
use crate::error::RepositoryError;
use crate::key::KeyAccessor;
use crate::query::effective;
use crate::repository::Repository;

/// A repository client for one remote resource, e.g. `api/tags`.
///
/// A transport fault or a non-success response surfaces as an error;
/// absence stays `Ok(None)` / `Ok(false)` exactly as in the local
/// backends, so `delete` of a missing key is `Ok(false)`, not an error.
pub struct ApiRepository<E: Entity> {
    client: Client,
    resource_url: String,
    key_accessor: KeyAccessor<E>,
}

impl<E: Entity> ApiRepository<E> {
    /// `base_url` is the server root, `resource` the resource path such as
    /// `"api/tags"`.
    pub fn new(base_url: &str, resource: &str) -> Self {
        Self::with_client(Client::new(), base_url, resource)
    }

    /// Uses a preconfigured client (timeouts, headers, proxies).
    pub fn with_client(client: Client, base_url: &str, resource: &str) -> Self {
        let resource_url = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            resource.trim_matches('/')
        );
        ApiRepository {
            client,
            resource_url,
            key_accessor: KeyAccessor::new(),
        }
    }

    fn entity_url(&self, id: &E::Key) -> String {
        format!("{}/{}", self.resource_url, id)
    }

    fn transport(err: reqwest::Error) -> RepositoryError {
        RepositoryError::Transport(err.to_string())
    }

    fn check(response: Response) -> Result<Response, RepositoryError> {
        let status = response.status();
        if !status.is_success() {
            return Err(RepositoryError::RemoteStatus {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    fn read_single<T: DeserializeOwned>(
        response: Response,
    ) -> Result<Option<T>, RepositoryError> {
        let envelope: EntityResponse<T> = Self::check(response)?
            .json()
            .map_err(Self::transport)?;
        if envelope.success {
            Ok(envelope.data)
        } else {
            Err(RepositoryError::RemoteRejected {
                messages: envelope.error_messages,
            })
        }
    }

    fn read_list<T: DeserializeOwned>(response: Response) -> Result<Vec<T>, RepositoryError> {
        let envelope: ListResponse<T> = Self::check(response)?
            .json()
            .map_err(Self::transport)?;
        if envelope.success {
            Ok(envelope.data)
        } else {
            Err(RepositoryError::RemoteRejected {
                messages: envelope.error_messages,
            })
        }
    }

    fn require<T>(data: Option<T>) -> Result<T, RepositoryError> {
        data.ok_or_else(|| RepositoryError::Transport("response envelope has no data".into()))
    }
}

impl<E: Entity> Repository<E> for ApiRepository<E> {
    fn get_all(
        &self,
        skip: Option<usize>,
        take: Option<usize>,
    ) -> Result<Vec<E>, RepositoryError> {
        let mut request = self.client.get(self.resource_url.as_str());
        if let Some(skip) = effective(skip) {
            request = request.query(&[("skip", skip)]);
        }
        if let Some(take) = effective(take) {
            request = request.query(&[("take", take)]);
        }
        let response = request.send().map_err(Self::transport)?;
        Self::read_list(response)
    }

    fn get_by_id(&self, id: E::Key) -> Result<Option<E>, RepositoryError> {
        let response = self
            .client
            .get(self.entity_url(&id))
            .send()
            .map_err(Self::transport)?;
        Self::read_single(response)
    }

    fn insert(&self, entity: E) -> Result<E, RepositoryError> {
        let response = self
            .client
            .post(self.resource_url.as_str())
            .json(&entity)
            .send()
            .map_err(Self::transport)?;
        Self::require(Self::read_single(response)?)
    }

    fn update(&self, entity: E) -> Result<E, RepositoryError> {
        // PUT to the resource root; the key travels in the body.
        let response = self
            .client
            .put(self.resource_url.as_str())
            .json(&entity)
            .send()
            .map_err(Self::transport)?;
        Self::require(Self::read_single(response)?)
    }

    fn delete(&self, entity: &E) -> Result<bool, RepositoryError> {
        self.delete_by_id(self.key_accessor.get_key(entity))
    }

    fn delete_by_id(&self, id: E::Key) -> Result<bool, RepositoryError> {
        let response = self
            .client
            .delete(self.entity_url(&id))
            .send()
            .map_err(Self::transport)?;
        // The status alone says whether a removal occurred; the body is
        // ignored.
        Ok(response.status().is_success())
    }
}
