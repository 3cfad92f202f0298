//! Async data-access client for clients and loyalty programs.
//!
//! # Design
//! `LoyaltyService` pairs the sans-IO `ApiClient` with a shared
//! [`Transport`]. Every operation returns [`ApiResult`] and never panics.
//!
//! - list / get / create: any failure, non-2xx included, is an `Err`.
//! - patch / delete: a response of any status is `Ok(status is 2xx)`; only a
//!   failed round trip (or an unencodable body) is an `Err`.
//!
//! The blocking round trip is moved onto tokio's blocking pool so awaiting
//! an operation never stalls the caller's executor thread. The service is
//! cheap to clone and safe to share; concurrent operations are independent
//! and unordered. Dropping a pending future does not abort its request.

use std::fmt;
use std::sync::Arc;

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult, OperationError};
use crate::http::{HttpRequest, HttpResponse};
use crate::resource::Resource;
use crate::transport::{Transport, UreqTransport};
use crate::types::{Client, ClientPatch, LoyaltyProgram, LoyaltyProgramPatch};

pub struct LoyaltyService<T = UreqTransport> {
    api: ApiClient,
    transport: Arc<T>,
}

impl LoyaltyService<UreqTransport> {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::new())
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }
}

impl<T: Transport> LoyaltyService<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            api: ApiClient::new(base_url),
            transport: Arc::new(transport),
        }
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url()
    }

    // Clients

    pub async fn list_clients(&self) -> ApiResult<Vec<Client>> {
        self.list().await
    }

    pub async fn get_client(&self, id: i64) -> ApiResult<Client> {
        self.get(id).await
    }

    pub async fn create_client(&self, client: &Client) -> ApiResult<Client> {
        self.create(client).await
    }

    pub async fn patch_client(&self, id: i64, patch: &ClientPatch) -> ApiResult<bool> {
        self.patch::<Client>(id, patch).await
    }

    pub async fn delete_client(&self, id: i64) -> ApiResult<bool> {
        self.delete::<Client>(id).await
    }

    // Loyalty programs

    pub async fn list_loyalty_programs(&self) -> ApiResult<Vec<LoyaltyProgram>> {
        self.list().await
    }

    pub async fn get_loyalty_program(&self, id: i64) -> ApiResult<LoyaltyProgram> {
        self.get(id).await
    }

    pub async fn create_loyalty_program(&self, program: &LoyaltyProgram) -> ApiResult<LoyaltyProgram> {
        self.create(program).await
    }

    pub async fn patch_loyalty_program(&self, id: i64, patch: &LoyaltyProgramPatch) -> ApiResult<bool> {
        self.patch::<LoyaltyProgram>(id, patch).await
    }

    pub async fn delete_loyalty_program(&self, id: i64) -> ApiResult<bool> {
        self.delete::<LoyaltyProgram>(id).await
    }

    async fn list<R: Resource>(&self) -> ApiResult<Vec<R>> {
        let request = self.api.build_list::<R>();
        self.round_trip(request)
            .await
            .and_then(|response| self.api.parse_list(response))
            .map_err(|cause| failed(format!("failed to load {}", R::PLURAL), cause))
    }

    async fn get<R: Resource>(&self, id: i64) -> ApiResult<R> {
        let request = self.api.build_get::<R>(id);
        self.round_trip(request)
            .await
            .and_then(|response| self.api.parse_entity(response))
            .map_err(|cause| failed(format!("failed to load {} {id}", R::NOUN), cause))
    }

    async fn create<R: Resource>(&self, input: &R) -> ApiResult<R> {
        let outcome = match self.api.build_create(input) {
            Ok(request) => self
                .round_trip(request)
                .await
                .and_then(|response| self.api.parse_entity(response)),
            Err(err) => Err(err),
        };
        outcome.map_err(|cause| failed(format!("failed to create {}", R::NOUN), cause))
    }

    async fn patch<R: Resource>(&self, id: i64, patch: &R::Patch) -> ApiResult<bool> {
        let outcome = match self.api.build_patch::<R>(id, patch) {
            Ok(request) => self
                .round_trip(request)
                .await
                .map(|response| self.api.parse_acknowledgement(&response)),
            Err(err) => Err(err),
        };
        let updated = outcome.map_err(|cause| failed(format!("failed to update {} {id}", R::NOUN), cause))?;
        if !updated {
            tracing::info!(id, resource = R::NOUN, "update not accepted by server");
        }
        Ok(updated)
    }

    async fn delete<R: Resource>(&self, id: i64) -> ApiResult<bool> {
        let request = self.api.build_delete::<R>(id);
        let deleted = self
            .round_trip(request)
            .await
            .map(|response| self.api.parse_acknowledgement(&response))
            .map_err(|cause| failed(format!("failed to delete {} {id}", R::NOUN), cause))?;
        if !deleted {
            tracing::info!(id, resource = R::NOUN, "delete not accepted by server");
        }
        Ok(deleted)
    }

    async fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = request.method.as_str(), url = %request.path, "sending request");
        let transport = Arc::clone(&self.transport);
        let response = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle.spawn_blocking(move || transport.execute(&request)).await??,
            // Polled outside tokio: no blocking pool to hand the call to.
            Err(_) => transport.execute(&request)?,
        };
        tracing::debug!(status = response.status, "received response");
        Ok(response)
    }
}

fn failed(context: String, cause: ApiError) -> OperationError {
    let error = OperationError::new(&context, cause);
    tracing::warn!(%error, "data-access operation failed");
    error
}

impl<T> Clone for LoyaltyService<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T> fmt::Debug for LoyaltyService<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoyaltyService")
            .field("base_url", &self.api.base_url())
            .finish_non_exhaustive()
    }
}
