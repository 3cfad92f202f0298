//! Data-access core for the loyalty CRM backend.
//!
//! # Overview
//! Manages clients and loyalty programs through the backend's REST API:
//! list, fetch, create, partially update and delete.
//!
//! # Design
//! - `ApiClient` is sans-IO: `build_*` produces an `HttpRequest`, `parse_*`
//!   consumes an `HttpResponse`, and nothing in between touches the network.
//! - `LoyaltyService` runs those requests through a shared [`Transport`] and
//!   returns [`ApiResult`] from every operation. Construct one per process
//!   and hand out clones.
//! - DTOs are defined independently from the mock-backend crate; integration
//!   tests catch schema drift.
//! - [`forms`] holds the caller-side validation and diffing that must happen
//!   before a request is built.

pub mod client;
pub mod config;
pub mod error;
pub mod forms;
pub mod http;
pub mod lenient;
pub mod resource;
pub mod service;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ApiResult, OperationError};
pub use forms::{ClientForm, FormError, LoyaltyProgramForm};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use resource::Resource;
pub use service::LoyaltyService;
pub use transport::{Transport, UreqTransport};
pub use types::{Client, ClientPatch, LoyaltyProgram, LoyaltyProgramPatch, LoyaltyProgramRef};
