//! HTTP access layer for the AgriHub REST API.
//!
//! Every request goes through [`ApiClient`], which:
//! - serializes JSON bodies or builds multipart forms from a [`FormPayload`]
//! - attaches the bearer token held by the configured [`TokenStore`]
//! - turns non-2xx responses and `{"success": false}` bodies into [`ApiError`]
//!
//! so that callers only ever see one error-or-value result.
//!
//! # Example
//!
//! ```
//! use agrihub_api::{ApiClient, ApiConfig, MemoryTokenStore};
//! use std::sync::Arc;
//!
//! let client = ApiClient::new(ApiConfig::default(), Arc::new(MemoryTokenStore::new())).unwrap();
//! assert_eq!(client.url("/crop/crops"), "http://localhost:5000/api/crop/crops");
//! ```

pub mod auth;
mod body;
mod client;
mod config;
pub mod envelope;
mod error;
mod query;
pub mod token;

pub use auth::{AuthClient, AuthSession, RegisterRequest, RegisterResponse};
pub use body::{FilePart, FormPayload, FormValue, RequestBody};
pub use client::{ApiClient, ApiRequest};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use query::ListFilter;
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};
