//! # resty
//!
//! Expose a storage backend as a REST resource on an axum router.
//!
//! A resource is described by [`RestOptions`](options::RestOptions): an API
//! version, a resource name, an optional parent path, optional extractors and
//! a [`DataAdapter`](adapter::DataAdapter) holding up to six async
//! capabilities. [`router`] binds one route per capability the adapter has.
//!
//! ## Features
//!
//! - **Capability-driven routes**: missing capabilities answer `404`
//! - **Pluggable extraction**: pagination, query and payload extractors read
//!   from the body, route parameters, query string or headers
//! - **Uniform errors**: every failure is a `500` with `{"message": "..."}`
//! - **Service plumbing**: layered configuration, JSON tracing and a server
//!   with graceful shutdown
//!
//! ## Example
//!
//! ```rust,no_run
//! use resty::prelude::*;
//! use serde_json::{json, Value};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load_for_service("users-api")?;
//!     init_tracing(&config)?;
//!
//!     let adapter = DataAdapter::new()
//!         .select_many(|_resource: String, pagination: Pagination, _query: Option<Query>| async move {
//!             Ok::<_, AdapterError>(json!({ "limit": pagination.limit }))
//!         })
//!         .create_one(|_resource: String, body: Value| async move {
//!             Ok::<_, AdapterError>(body)
//!         });
//!
//!     let app = router(RestOptions::builder("v1", "users", adapter).build()?);
//!
//!     Server::new(config).serve(app).await
//! }
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod observability;
pub mod options;
pub mod pagination;
pub mod query;
pub mod router;
pub mod server;

pub use error::{Error, Result};
pub use router::router;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapter::{
        AdapterError, AdapterErrorKind, AdapterResult, Capability, DataAdapter,
    };
    pub use crate::config::{Config, ServiceConfig};
    pub use crate::error::{Error, ErrorResponse, Result};
    pub use crate::extract::{ExtractorError, RequestContext, RequestDataSource};
    pub use crate::observability::{init_tracing, shutdown_tracing};
    pub use crate::options::{Extraction, RestOptions};
    pub use crate::pagination::Pagination;
    pub use crate::query::{Condition, Filter, Query};
    pub use crate::router::{router, ResourceState};
    pub use crate::server::Server;

    pub use axum::Router;
}
