//! Route binding
//!
//! [`router`] turns a [`RestOptions`] into an [`axum::Router`] serving up to
//! six routes under the resource mount path. A capability missing from the
//! adapter binds nothing: its verb and path answer `404 Not Found`, exactly
//! like a path that was never registered.
//!
//! # Example
//!
//! ```rust,no_run
//! use resty::adapter::{AdapterError, DataAdapter};
//! use resty::options::RestOptions;
//! use serde_json::json;
//!
//! # fn main() -> resty::Result<()> {
//! let users = DataAdapter::new()
//!     .select_one(|_resource: String, id: String| async move {
//!         Ok::<_, AdapterError>(json!({ "id": id }))
//!     });
//! let orders = DataAdapter::new()
//!     .delete_all(|_resource: String| async { Ok::<_, AdapterError>(()) });
//!
//! let app = resty::router(RestOptions::builder("v1", "users", users).build()?)
//!     .merge(resty::router(RestOptions::builder("v1", "orders", orders).build()?));
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{on, MethodFilter, MethodRouter},
    Router,
};
use tracing::info;

use crate::adapter::{Capability, Scope};
use crate::handlers;
use crate::options::RestOptions;

/// Router state shared by every route of one resource
#[derive(Debug, Clone)]
pub struct ResourceState {
    options: Arc<RestOptions>,
}

impl ResourceState {
    /// Wrap `options` for use as router state
    pub fn new(options: RestOptions) -> Self {
        Self {
            options: Arc::new(options),
        }
    }

    /// The resource options
    pub fn options(&self) -> &RestOptions {
        &self.options
    }
}

fn method_filter(capability: Capability) -> MethodFilter {
    match capability {
        Capability::SelectMany | Capability::SelectOne => MethodFilter::GET,
        Capability::CreateOne => MethodFilter::POST,
        Capability::UpdateOne => MethodFilter::PUT,
        Capability::DeleteOne | Capability::DeleteAll => MethodFilter::DELETE,
    }
}

fn bind(capability: Capability) -> MethodRouter<ResourceState> {
    let filter = method_filter(capability);
    match capability {
        Capability::CreateOne => on(filter, handlers::create_one),
        Capability::SelectOne => on(filter, handlers::select_one),
        Capability::SelectMany => on(filter, handlers::select_many),
        Capability::UpdateOne => on(filter, handlers::update_one),
        Capability::DeleteOne => on(filter, handlers::delete_one),
        Capability::DeleteAll => on(filter, handlers::delete_all),
    }
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Build the router for one resource
///
/// | Verb | Path | Capability |
/// |---|---|---|
/// | `GET` | `P` | `selectMany` |
/// | `GET` | `P/{id}` | `selectOne` |
/// | `POST` | `P` | `createOne` |
/// | `PUT` | `P/{id}` | `updateOne` |
/// | `DELETE` | `P` | `deleteAll` |
/// | `DELETE` | `P/{id}` | `deleteOne` |
///
/// where `P` is [`RestOptions::mount_path`]. Only the capabilities present
/// on the adapter are bound. Routers for distinct resources can be combined
/// with [`Router::merge`].
pub fn router(options: RestOptions) -> Router {
    let state = ResourceState::new(options);
    let options = state.options();
    let capabilities = options.data_adapter().capabilities();
    let mut router = Router::new();

    for (scope, path) in [
        (Scope::Collection, options.mount_path()),
        (Scope::Item, options.item_path()),
    ] {
        let mut methods: Option<MethodRouter<ResourceState>> = None;
        for capability in capabilities.iter().copied().filter(|c| c.scope() == scope) {
            info!(
                resource = options.resource_name(),
                method = %capability.method(),
                path = %path,
                capability = %capability,
                "binding route"
            );
            let bound = bind(capability);
            methods = Some(match methods {
                Some(existing) => existing.merge(bound),
                None => bound,
            });
        }

        if let Some(methods) = methods {
            router = router.route(&path, methods.fallback(not_found));
        }
    }

    router.with_state(state)
}
