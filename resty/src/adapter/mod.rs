//! Data adapter contract
//!
//! A [`DataAdapter`] is the storage side of a REST resource: a bag of up to
//! six optional async capabilities. The router never touches storage itself;
//! it extracts request data, calls exactly one capability and serializes
//! whatever comes back.
//!
//! # Capabilities
//!
//! | Capability | Verb | Path |
//! |---|---|---|
//! | [`Capability::SelectMany`] | `GET` | `/{parent}/{version}/{resource}` |
//! | [`Capability::CreateOne`] | `POST` | `/{parent}/{version}/{resource}` |
//! | [`Capability::DeleteAll`] | `DELETE` | `/{parent}/{version}/{resource}` |
//! | [`Capability::SelectOne`] | `GET` | `/{parent}/{version}/{resource}/{id}` |
//! | [`Capability::UpdateOne`] | `PUT` | `/{parent}/{version}/{resource}/{id}` |
//! | [`Capability::DeleteOne`] | `DELETE` | `/{parent}/{version}/{resource}/{id}` |
//!
//! # Example
//!
//! ```rust
//! use resty::adapter::{AdapterError, DataAdapter};
//!
//! let adapter = DataAdapter::new()
//!     .select_one(|_resource: String, id: String| async move {
//!         if id == "1" {
//!             Ok(serde_json::json!({ "id": 1, "user": "marco" }))
//!         } else {
//!             Err(AdapterError::not_found(format!("no user with id {id}")))
//!         }
//!     });
//!
//! assert!(adapter.supports(resty::adapter::Capability::SelectOne));
//! ```

mod capability;
mod data_adapter;
mod error;

pub use capability::{Capability, Scope};
pub use data_adapter::{AdapterFuture, AdapterResult, DataAdapter};
pub use error::{AdapterError, AdapterErrorKind};
