//! Request extraction pipeline
//!
//! Every bound route extracts a [`RequestContext`] before its handler runs.
//! The pipeline collects the raw request once and then runs, in order:
//!
//! 1. pagination: the configured extractor, or [`pagination::extract`] on the
//!    query string
//! 2. query: only when a query extractor is configured
//! 3. payload: the configured parser, for `POST` and `PUT` only
//! 4. resource id: the `id` route parameter, empty on collection routes
//!
//! The first extractor failure aborts the request with
//! [`Error::Extractor`]; the adapter is never called with a partial context.

mod error;
mod source;

pub use error::ExtractorError;
pub use source::{RawRequest, RequestDataSource};

use axum::{
    extract::{FromRef, FromRequest, Request},
    http::Method,
};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::options::RestOptions;
use crate::pagination::{self, Pagination};
use crate::query::Query;
use crate::router::ResourceState;

/// Typed request data handed to a handler
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// Pagination for `selectMany`
    pub pagination: Pagination,
    /// Filter conditions, `None` when no query extractor is configured
    pub query: Option<Query>,
    /// Parser output for `POST` and `PUT`
    pub parsed_resource: Option<Value>,
    /// The `id` route parameter, empty on collection routes
    pub resource_id: String,
    /// The decoded request body
    pub body: Value,
}

impl RequestContext {
    /// Run the pipeline for `options` on an already collected request
    ///
    /// # Errors
    ///
    /// [`Error::Extractor`] when a configured extractor fails.
    pub fn extract(options: &RestOptions, mut raw: RawRequest) -> Result<Self> {
        let resource = options.resource_name();

        let pagination = match options.pagination() {
            Some(extraction) => extraction.extract(&raw)?,
            None => pagination::extract(raw.source(RequestDataSource::Query)),
        };
        debug!(resource, ?pagination, "pagination extracted");

        let query = options
            .query()
            .map(|extraction| extraction.extract(&raw))
            .transpose()?;
        if let Some(query) = &query {
            debug!(resource, conditions = query.conditions().len(), "query extracted");
        }

        let parsed_resource = if raw.method() == Method::POST || raw.method() == Method::PUT {
            options
                .parser()
                .map(|extraction| extraction.extract(&raw))
                .transpose()?
        } else {
            None
        };
        if parsed_resource.is_some() {
            debug!(resource, "payload parsed");
        }

        let resource_id = raw.param("id").unwrap_or_default().to_string();
        debug!(resource, resource_id = %resource_id, "request extracted");

        Ok(Self {
            pagination,
            query,
            parsed_resource,
            resource_id,
            body: raw.take_body(),
        })
    }

    /// The value handed to `createOne` and `updateOne`
    ///
    /// The parser output when a parser ran, the request body otherwise.
    pub fn payload(&self) -> &Value {
        self.parsed_resource.as_ref().unwrap_or(&self.body)
    }

    /// Consume the context, keeping only the payload
    pub fn into_payload(self) -> Value {
        self.parsed_resource.unwrap_or(self.body)
    }
}

impl<S> FromRequest<S> for RequestContext
where
    ResourceState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let resource = ResourceState::from_ref(state);
        let raw = RawRequest::from_request(req, state).await?;
        Self::extract(resource.options(), raw)
    }
}
