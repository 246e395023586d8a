//! Resource configuration
//!
//! [`RestOptions`] describes one REST resource: where it is mounted, which
//! extractors run on each request and which [`DataAdapter`] serves it. It is
//! built once and never changes afterwards.
//!
//! # Example
//!
//! ```rust
//! use resty::adapter::{AdapterError, DataAdapter};
//! use resty::extract::RequestDataSource;
//! use resty::options::{Extraction, RestOptions};
//! use resty::query;
//!
//! let adapter = DataAdapter::new()
//!     .delete_all(|_resource: String| async { Ok::<_, AdapterError>(()) });
//!
//! let options = RestOptions::builder("v1", "users", adapter)
//!     .parent("/api/")
//!     .query(Extraction::new(RequestDataSource::Body, query::identity))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(options.mount_path(), "/api/v1/users");
//! assert_eq!(options.item_path(), "/api/v1/users/{id}");
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::adapter::DataAdapter;
use crate::error::{Error, Result};
use crate::extract::{ExtractorError, RawRequest, RequestDataSource};
use crate::pagination::Pagination;
use crate::query::Query;

type ExtractorFn<T> = Arc<dyn Fn(&Value) -> std::result::Result<T, ExtractorError> + Send + Sync>;

/// An extractor paired with the request data it reads
pub struct Extraction<T> {
    extractor: ExtractorFn<T>,
    source: RequestDataSource,
}

impl<T> Extraction<T> {
    /// Run `extractor` on the mapping selected by `source`
    pub fn new<F>(source: RequestDataSource, extractor: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<T, ExtractorError> + Send + Sync + 'static,
    {
        Self {
            extractor: Arc::new(extractor),
            source,
        }
    }

    /// Run `extractor` on the query string
    pub fn from_query<F>(extractor: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<T, ExtractorError> + Send + Sync + 'static,
    {
        Self::new(RequestDataSource::Query, extractor)
    }

    /// Run `extractor` on the parsed body
    pub fn from_body<F>(extractor: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<T, ExtractorError> + Send + Sync + 'static,
    {
        Self::new(RequestDataSource::Body, extractor)
    }

    /// The request data this extraction reads
    pub fn source(&self) -> RequestDataSource {
        self.source
    }

    /// Apply the extractor to `raw`
    ///
    /// # Errors
    ///
    /// Whatever the extractor returns.
    pub fn extract(&self, raw: &RawRequest) -> std::result::Result<T, ExtractorError> {
        (self.extractor)(raw.source(self.source))
    }
}

impl<T> Clone for Extraction<T> {
    fn clone(&self) -> Self {
        Self {
            extractor: Arc::clone(&self.extractor),
            source: self.source,
        }
    }
}

impl<T> fmt::Debug for Extraction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extraction")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Normalize a mount path
///
/// Repeated separators collapse, `.` segments are dropped, `..` removes the
/// preceding segment (never climbing above the root) and trailing separators
/// are stripped. The result always starts with `/`.
///
/// # Example
///
/// ```rust
/// use resty::options::normalize_path;
///
/// assert_eq!(normalize_path("//v1///users/"), "/v1/users");
/// assert_eq!(normalize_path("api/./v1/../v2/users"), "/api/v2/users");
/// assert_eq!(normalize_path("../.."), "/");
/// ```
pub fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Immutable description of one REST resource
#[derive(Debug, Clone)]
pub struct RestOptions {
    version: String,
    parent: String,
    resource_name: String,
    parser: Option<Extraction<Value>>,
    pagination: Option<Extraction<Pagination>>,
    query: Option<Extraction<Query>>,
    data_adapter: DataAdapter,
}

impl RestOptions {
    /// Start building options for `resource_name` under `version`
    pub fn builder(
        version: impl Into<String>,
        resource_name: impl Into<String>,
        data_adapter: DataAdapter,
    ) -> RestOptionsBuilder {
        RestOptionsBuilder {
            version: version.into(),
            parent: "/".to_string(),
            resource_name: resource_name.into(),
            parser: None,
            pagination: None,
            query: None,
            data_adapter,
        }
    }

    /// API version segment
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Path prefix the resource is mounted under
    pub fn parent(&self) -> &str {
        &self.parent
    }

    /// Resource name, used as the last path segment and passed to the adapter
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// Payload extractor for `POST` and `PUT`
    pub fn parser(&self) -> Option<&Extraction<Value>> {
        self.parser.as_ref()
    }

    /// Pagination extractor; the query string defaults apply when unset
    pub fn pagination(&self) -> Option<&Extraction<Pagination>> {
        self.pagination.as_ref()
    }

    /// Query extractor; no query is computed when unset
    pub fn query(&self) -> Option<&Extraction<Query>> {
        self.query.as_ref()
    }

    /// Storage capabilities
    pub fn data_adapter(&self) -> &DataAdapter {
        &self.data_adapter
    }

    /// Collection path, `normalize(parent/version/resource_name)`
    pub fn mount_path(&self) -> String {
        normalize_path(&format!(
            "{}/{}/{}",
            self.parent, self.version, self.resource_name
        ))
    }

    /// Item path, the collection path followed by the `{id}` parameter
    pub fn item_path(&self) -> String {
        format!("{}/{{id}}", self.mount_path())
    }
}

/// Builder for [`RestOptions`]
#[derive(Debug)]
pub struct RestOptionsBuilder {
    version: String,
    parent: String,
    resource_name: String,
    parser: Option<Extraction<Value>>,
    pagination: Option<Extraction<Pagination>>,
    query: Option<Extraction<Query>>,
    data_adapter: DataAdapter,
}

impl RestOptionsBuilder {
    /// Mount the resource under `parent` (default `/`)
    #[must_use]
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = parent.into();
        self
    }

    /// Payload extractor, run for `POST` and `PUT`
    #[must_use]
    pub fn parser(mut self, parser: Extraction<Value>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Replace the default pagination extractor
    #[must_use]
    pub fn pagination(mut self, pagination: Extraction<Pagination>) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Query extractor handed to `selectMany`
    #[must_use]
    pub fn query(mut self, query: Extraction<Query>) -> Self {
        self.query = Some(query);
        self
    }

    /// Validate and build the options
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOptions`] when `version` or `resource_name` is empty,
    /// or when a path component contains a route parameter brace.
    pub fn build(self) -> Result<RestOptions> {
        if self.version.trim().is_empty() {
            return Err(Error::InvalidOptions("version must not be empty".into()));
        }
        if self.resource_name.trim().is_empty() {
            return Err(Error::InvalidOptions(
                "resource_name must not be empty".into(),
            ));
        }
        for (name, value) in [
            ("parent", &self.parent),
            ("version", &self.version),
            ("resource_name", &self.resource_name),
        ] {
            if value.contains(['{', '}']) {
                return Err(Error::InvalidOptions(format!(
                    "{name} must not contain '{{' or '}}': {value:?}"
                )));
            }
        }

        Ok(RestOptions {
            version: self.version,
            parent: self.parent,
            resource_name: self.resource_name,
            parser: self.parser,
            pagination: self.pagination,
            query: self.query,
            data_adapter: self.data_adapter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination;
    use axum::http::Method;
    use serde_json::json;

    fn options(version: &str, resource: &str) -> Result<RestOptions> {
        RestOptions::builder(version, resource, DataAdapter::new()).build()
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("///"), "/");
        assert_eq!(normalize_path("/v1/users"), "/v1/users");
        assert_eq!(normalize_path("v1/users/"), "/v1/users");
        assert_eq!(normalize_path("/a//b/./c/"), "/a/b/c");
        assert_eq!(normalize_path("/a/b/../c"), "/a/c");
        assert_eq!(normalize_path("/../../a"), "/a");
    }

    #[test]
    fn test_default_parent_is_root() {
        let options = options("v1", "users").unwrap();
        assert_eq!(options.parent(), "/");
        assert_eq!(options.mount_path(), "/v1/users");
        assert_eq!(options.item_path(), "/v1/users/{id}");
    }

    #[test]
    fn test_parent_is_joined_and_normalized() {
        let options = RestOptions::builder("/v2/", "/orders", DataAdapter::new())
            .parent("api//shop/")
            .build()
            .unwrap();
        assert_eq!(options.mount_path(), "/api/shop/v2/orders");
        assert_eq!(options.resource_name(), "/orders");
    }

    #[test]
    fn test_empty_version_or_resource_is_rejected() {
        let err = options("", "users").unwrap_err();
        assert!(matches!(err, Error::InvalidOptions(_)));
        assert_eq!(err.to_string(), "Invalid options: version must not be empty");

        let err = options("v1", "  ").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid options: resource_name must not be empty"
        );
    }

    #[test]
    fn test_braces_are_rejected() {
        assert!(matches!(
            options("v1", "{users}"),
            Err(Error::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_extraction_reads_configured_source() {
        let raw = RawRequest::new(Method::GET)
            .with_query("limit", "4")
            .with_header("x-limit", "9");

        let from_query = Extraction::from_query(|raw: &Value| Ok(pagination::extract(raw)));
        assert_eq!(from_query.extract(&raw).unwrap().limit, 4);

        let from_headers = Extraction::new(RequestDataSource::Headers, |raw: &Value| {
            raw.get("x-limit")
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok())
                .map(|limit| Pagination::new().with_limit(limit))
                .ok_or_else(|| ExtractorError::new("x-limit header is required"))
        });
        assert_eq!(from_headers.source(), RequestDataSource::Headers);
        assert_eq!(from_headers.extract(&raw).unwrap().limit, 9);
        assert_eq!(
            from_headers
                .extract(&RawRequest::new(Method::GET))
                .unwrap_err()
                .message(),
            "x-limit header is required"
        );
    }

    #[test]
    fn test_builder_keeps_extractors() {
        let options = RestOptions::builder("v1", "users", DataAdapter::new())
            .parser(Extraction::from_body(|raw: &Value| Ok(raw.clone())))
            .query(Extraction::from_body(crate::query::identity))
            .build()
            .unwrap();

        assert_eq!(
            options.parser().map(Extraction::source),
            Some(RequestDataSource::Body)
        );
        assert!(options.pagination().is_none());
        assert!(options.query().is_some());

        let raw = RawRequest::new(Method::POST).with_body(json!({ "user": "marco" }));
        let parsed = options.parser().unwrap().extract(&raw).unwrap();
        assert_eq!(parsed, json!({ "user": "marco" }));
    }
}
