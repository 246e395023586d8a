//! Raw request data, grouped by where it came from

use std::collections::HashMap;
use std::fmt;

use axum::{
    body::Bytes,
    extract::{
        rejection::RawPathParamsRejection, FromRequest, FromRequestParts, Query, RawPathParams,
        Request,
    },
    http::{header::CONTENT_TYPE, HeaderMap, Method},
    Form,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Location an extractor reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestDataSource {
    /// Parsed request body
    Body,
    /// Route parameters (`id`)
    Params,
    /// Query string
    #[default]
    Query,
    /// Request headers, keyed by lowercase name
    Headers,
}

impl fmt::Display for RequestDataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Body => write!(f, "body"),
            Self::Params => write!(f, "params"),
            Self::Query => write!(f, "query"),
            Self::Headers => write!(f, "headers"),
        }
    }
}

/// Everything an extractor may look at, as JSON mappings
///
/// Route parameters, query string values and headers are string-valued
/// objects. The body is whatever the JSON or form decoder produced, and an
/// empty object when the request had no decodable body.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRequest {
    method: Method,
    body: Value,
    params: Value,
    query: Value,
    headers: Value,
}

impl RawRequest {
    /// An empty request with the given method
    pub fn new(method: Method) -> Self {
        Self {
            method,
            body: Value::Object(Map::new()),
            params: Value::Object(Map::new()),
            query: Value::Object(Map::new()),
            headers: Value::Object(Map::new()),
        }
    }

    /// Replace the body
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Add a route parameter
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        insert_string(&mut self.params, name.into(), value.into());
        self
    }

    /// Add a query string value
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        insert_string(&mut self.query, name.into(), value.into());
        self
    }

    /// Add a header; the name is lowercased
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        insert_string(
            &mut self.headers,
            name.into().to_ascii_lowercase(),
            value.into(),
        );
        self
    }

    /// The request method
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The parsed body
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// A route parameter, if present
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }

    /// The mapping read by extractors configured with `source`
    pub fn source(&self, source: RequestDataSource) -> &Value {
        match source {
            RequestDataSource::Body => &self.body,
            RequestDataSource::Params => &self.params,
            RequestDataSource::Query => &self.query,
            RequestDataSource::Headers => &self.headers,
        }
    }

    /// Take the body out, leaving `null` behind
    pub(crate) fn take_body(&mut self) -> Value {
        self.body.take()
    }
}

fn insert_string(target: &mut Value, name: String, value: String) {
    if let Value::Object(map) = target {
        map.insert(name, Value::String(value));
    }
}

fn strings_to_object<I>(pairs: I) -> Value
where
    I: IntoIterator<Item = (String, String)>,
{
    Value::Object(
        pairs
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect(),
    )
}

fn headers_to_object(headers: &HeaderMap) -> Value {
    strings_to_object(headers.iter().filter_map(|(name, value)| {
        value
            .to_str()
            .ok()
            .map(|v| (name.as_str().to_owned(), v.to_owned()))
    }))
}

enum BodyFormat {
    Json,
    Form,
    Unsupported,
}

fn body_format(headers: &HeaderMap) -> BodyFormat {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return BodyFormat::Unsupported;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime == "application/json" || mime.ends_with("+json") {
        BodyFormat::Json
    } else if mime == "application/x-www-form-urlencoded" {
        BodyFormat::Form
    } else {
        BodyFormat::Unsupported
    }
}

impl<S> FromRequest<S> for RawRequest
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let (mut parts, body) = req.into_parts();

        let params = match RawPathParams::from_request_parts(&mut parts, state).await {
            Ok(params) => strings_to_object(
                params
                    .iter()
                    .map(|(name, value)| (name.to_owned(), value.to_owned())),
            ),
            // Collection routes carry no parameters
            Err(RawPathParamsRejection::MissingPathParams(_)) => Value::Object(Map::new()),
            Err(e) => {
                return Err(Error::MalformedRequest(format!(
                    "invalid route parameter: {}",
                    e.body_text()
                )))
            }
        };

        let Query(query) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri).map_err(
            |e| Error::MalformedRequest(format!("invalid query string: {}", e.body_text())),
        )?;

        let method = parts.method.clone();
        let headers = headers_to_object(&parts.headers);
        let format = body_format(&parts.headers);
        let req = Request::from_parts(parts, body);

        let body = match format {
            BodyFormat::Json => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|e| Error::MalformedRequest(e.body_text()))?;
                if bytes.iter().all(u8::is_ascii_whitespace) {
                    Value::Object(Map::new())
                } else {
                    serde_json::from_slice(&bytes).map_err(|e| {
                        Error::MalformedRequest(format!("invalid JSON body: {e}"))
                    })?
                }
            }
            BodyFormat::Form => {
                let Form(fields) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|e| Error::MalformedRequest(e.body_text()))?;
                strings_to_object(fields)
            }
            BodyFormat::Unsupported => Value::Object(Map::new()),
        };

        Ok(Self {
            method,
            body,
            params,
            query: strings_to_object(query),
            headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde_json::json;

    async fn collect(request: Request) -> Result<RawRequest> {
        RawRequest::from_request(request, &()).await
    }

    #[test]
    fn test_source_display_and_serde() {
        assert_eq!(RequestDataSource::Body.to_string(), "body");
        assert_eq!(RequestDataSource::Headers.to_string(), "headers");
        let source: RequestDataSource = serde_json::from_str("\"params\"").unwrap();
        assert_eq!(source, RequestDataSource::Params);
        assert_eq!(RequestDataSource::default(), RequestDataSource::Query);
    }

    #[test]
    fn test_builder_and_source_lookup() {
        let raw = RawRequest::new(Method::PUT)
            .with_body(json!({ "name": "marco" }))
            .with_param("id", "7")
            .with_query("limit", "2")
            .with_header("X-Tenant", "acme");

        assert_eq!(raw.method(), &Method::PUT);
        assert_eq!(raw.param("id"), Some("7"));
        assert_eq!(raw.source(RequestDataSource::Body)["name"], "marco");
        assert_eq!(raw.source(RequestDataSource::Query)["limit"], "2");
        assert_eq!(raw.source(RequestDataSource::Headers)["x-tenant"], "acme");
        assert_eq!(raw.source(RequestDataSource::Params)["id"], "7");
    }

    #[tokio::test]
    async fn test_collects_query_headers_and_json_body() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/v1/users?limit=2&page=3")
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .header("x-trace", "abc")
            .body(Body::from(r#"{"user":"marco"}"#))
            .unwrap();

        let raw = collect(request).await.unwrap();
        assert_eq!(raw.method(), &Method::POST);
        assert_eq!(raw.body(), &json!({ "user": "marco" }));
        assert_eq!(
            raw.source(RequestDataSource::Query),
            &json!({ "limit": "2", "page": "3" })
        );
        assert_eq!(raw.source(RequestDataSource::Headers)["x-trace"], "abc");
        assert_eq!(raw.source(RequestDataSource::Params), &json!({}));
    }

    #[tokio::test]
    async fn test_collects_form_body() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/v1/users")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("name=marco&email=marco%40example.com"))
            .unwrap();

        let raw = collect(request).await.unwrap();
        assert_eq!(
            raw.body(),
            &json!({ "name": "marco", "email": "marco@example.com" })
        );
    }

    #[tokio::test]
    async fn test_empty_or_unknown_body_is_an_empty_object() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/v1/users")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::empty())
            .unwrap();
        assert_eq!(collect(request).await.unwrap().body(), &json!({}));

        let request = Request::builder()
            .method(Method::POST)
            .uri("/v1/users")
            .header(CONTENT_TYPE, "text/plain")
            .body(Body::from("hello"))
            .unwrap();
        assert_eq!(collect(request).await.unwrap().body(), &json!({}));
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/v1/users")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{\"user\":"))
            .unwrap();

        let err = collect(request).await.unwrap_err();
        assert!(matches!(err, Error::MalformedRequest(_)));
        assert!(err.to_string().starts_with("invalid JSON body"));
    }
}
