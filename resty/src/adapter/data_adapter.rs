//! The capability bag handed to the router

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use serde_json::Value;

use super::{AdapterError, Capability};
use crate::error::{Error, Result};
use crate::pagination::Pagination;
use crate::query::Query;

/// Result type for adapter operations
pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

/// Future returned by a stored capability
pub type AdapterFuture = BoxFuture<'static, AdapterResult<Value>>;

type CreateOneFn = Arc<dyn Fn(String, Value) -> AdapterFuture + Send + Sync>;
type SelectOneFn = Arc<dyn Fn(String, String) -> AdapterFuture + Send + Sync>;
type SelectManyFn = Arc<dyn Fn(String, Pagination, Option<Query>) -> AdapterFuture + Send + Sync>;
type UpdateOneFn = Arc<dyn Fn(String, String, Value) -> AdapterFuture + Send + Sync>;
type DeleteOneFn = Arc<dyn Fn(String, String) -> AdapterFuture + Send + Sync>;
type DeleteAllFn = Arc<dyn Fn(String) -> AdapterFuture + Send + Sync>;

/// Storage operations for one resource
///
/// Every capability is optional. The router binds a route only for the
/// capabilities present here, so an adapter with `select_many` alone exposes
/// a read-only listing. The first argument of every capability is the
/// resource name.
///
/// Capabilities are async closures returning `Result<T, AdapterError>` for
/// any `T: Serialize`; the value is converted to JSON before it is sent.
///
/// # Example
///
/// ```rust
/// use resty::adapter::{AdapterError, DataAdapter};
/// use resty::pagination::Pagination;
/// use resty::query::Query;
/// use serde_json::{json, Value};
///
/// let adapter = DataAdapter::new()
///     .select_many(|_resource: String, _pagination: Pagination, _query: Option<Query>| async {
///         Ok::<_, AdapterError>(vec![json!({ "id": 1 })])
///     })
///     .create_one(|_resource: String, body: Value| async move { Ok::<_, AdapterError>(body) });
///
/// assert_eq!(adapter.capabilities().len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct DataAdapter {
    create_one: Option<CreateOneFn>,
    select_one: Option<SelectOneFn>,
    select_many: Option<SelectManyFn>,
    update_one: Option<UpdateOneFn>,
    delete_one: Option<DeleteOneFn>,
    delete_all: Option<DeleteAllFn>,
}

fn into_json<Fut, T>(fut: Fut) -> AdapterFuture
where
    Fut: Future<Output = AdapterResult<T>> + Send + 'static,
    T: Serialize,
{
    async move {
        let value = fut.await?;
        Ok(serde_json::to_value(value)?)
    }
    .boxed()
}

impl DataAdapter {
    /// An adapter without any capability
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `createOne(resource, payload)`
    #[must_use]
    pub fn create_one<F, Fut, T>(mut self, f: F) -> Self
    where
        F: Fn(String, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AdapterResult<T>> + Send + 'static,
        T: Serialize,
    {
        let f: CreateOneFn = Arc::new(move |resource, payload| into_json(f(resource, payload)));
        self.create_one = Some(f);
        self
    }

    /// Install `selectOne(resource, id)`
    #[must_use]
    pub fn select_one<F, Fut, T>(mut self, f: F) -> Self
    where
        F: Fn(String, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AdapterResult<T>> + Send + 'static,
        T: Serialize,
    {
        let f: SelectOneFn = Arc::new(move |resource, id| into_json(f(resource, id)));
        self.select_one = Some(f);
        self
    }

    /// Install `selectMany(resource, pagination, query)`
    ///
    /// `query` is `None` unless a query extractor is configured.
    #[must_use]
    pub fn select_many<F, Fut, T>(mut self, f: F) -> Self
    where
        F: Fn(String, Pagination, Option<Query>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AdapterResult<T>> + Send + 'static,
        T: Serialize,
    {
        let f: SelectManyFn = Arc::new(move |resource, pagination, query| {
            into_json(f(resource, pagination, query))
        });
        self.select_many = Some(f);
        self
    }

    /// Install `updateOne(resource, id, payload)`
    #[must_use]
    pub fn update_one<F, Fut, T>(mut self, f: F) -> Self
    where
        F: Fn(String, String, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AdapterResult<T>> + Send + 'static,
        T: Serialize,
    {
        let f: UpdateOneFn =
            Arc::new(move |resource, id, payload| into_json(f(resource, id, payload)));
        self.update_one = Some(f);
        self
    }

    /// Install `deleteOne(resource, id)`
    #[must_use]
    pub fn delete_one<F, Fut, T>(mut self, f: F) -> Self
    where
        F: Fn(String, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AdapterResult<T>> + Send + 'static,
        T: Serialize,
    {
        let f: DeleteOneFn = Arc::new(move |resource, id| into_json(f(resource, id)));
        self.delete_one = Some(f);
        self
    }

    /// Install `deleteAll(resource)`
    #[must_use]
    pub fn delete_all<F, Fut, T>(mut self, f: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AdapterResult<T>> + Send + 'static,
        T: Serialize,
    {
        let f: DeleteAllFn = Arc::new(move |resource| into_json(f(resource)));
        self.delete_all = Some(f);
        self
    }

    /// Whether `capability` is installed
    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::CreateOne => self.create_one.is_some(),
            Capability::SelectOne => self.select_one.is_some(),
            Capability::SelectMany => self.select_many.is_some(),
            Capability::UpdateOne => self.update_one.is_some(),
            Capability::DeleteOne => self.delete_one.is_some(),
            Capability::DeleteAll => self.delete_all.is_some(),
        }
    }

    /// Installed capabilities, in [`Capability::ALL`] order
    pub fn capabilities(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|c| self.supports(*c))
            .collect()
    }

    /// Start a `createOne` call
    ///
    /// # Errors
    ///
    /// [`Error::NotImplemented`] when the capability is not installed.
    pub fn call_create_one(&self, resource: String, payload: Value) -> Result<AdapterFuture> {
        let f = self
            .create_one
            .as_ref()
            .ok_or(Error::NotImplemented(Capability::CreateOne))?;
        Ok(f(resource, payload))
    }

    /// Start a `selectOne` call
    ///
    /// # Errors
    ///
    /// [`Error::NotImplemented`] when the capability is not installed.
    pub fn call_select_one(&self, resource: String, id: String) -> Result<AdapterFuture> {
        let f = self
            .select_one
            .as_ref()
            .ok_or(Error::NotImplemented(Capability::SelectOne))?;
        Ok(f(resource, id))
    }

    /// Start a `selectMany` call
    ///
    /// # Errors
    ///
    /// [`Error::NotImplemented`] when the capability is not installed.
    pub fn call_select_many(
        &self,
        resource: String,
        pagination: Pagination,
        query: Option<Query>,
    ) -> Result<AdapterFuture> {
        let f = self
            .select_many
            .as_ref()
            .ok_or(Error::NotImplemented(Capability::SelectMany))?;
        Ok(f(resource, pagination, query))
    }

    /// Start an `updateOne` call
    ///
    /// # Errors
    ///
    /// [`Error::NotImplemented`] when the capability is not installed.
    pub fn call_update_one(
        &self,
        resource: String,
        id: String,
        payload: Value,
    ) -> Result<AdapterFuture> {
        let f = self
            .update_one
            .as_ref()
            .ok_or(Error::NotImplemented(Capability::UpdateOne))?;
        Ok(f(resource, id, payload))
    }

    /// Start a `deleteOne` call
    ///
    /// # Errors
    ///
    /// [`Error::NotImplemented`] when the capability is not installed.
    pub fn call_delete_one(&self, resource: String, id: String) -> Result<AdapterFuture> {
        let f = self
            .delete_one
            .as_ref()
            .ok_or(Error::NotImplemented(Capability::DeleteOne))?;
        Ok(f(resource, id))
    }

    /// Start a `deleteAll` call
    ///
    /// # Errors
    ///
    /// [`Error::NotImplemented`] when the capability is not installed.
    pub fn call_delete_all(&self, resource: String) -> Result<AdapterFuture> {
        let f = self
            .delete_all
            .as_ref()
            .ok_or(Error::NotImplemented(Capability::DeleteAll))?;
        Ok(f(resource))
    }
}

impl fmt::Debug for DataAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataAdapter")
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_empty_adapter() {
        let adapter = DataAdapter::new();
        assert!(adapter.capabilities().is_empty());
        for capability in Capability::ALL {
            assert!(!adapter.supports(capability));
        }
    }

    #[test]
    fn test_capabilities_follow_declaration_order() {
        let adapter = DataAdapter::new()
            .delete_all(|_: String| async { Ok::<_, AdapterError>(()) })
            .create_one(|_: String, body: Value| async move { Ok::<_, AdapterError>(body) });
        assert_eq!(
            adapter.capabilities(),
            vec![Capability::CreateOne, Capability::DeleteAll]
        );
    }

    #[test]
    fn test_debug_lists_capabilities() {
        let adapter = DataAdapter::new()
            .select_one(|_: String, id: String| async move { Ok::<_, AdapterError>(id) });
        assert_eq!(
            format!("{adapter:?}"),
            "DataAdapter { capabilities: [SelectOne] }"
        );
    }

    #[tokio::test]
    async fn test_missing_capability_is_not_implemented() {
        let adapter = DataAdapter::new();
        let err = adapter
            .call_create_one("users".into(), json!({}))
            .err()
            .unwrap();
        assert!(matches!(err, Error::NotImplemented(Capability::CreateOne)));
        assert_eq!(err.to_string(), "createOne not yet implemented");
    }

    #[tokio::test]
    async fn test_results_are_converted_to_json() {
        #[derive(Serialize)]
        struct User {
            id: u32,
            name: &'static str,
        }

        let adapter = DataAdapter::new().select_one(|resource: String, id: String| async move {
            assert_eq!(resource, "users");
            Ok::<_, AdapterError>(User {
                id: id.parse().unwrap_or_default(),
                name: "marco",
            })
        });

        let value = adapter
            .call_select_one("users".into(), "7".into())
            .unwrap()
            .await
            .unwrap();
        assert_eq!(value, json!({ "id": 7, "name": "marco" }));
    }

    #[tokio::test]
    async fn test_unit_result_is_null() {
        let adapter = DataAdapter::new().delete_all(|_: String| async { Ok::<_, AdapterError>(()) });
        let value = adapter
            .call_delete_all("users".into())
            .unwrap()
            .await
            .unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn test_adapter_errors_pass_through() {
        let adapter = DataAdapter::new().delete_one(|_: String, id: String| async move {
            Err::<(), _>(AdapterError::not_found(format!("no user {id}")))
        });
        let err = adapter
            .call_delete_one("users".into(), "9".into())
            .unwrap()
            .await
            .unwrap_err();
        assert_eq!(err, AdapterError::not_found("no user 9"));
    }

    #[tokio::test]
    async fn test_select_many_receives_pagination_and_query() {
        let adapter = DataAdapter::new().select_many(
            |_: String, pagination: Pagination, query: Option<Query>| async move {
                Ok::<_, AdapterError>(json!({
                    "limit": pagination.limit,
                    "hasQuery": query.is_some(),
                }))
            },
        );
        let value = adapter
            .call_select_many("users".into(), Pagination::new().with_limit(5), None)
            .unwrap()
            .await
            .unwrap();
        assert_eq!(value, json!({ "limit": 5, "hasQuery": false }));
    }

    #[tokio::test]
    async fn test_clones_share_closures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let adapter = DataAdapter::new().update_one(
            move |_: String, _: String, payload: Value| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok::<_, AdapterError>(payload) }
            },
        );
        let cloned = adapter.clone();

        adapter
            .call_update_one("users".into(), "1".into(), json!({}))
            .unwrap()
            .await
            .unwrap();
        cloned
            .call_update_one("users".into(), "1".into(), json!({}))
            .unwrap()
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
