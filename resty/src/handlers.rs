//! Route handlers, one per capability
//!
//! [`crate::router`] binds these for the capabilities the adapter provides.
//! They are public so a service can mount them on routes of its own; a
//! handler reached for a missing capability answers with a 500 whose message
//! is `"<capability> not yet implemented"`.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::adapter::Capability;
use crate::error::{Error, Result};
use crate::extract::RequestContext;
use crate::router::ResourceState;

fn reply(value: Value) -> Response {
    match value {
        Value::Null => ().into_response(),
        value => Json(value).into_response(),
    }
}

/// `POST` on the collection: create a resource from the payload
pub async fn create_one(
    State(state): State<ResourceState>,
    ctx: RequestContext,
) -> Result<Response> {
    let options = state.options();
    let value = options
        .data_adapter()
        .call_create_one(options.resource_name().to_string(), ctx.into_payload())?
        .await
        .map_err(|e| Error::adapter(Capability::CreateOne, "could not create the new resource", e))?;
    Ok(reply(value))
}

/// `GET` on the collection: list resources
pub async fn select_many(
    State(state): State<ResourceState>,
    ctx: RequestContext,
) -> Result<Response> {
    let options = state.options();
    let value = options
        .data_adapter()
        .call_select_many(
            options.resource_name().to_string(),
            ctx.pagination,
            ctx.query,
        )?
        .await
        .map_err(|e| Error::adapter(Capability::SelectMany, "could not get the resources", e))?;
    Ok(reply(value))
}

/// `GET` on an item: fetch one resource
pub async fn select_one(
    State(state): State<ResourceState>,
    ctx: RequestContext,
) -> Result<Response> {
    let options = state.options();
    let prefix = format!("could not get the resource \"{}\"", ctx.resource_id);
    let value = options
        .data_adapter()
        .call_select_one(options.resource_name().to_string(), ctx.resource_id)?
        .await
        .map_err(|e| Error::adapter(Capability::SelectOne, prefix, e))?;
    Ok(reply(value))
}

/// `PUT` on an item: replace one resource with the payload
pub async fn update_one(
    State(state): State<ResourceState>,
    ctx: RequestContext,
) -> Result<Response> {
    let options = state.options();
    let prefix = format!("could not update the resource \"{}\"", ctx.resource_id);
    let id = ctx.resource_id.clone();
    let value = options
        .data_adapter()
        .call_update_one(
            options.resource_name().to_string(),
            id,
            ctx.into_payload(),
        )?
        .await
        .map_err(|e| Error::adapter(Capability::UpdateOne, prefix, e))?;
    Ok(reply(value))
}

/// `DELETE` on an item: remove one resource
pub async fn delete_one(
    State(state): State<ResourceState>,
    ctx: RequestContext,
) -> Result<Response> {
    let options = state.options();
    let prefix = format!("could not delete the resource \"{}\"", ctx.resource_id);
    let value = options
        .data_adapter()
        .call_delete_one(options.resource_name().to_string(), ctx.resource_id)?
        .await
        .map_err(|e| Error::adapter(Capability::DeleteOne, prefix, e))?;
    Ok(reply(value))
}

/// `DELETE` on the collection: remove every resource
pub async fn delete_all(
    State(state): State<ResourceState>,
    _ctx: RequestContext,
) -> Result<Response> {
    let options = state.options();
    let value = options
        .data_adapter()
        .call_delete_all(options.resource_name().to_string())?
        .await
        .map_err(|e| Error::adapter(Capability::DeleteAll, "could not delete the resources", e))?;
    Ok(reply(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::DataAdapter;
    use crate::options::RestOptions;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        routing::{delete, post},
        Router,
    };
    use serde_json::json;
    use tower::ServiceExt;

    fn state(adapter: DataAdapter) -> ResourceState {
        ResourceState::new(RestOptions::builder("v1", "users", adapter).build().unwrap())
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_directly_mounted_handler_without_capability() {
        let app = Router::new()
            .route("/signup", post(create_one))
            .with_state(state(DataAdapter::new()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/signup")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "createOne not yet implemented" })
        );
    }

    #[tokio::test]
    async fn test_unit_result_is_an_empty_200() {
        let adapter = DataAdapter::new().delete_all(|_: String| async {
            Ok::<_, crate::adapter::AdapterError>(())
        });
        let app = Router::new()
            .route("/users", delete(delete_all))
            .with_state(state(adapter));

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/users")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_reply_serializes_scalars_verbatim() {
        let response = reply(json!(3));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
    }
}
