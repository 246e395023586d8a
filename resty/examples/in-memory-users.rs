//! In-memory users resource
//!
//! Exposes `/v1/users` backed by a map held in memory. Only four of the six
//! capabilities are provided, so `PUT /v1/users/{id}` and `DELETE /v1/users`
//! answer 404.
//!
//! Run with: cargo run --example in-memory-users
//!
//! The service runs on port 8080 by default (configurable via RESTY_SERVICE__PORT env var)
//!
//! Test with:
//!   curl -X POST -H 'content-type: application/json' \
//!        -d '{"name":"marco","email":"marco@example.com","password":"secret"}' \
//!        http://localhost:8080/v1/users
//!   curl 'http://localhost:8080/v1/users?limit=10&page=1'
//!   curl http://localhost:8080/v1/users/1
//!   curl -X DELETE http://localhost:8080/v1/users/1

use std::collections::BTreeMap;
use std::sync::Arc;

use resty::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NewUser {
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Clone, Serialize)]
struct User {
    id: u64,
    name: String,
    email: String,
}

#[derive(Default)]
struct UserStore {
    next_id: u64,
    users: BTreeMap<u64, User>,
}

type Store = Arc<RwLock<UserStore>>;

fn parse_id(id: &str) -> std::result::Result<u64, AdapterError> {
    id.parse()
        .map_err(|_| AdapterError::validation_failed(format!("\"{id}\" is not a user id")))
}

fn users_adapter(store: Store) -> DataAdapter {
    let list = store.clone();
    let create = store.clone();
    let fetch = store.clone();
    let remove = store;

    DataAdapter::new()
        .select_many(move |_resource: String, pagination: Pagination, _query: Option<Query>| {
            let store = list.clone();
            async move {
                let store = store.read().await;
                let users: Vec<User> = store
                    .users
                    .values()
                    .skip(pagination.offset() as usize)
                    .take(pagination.limit as usize)
                    .cloned()
                    .collect();
                Ok::<_, AdapterError>(users)
            }
        })
        .create_one(move |_resource: String, payload: Value| {
            let store = create.clone();
            async move {
                let new_user: NewUser = serde_json::from_value(payload)?;
                let mut store = store.write().await;
                if store.users.values().any(|u| u.email == new_user.email) {
                    return Err(AdapterError::already_exists(format!(
                        "UNIQUE constraint failed: users.email ({})",
                        new_user.email
                    )));
                }
                store.next_id += 1;
                let user = User {
                    id: store.next_id,
                    name: new_user.name,
                    email: new_user.email,
                };
                store.users.insert(user.id, user.clone());
                Ok(user)
            }
        })
        .select_one(move |_resource: String, id: String| {
            let store = fetch.clone();
            async move {
                let id = parse_id(&id)?;
                let user = store.read().await.users.get(&id).cloned();
                user.ok_or_else(|| AdapterError::not_found(format!("no user with id {id}")))
            }
        })
        .delete_one(move |_resource: String, id: String| {
            let store = remove.clone();
            async move {
                let id = parse_id(&id)?;
                let removed = store.write().await.users.remove(&id);
                removed
                    .map(|_| ())
                    .ok_or_else(|| AdapterError::not_found(format!("no user with id {id}")))
            }
        })
}

/// Reject payloads that are not a complete `NewUser` before the adapter runs
fn validate_user(raw: &Value) -> std::result::Result<Value, ExtractorError> {
    let user: NewUser = serde_json::from_value(raw.clone())
        .map_err(|e| ExtractorError::new(format!("invalid user: {e}")))?;
    if !user.email.contains('@') {
        return Err(ExtractorError::new(format!(
            "invalid user: \"{}\" is not an email address",
            user.email
        )));
    }
    Ok(serde_json::to_value(user)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load_for_service("in-memory-users")?;
    init_tracing(&config)?;

    let store = Store::default();
    let options = RestOptions::builder("v1", "users", users_adapter(store))
        .parser(Extraction::from_body(validate_user))
        .build()?;

    Server::new(config).serve(router(options)).await?;

    shutdown_tracing();
    Ok(())
}
