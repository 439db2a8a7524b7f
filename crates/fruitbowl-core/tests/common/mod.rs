// Allow dead code: not every test binary uses every helper
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use fruitbowl_core::auth::{MemoryStorage, SessionStorage};
use fruitbowl_core::{ApiClient, SessionStore};

pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "hunter2";
pub const TOKEN: &str = "tok-ada";

/// Logins from this address get a 200 without an access token.
pub const MALFORMED_EMAIL: &str = "broken@example.com";
/// Logins from this address get a 500.
pub const CRASH_EMAIL: &str = "crash@example.com";

#[derive(Default)]
struct MockState {
    fruits: Vec<Value>,
    next_id: i64,
    revoked: bool,
    seen_auth: Vec<Option<String>>,
}

/// Stand-in for the remote fruits API.
#[derive(Clone, Default)]
pub struct MockApi {
    state: Arc<Mutex<MockState>>,
}

impl MockApi {
    pub fn with_fruits(names: &[&str]) -> Self {
        let api = Self::default();
        {
            let mut state = api.state.lock().unwrap();
            for name in names {
                state.next_id += 1;
                let id = state.next_id;
                state.fruits.push(json!({"id": id, "name": name}));
            }
        }
        api
    }

    /// Reject every token from now on.
    pub fn revoke_tokens(&self) {
        self.state.lock().unwrap().revoked = true;
    }

    /// Authorization headers seen by catalog endpoints, in order.
    pub fn seen_auth(&self) -> Vec<Option<String>> {
        self.state.lock().unwrap().seen_auth.clone()
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), StatusCode> {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let mut state = self.state.lock().unwrap();
        state.seen_auth.push(auth.clone());
        match auth {
            Some(value) if value == format!("Bearer {}", TOKEN) && !state.revoked => Ok(()),
            _ => Err(StatusCode::UNAUTHORIZED),
        }
    }

    pub async fn spawn(self) -> String {
        let app = Router::new()
            .route("/api/login", post(login))
            .route("/api/fruits", get(list_fruits).post(create_fruit))
            .route("/api/fruits/{id}", put(update_fruit).delete(delete_fruit))
            .route("/api/search", get(search))
            .with_state(self);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api", addr)
    }
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    match email {
        MALFORMED_EMAIL => (StatusCode::OK, Json(json!({"message": "welcome"}))),
        CRASH_EMAIL => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "boom"})),
        ),
        EMAIL if password == PASSWORD => (StatusCode::OK, Json(json!({"access_token": TOKEN}))),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Bad email or password"})),
        ),
    }
}

async fn list_fruits(
    State(api): State<MockApi>,
    headers: HeaderMap,
) -> Result<Json<Vec<Value>>, StatusCode> {
    api.authorize(&headers)?;
    let fruits = api.state.lock().unwrap().fruits.clone();
    Ok(Json(fruits))
}

async fn create_fruit(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    api.authorize(&headers)?;
    let mut state = api.state.lock().unwrap();
    state.next_id += 1;
    body["id"] = json!(state.next_id);
    state.fruits.push(body.clone());
    Ok((StatusCode::CREATED, Json(body)))
}

async fn update_fruit(
    State(api): State<MockApi>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    api.authorize(&headers)?;
    let mut state = api.state.lock().unwrap();
    let fruit = state
        .fruits
        .iter_mut()
        .find(|f| f["id"] == json!(id))
        .ok_or(StatusCode::NOT_FOUND)?;
    body["id"] = json!(id);
    *fruit = body.clone();
    Ok(Json(body))
}

async fn delete_fruit(
    State(api): State<MockApi>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> StatusCode {
    if let Err(status) = api.authorize(&headers) {
        return status;
    }
    let mut state = api.state.lock().unwrap();
    let before = state.fruits.len();
    state.fruits.retain(|f| f["id"] != json!(id));
    if state.fruits.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn search(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Value>>, StatusCode> {
    api.authorize(&headers)?;
    let needle = params.get("q").cloned().unwrap_or_default().to_lowercase();
    let matches = api
        .state
        .lock()
        .unwrap()
        .fruits
        .iter()
        .filter(|f| {
            f["name"]
                .as_str()
                .map(|n| n.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
        .cloned()
        .collect();
    Ok(Json(matches))
}

/// A fresh in-memory session and a gateway pointed at `base_url`.
pub fn client(base_url: &str) -> (ApiClient, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let session = Arc::new(SessionStore::open(storage.clone()));
    (ApiClient::new(base_url, session).unwrap(), storage)
}

/// Same as [`client`] but already logged in.
pub async fn logged_in_client(base_url: &str) -> (ApiClient, Arc<MemoryStorage>) {
    let (api, storage) = client(base_url);
    api.session().login(&api, EMAIL, PASSWORD).await.unwrap();
    (api, storage)
}

pub fn has_session(storage: &MemoryStorage) -> bool {
    storage
        .get(fruitbowl_core::auth::SESSION_KEY)
        .unwrap()
        .is_some()
}
