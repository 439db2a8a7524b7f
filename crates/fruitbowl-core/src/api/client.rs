//! Request gateway for the fruits REST API.
//!
//! Every catalog call goes through [`ApiClient::execute`], which composes two
//! hooks around the actual send:
//! - `pre_send` attaches `Authorization: Bearer <token>` when a session exists
//! - `post_receive` ends the session on a 401 and reports the failure
//!
//! There is no retry: a failed call is reported once.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::{AuthError, Authenticator, SessionStore};
use crate::models::{Fruit, FruitInput};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// A hung request fails here instead of leaving the caller waiting forever.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const LOGIN_PATH: &str = "/login";
const FRUITS_PATH: &str = "/fruits";
const SEARCH_PATH: &str = "/search";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: Option<String>,
}

/// API client for the fruits service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ===== Hooks =====

    /// Decorate an outgoing request with the token current at send time.
    pub fn pre_send(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Observe a response. A 401 forces logout and is returned as an error;
    /// everything else passes through untouched.
    pub fn post_receive(&self, response: Response) -> Result<Response, ApiError> {
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(url = %response.url(), "Token rejected by server, ending session");
            self.session.logout();
            return Err(AuthError::Unauthorized.into());
        }
        Ok(response)
    }

    /// Send a request through both hooks.
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self.pre_send(request).send().await?;
        self.post_receive(response)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let url = response.url().to_string();
        response.json().await.map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", url, e))
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, ApiError> {
        let request = self.client.get(self.url(path)).query(query);
        let response = Self::check_response(self.execute(request).await?).await?;
        Self::parse_json(response).await
    }

    async fn send_json<B: Serialize>(&self, method: Method, path: &str, body: &B) -> Result<(), ApiError> {
        let request = self.client.request(method, self.url(path)).json(body);
        Self::check_response(self.execute(request).await?).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.client.delete(self.url(path));
        Self::check_response(self.execute(request).await?).await?;
        Ok(())
    }

    // ===== Catalog Methods =====

    pub async fn fetch_fruits(&self) -> Result<Vec<Fruit>, ApiError> {
        let fruits: Vec<Fruit> = self.get(FRUITS_PATH, &[]).await?;
        debug!(count = fruits.len(), "Fetched fruits");
        Ok(fruits)
    }

    pub async fn create_fruit(&self, fruit: &FruitInput) -> Result<(), ApiError> {
        self.send_json(Method::POST, FRUITS_PATH, fruit).await
    }

    pub async fn update_fruit(&self, id: i64, fruit: &FruitInput) -> Result<(), ApiError> {
        let path = format!("{}/{}", FRUITS_PATH, id);
        self.send_json(Method::PUT, &path, fruit).await
    }

    pub async fn delete_fruit(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("{}/{}", FRUITS_PATH, id)).await
    }

    pub async fn search_fruits(&self, query: &str) -> Result<Vec<Fruit>, ApiError> {
        self.get(SEARCH_PATH, &[("q", query)]).await
    }
}

#[async_trait]
impl Authenticator for ApiClient {
    /// Login bypasses the hooks: a 401 here means bad credentials, not an
    /// expired session.
    async fn authenticate(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let response = self
            .client
            .post(self.url(LOGIN_PATH))
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(|e| AuthError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(AuthError::Unreachable(format!("server returned {}", status)));
        }
        if !status.is_success() {
            debug!(%status, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

        match body.access_token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(AuthError::MalformedResponse(
                "missing access_token".to_string(),
            )),
        }
    }
}
