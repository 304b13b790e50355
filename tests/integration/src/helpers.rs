//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and making HTTP requests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use account_api::{create_app, create_app_state, serve};
use account_common::AppConfig;
use anyhow::Result;
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{sign_in_body, Credentials, ErrorEnvelope};

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server on the in-memory backend with demo accounts seeded
    pub async fn start() -> Result<Self> {
        Self::start_with_config(memory_config(&[])?).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        let app = create_app(state)?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            serve(listener, app).await.ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url(), path);
        let builder = self.client.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.request(Method::GET, path, None).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.request(Method::GET, path, Some(token)).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.request(Method::POST, path, None).json(body).send().await?)
    }

    /// Make a POST request with auth token
    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .request(Method::POST, path, Some(token))
            .json(body)
            .send()
            .await?)
    }

    /// Make a PUT request with auth token and JSON body
    pub async fn put_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .request(Method::PUT, path, Some(token))
            .json(body)
            .send()
            .await?)
    }

    /// Make a PUT request with an optional auth token and no body
    pub async fn put_empty(&self, path: &str, token: Option<&str>) -> Result<Response> {
        Ok(self.request(Method::PUT, path, token).send().await?)
    }

    /// Make a DELETE request with auth token
    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.request(Method::DELETE, path, Some(token)).send().await?)
    }

    /// Sign in and return the credential pair
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<Credentials> {
        let response = self
            .post("/api/Authentication/SignIn", &sign_in_body(username, password))
            .await?;
        assert_json(response, StatusCode::OK).await
    }

    /// Sign in and return only the access token
    pub async fn access_token(&self, username: &str, password: &str) -> Result<String> {
        Ok(self.sign_in(username, password).await?.access_token)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// In-memory configuration with demo seeding and a generous rate limit.
/// `overrides` replace or add variables.
pub fn memory_config(overrides: &[(&str, &str)]) -> Result<AppConfig> {
    let mut vars: HashMap<String, String> = [
        ("STORAGE_BACKEND", "memory"),
        ("JWT_SECRET", "integration-test-secret"),
        ("SEED_DEMO_ACCOUNTS", "true"),
        ("RATE_LIMIT_REQUESTS_PER_SECOND", "1000"),
        ("RATE_LIMIT_BURST", "100000"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    for (key, value) in overrides {
        vars.insert((*key).to_string(), (*value).to_string());
    }

    AppConfig::from_lookup(|key| vars.get(key).cloned())
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// PostgreSQL configuration from the environment, or `None` when
/// `DATABASE_URL` is not set
pub fn postgres_config() -> Result<Option<AppConfig>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return Ok(None);
    };

    let migrations = concat!(env!("CARGO_MANIFEST_DIR"), "/../../migrations");
    memory_config(&[
        ("STORAGE_BACKEND", "postgres"),
        ("DATABASE_URL", url.as_str()),
        ("MIGRATIONS_DIR", migrations),
    ])
    .map(Some)
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert an error response: status, error code, and the Bearer challenge
/// exactly on 401
pub async fn assert_error(
    response: Response,
    expected_status: StatusCode,
    expected_code: &str,
) -> Result<()> {
    let challenge = response
        .headers()
        .get(header::WWW_AUTHENTICATE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let envelope: ErrorEnvelope = assert_json(response, expected_status).await?;
    anyhow::ensure!(
        envelope.error.code == expected_code,
        "Expected error code {expected_code}, got {} ({})",
        envelope.error.code,
        envelope.error.message
    );

    if expected_status == StatusCode::UNAUTHORIZED {
        anyhow::ensure!(
            challenge.as_deref() == Some("Bearer"),
            "Missing WWW-Authenticate challenge"
        );
    } else {
        anyhow::ensure!(challenge.is_none(), "Unexpected WWW-Authenticate challenge");
    }
    Ok(())
}
