//! Integration tests for the Dropzone storefront.
//!
//! Each test spawns its own storefront on an ephemeral port and drives it over
//! real HTTP, the way a purchase bot would.
//!
//! ```bash
//! cargo test -p dropzone-integration-tests
//! ```

use std::net::SocketAddr;

use dropzone_storefront::config::StorefrontConfig;
use dropzone_storefront::state::AppState;
use reqwest::{Client, Response};
use serde_json::Value;

/// Admin key every spawned server is configured with.
pub const TEST_ADMIN_KEY: &str = "integration-secret";

/// A storefront running in the background of the current test runtime.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
}

impl TestServer {
    /// Bind `127.0.0.1:0` and serve a fresh storefront with `initial_stock`.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound or the config is rejected.
    pub async fn spawn(initial_stock: u32) -> Self {
        let stock = initial_stock.to_string();
        let config = StorefrontConfig::from_lookup(|key| match key {
            "DROPZONE_ADMIN_KEY" => Some(TEST_ADMIN_KEY.to_string()),
            "DROPZONE_INITIAL_STOCK" => Some(stock.clone()),
            _ => None,
        })
        .expect("test config is valid");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("listener address");
        let app = dropzone_storefront::app(AppState::from_config(config));

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            client: Client::new(),
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// `GET /api/stock` and return the level.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body has no `stock` number.
    pub async fn stock(&self) -> u64 {
        let body = json_body(
            self.client
                .get(self.url("/api/stock"))
                .send()
                .await
                .expect("stock request"),
        )
        .await;
        body["stock"].as_u64().expect("stock is a number")
    }

    /// POST a JSON body and return status plus decoded body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the response is not JSON.
    pub async fn post_json(&self, path: &str, body: &Value) -> (u16, Value) {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("post request");
        let status = response.status().as_u16();
        (status, json_body(response).await)
    }
}

/// Decode a response body as JSON.
///
/// # Panics
///
/// Panics if the body is not valid JSON.
pub async fn json_body(response: Response) -> Value {
    response.json().await.expect("response is JSON")
}
