//! # Common Test Utilities
//!
//! Centralizes the harness used across the `shelfscan-server` integration
//! tests. `TestApp` spawns the real router on a random port with the
//! pipeline pointed at an `httpmock` model endpoint speaking the
//! OpenAI-compatible wire format.

// Not every test file uses every helper.
#![allow(unused)]

use anyhow::Result;
use httpmock::MockServer;
use reqwest::multipart;
use reqwest::Client;
use shelfscan_server::{config::AppConfig, router::create_router, state::build_app_state};
use tokio::{net::TcpListener, task::JoinHandle};

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    _server_handle: JoinHandle<()>,
}

impl TestApp {
    /// Spawns the application server with the default test configuration.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(|_| {}).await
    }

    /// Spawns the application server, letting the caller tweak the
    /// configuration (model tiers, batch limits) before startup.
    pub async fn spawn_with(tweak: impl FnOnce(&mut AppConfig)) -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start();

        let mut config = AppConfig {
            port: 0,
            api_key: None,
            provider: "local".to_string(),
            api_url: Some(mock_server.url("/v1/chat/completions")),
            model: "mock-primary".to_string(),
            fallback_model: None,
            max_batch_size: 10,
            request_timeout_secs: 5,
        };
        tweak(&mut config);

        let app_state = build_app_state(config)?;
        let app = create_router(app_state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        let address = format!("http://127.0.0.1:{port}");

        let server_handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Server error: {e}");
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            _server_handle: server_handle,
        })
    }
}

/// Builds a multipart image part with the given bytes.
pub fn image_part(bytes: &[u8], file_name: &str) -> multipart::Part {
    multipart::Part::bytes(bytes.to_vec())
        .file_name(file_name.to_string())
        .mime_str("image/jpeg")
        .expect("valid mime type")
}

/// The OpenAI-compatible chat-completion body the mock model returns.
pub fn chat_completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [
            {"message": {"role": "assistant", "content": content}}
        ]
    })
}
