//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the
//! logic for building it at startup. The state holds the configuration and
//! the extraction client; both are immutable once built and shared across
//! every request handler.

use crate::config::AppConfig;
use shelfscan::{
    providers::ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider},
    CatalogClient, CatalogClientBuilder, ModelTiers,
};
use std::sync::Arc;
use std::time::Duration;

/// The default Gemini models endpoint; the model identifier is appended
/// per invocation.
const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<AppConfig>,
    /// The extraction pipeline client.
    pub client: Arc<CatalogClient>,
}

/// Builds the shared application state from the configuration.
///
/// This instantiates the configured AI provider and assembles the
/// `CatalogClient` around it. Any missing credential or URL fails fast.
pub fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let ai_provider: Box<dyn AiProvider> = match config.provider.as_str() {
        "gemini" => {
            let api_key = config
                .api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("api_key is required for the gemini provider"))?;
            let api_url = config
                .api_url
                .clone()
                .unwrap_or_else(|| GEMINI_API_URL.to_string());
            Box::new(GeminiProvider::new(api_url, api_key, timeout)?)
        }
        "local" => {
            let api_url = config.api_url.clone().ok_or_else(|| {
                anyhow::anyhow!("api_url is required for the local provider. Please set API_URL.")
            })?;
            Box::new(LocalAiProvider::new(
                api_url,
                config.api_key.clone(),
                timeout,
            )?)
        }
        other => {
            return Err(anyhow::anyhow!("Unsupported AI provider type '{other}'"));
        }
    };

    let client = CatalogClientBuilder::new()
        .ai_provider(ai_provider)
        .model_tiers(ModelTiers::new(
            config.model.clone(),
            config.fallback_model.clone(),
        ))
        .build()?;

    Ok(AppState {
        config: Arc::new(config),
        client: Arc::new(client),
    })
}
