use crate::errors::ExtractError;
use crate::providers::ai::AiProvider;
use std::fmt;
use std::path::PathBuf;

/// A single uploaded image handed to the pipeline.
///
/// The backing file is owned by the caller (typically a temp-file guard in
/// the gateway); the pipeline only reads it.
#[derive(Clone, Debug)]
pub struct ImageInput {
    pub path: PathBuf,
    pub mime_type: String,
}

impl ImageInput {
    pub fn new(path: impl Into<PathBuf>, mime_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// One extraction request: one or more images plus an optional free-text
/// custom query. Immutable once built.
#[derive(Clone, Debug, Default)]
pub struct ExtractionRequest {
    pub images: Vec<ImageInput>,
    pub custom_query: Option<String>,
}

impl ExtractionRequest {
    /// A request over a single image.
    pub fn single(image: ImageInput, custom_query: Option<String>) -> Self {
        Self {
            images: vec![image],
            custom_query,
        }
    }

    /// The custom query, if one was supplied and is not blank.
    pub(crate) fn effective_query(&self) -> Option<&str> {
        self.custom_query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

/// The ordered model tiers used for invocation.
///
/// The primary tier is tried first; on a model-invocation failure the
/// fallback tier (when configured) is tried exactly once.
#[derive(Clone, Debug)]
pub struct ModelTiers {
    pub primary: String,
    pub fallback: Option<String>,
}

impl ModelTiers {
    pub fn new(primary: impl Into<String>, fallback: Option<String>) -> Self {
        Self {
            primary: primary.into(),
            fallback,
        }
    }
}

/// A client that runs the image extraction pipeline against a configured
/// AI provider.
pub struct CatalogClient {
    pub(crate) ai_provider: Box<dyn AiProvider>,
    pub(crate) tiers: ModelTiers,
}

impl fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogClient")
            .field("tiers", &self.tiers)
            .finish_non_exhaustive()
    }
}

/// A builder for creating `CatalogClient` instances.
#[derive(Default)]
pub struct CatalogClientBuilder {
    ai_provider: Option<Box<dyn AiProvider>>,
    tiers: Option<ModelTiers>,
}

impl CatalogClientBuilder {
    /// Creates a new `CatalogClientBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the AI provider.
    pub fn ai_provider(mut self, provider: Box<dyn AiProvider>) -> Self {
        self.ai_provider = Some(provider);
        self
    }

    /// Sets the model tiers.
    pub fn model_tiers(mut self, tiers: ModelTiers) -> Self {
        self.tiers = Some(tiers);
        self
    }

    /// Builds the `CatalogClient`, failing when a provider or the model
    /// tiers have not been supplied.
    pub fn build(self) -> Result<CatalogClient, ExtractError> {
        let ai_provider = self.ai_provider.ok_or(ExtractError::MissingAiProvider)?;
        let tiers = self.tiers.ok_or(ExtractError::MissingModelTiers)?;
        Ok(CatalogClient { ai_provider, tiers })
    }
}
