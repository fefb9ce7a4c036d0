//! # Image to Product Catalog
//!
//! This crate provides a client that turns an uploaded product image into
//! structured catalog metadata using a configurable generative AI provider.
//! The pipeline runs one or two sequential model calls (extract, then an
//! optional enrichment pass), normalizes the response, and falls back to a
//! secondary model tier once when the primary invocation fails.

pub mod errors;
pub mod normalize;
pub mod prompts;
pub mod providers;
pub mod types;

pub use errors::ExtractError;
pub use normalize::normalize;
pub use types::{
    CatalogClient, CatalogClientBuilder, ExtractionRequest, ImageInput, ModelTiers,
};

use crate::providers::ai::ImagePart;
use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, info, warn};

impl CatalogClient {
    /// Executes the pipeline for a single-image request.
    ///
    /// Two flows share this entry point:
    ///
    /// 1. **Free-form Q&A:** when the request carries a non-blank custom
    ///    query, the image and query go to the model in one call and the
    ///    raw answer text is returned without parsing.
    /// 2. **Catalog extraction (default):** a two-stage flow — extract
    ///    product details from the image, then a text-only enrichment call
    ///    that supplements them under the catalog schema — whose final
    ///    response is normalized into structured JSON.
    pub async fn query_image(&self, request: &ExtractionRequest) -> Result<Value, ExtractError> {
        let image = request.images.first().ok_or(ExtractError::MissingImage)?;

        if let Some(query) = request.effective_query() {
            return self.free_form(image, query).await;
        }

        info!("Starting image data extraction");
        let parts = self.load_image_part(image).await?;
        let extracted = self
            .invoke_with_fallback(prompts::CATALOG_EXTRACTION_PROMPT, &parts)
            .await?;
        debug!(raw_len = extracted.len(), "Image data extraction completed");

        info!("Searching for additional product details");
        let enrichment_prompt = prompts::build_enrichment_prompt(&extracted)?;
        let enriched = self.invoke_with_fallback(&enrichment_prompt, &[]).await?;
        debug!(raw_len = enriched.len(), "Enrichment completed");

        normalize(&enriched)
    }

    /// Executes the pipeline for a batch request.
    ///
    /// Every image runs the single-stage structured flow (or free-form when
    /// a custom query is present) concurrently. The returned vector is
    /// aligned to input order regardless of completion order, and one
    /// image's failure fills only its own slot.
    pub async fn query_images(
        &self,
        request: &ExtractionRequest,
    ) -> Result<Vec<Result<Value, ExtractError>>, ExtractError> {
        if request.images.is_empty() {
            return Err(ExtractError::MissingImage);
        }

        info!(count = request.images.len(), "Starting batch extraction");
        let query = request.effective_query();
        let results = join_all(
            request
                .images
                .iter()
                .map(|image| self.extract_one(image, query)),
        )
        .await;

        Ok(results)
    }

    /// Runs the single-stage flow for one image of a batch.
    async fn extract_one(
        &self,
        image: &ImageInput,
        custom_query: Option<&str>,
    ) -> Result<Value, ExtractError> {
        if let Some(query) = custom_query {
            return self.free_form(image, query).await;
        }

        let parts = self.load_image_part(image).await?;
        let raw = self
            .invoke_with_fallback(&prompts::build_catalog_prompt(), &parts)
            .await?;
        normalize(&raw)
    }

    /// Answers a custom query about an image, returning the raw model text.
    /// No parse is attempted for this variant.
    async fn free_form(&self, image: &ImageInput, query: &str) -> Result<Value, ExtractError> {
        info!("Answering custom query about image");
        let parts = self.load_image_part(image).await?;
        let prompt = prompts::build_free_form_prompt(query);
        let text = self.invoke_with_fallback(&prompt, &parts).await?;
        Ok(Value::String(text))
    }

    /// Invokes the primary model tier, retrying exactly once against the
    /// fallback tier on a model-invocation failure.
    ///
    /// Only model failures are retried; validation and parse errors pass
    /// through untouched, and there is no deeper cascade.
    async fn invoke_with_fallback(
        &self,
        prompt: &str,
        images: &[ImagePart],
    ) -> Result<String, ExtractError> {
        match self
            .ai_provider
            .generate(&self.tiers.primary, prompt, images)
            .await
        {
            Ok(text) => Ok(text),
            Err(err) if err.is_model_failure() => {
                let Some(fallback) = &self.tiers.fallback else {
                    return Err(err);
                };
                warn!(
                    primary = %self.tiers.primary,
                    fallback = %fallback,
                    error = %err,
                    "Primary model invocation failed, retrying against fallback tier"
                );
                self.ai_provider.generate(fallback, prompt, images).await
            }
            Err(err) => Err(err),
        }
    }

    /// Reads the image file and encodes it for transmission.
    async fn load_image_part(&self, image: &ImageInput) -> Result<Vec<ImagePart>, ExtractError> {
        let bytes = tokio::fs::read(&image.path).await?;
        Ok(vec![ImagePart::from_bytes(&bytes, &image.mime_type)])
    }
}
