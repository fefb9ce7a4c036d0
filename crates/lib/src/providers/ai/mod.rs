pub mod gemini;
pub mod local;

use crate::errors::ExtractError;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use dyn_clone::DynClone;
use std::fmt::Debug;

/// An inline image attachment for a single model invocation.
///
/// The bytes are carried base64-encoded because every supported wire format
/// (Gemini `inlineData`, OpenAI data URIs) transmits them that way.
#[derive(Clone, Debug)]
pub struct ImagePart {
    pub data: String,
    pub mime_type: String,
}

impl ImagePart {
    /// Encodes raw image bytes into a part ready for transmission.
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Self {
        Self {
            data: general_purpose::STANDARD.encode(bytes),
            mime_type: mime_type.to_string(),
        }
    }
}

/// A trait for interacting with a generative AI provider.
///
/// Implementations submit a text prompt plus optional inline images to a
/// named model and return the raw response text. Image parts are sent after
/// the prompt, in order; a text-only invocation passes an empty slice.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        images: &[ImagePart],
    ) -> Result<String, ExtractError>;
}

dyn_clone::clone_trait_object!(AiProvider);
