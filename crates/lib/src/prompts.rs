//! # Prompt Templates
//!
//! This module contains the prompt templates used by the [`CatalogClient`]
//! and the pure builder functions that fill them in. Templates use
//! `{placeholder}` substitution; nothing here performs IO.
//!
//! [`CatalogClient`]: crate::CatalogClient

use crate::errors::ExtractError;

/// The free-form Q&A prompt.
///
/// Embeds the caller's custom query verbatim and instructs the model to
/// answer like an assistant, in the same language the query was asked in.
///
/// Placeholders: `{custom_query}`
pub const FREE_FORM_PROMPT: &str = "You will receive a product or invoice image and must answer \
questions based on it. Reply like an assistant, and answer in the same language the question is \
asked in. Question: {custom_query}";

/// The stage-one extraction prompt: pull raw product details out of the
/// image as free text. The structured pass happens in the enrichment stage.
pub const CATALOG_EXTRACTION_PROMPT: &str = "Analyze the provided image and extract the initial \
product details. The product name is compulsory. Also include the details required to list the \
extracted product on e-commerce platforms such as Amazon or Flipkart: at minimum the price in \
rupees (digits only, no currency symbol), a description, the manufacturer, and a category.";

/// The target structure for every schema-based response. All attributes are
/// optional and default to an empty string when unknown.
pub const CATALOG_SCHEMA: &str = r#"{
  "result": {
    "product_metadata": [
      {
        "product_name": "",
        "brand": "",
        "model": "",
        "category": "",
        "price": "",
        "description": "",
        "manufacturer": ""
      }
    ]
  }
}"#;

/// The stage-two enrichment prompt.
///
/// Embeds the stage-one output (JSON-serialized so newlines and quotes
/// survive embedding) and asks for supplementation under [`CATALOG_SCHEMA`].
///
/// Placeholders: `{extracted}`, `{schema}`
pub const ENRICHMENT_PROMPT: &str = "Use the following product information to enhance the \
details: {extracted}. Search for relevant metadata such as model, brand, category, and other \
catalog information. Return the output as a plain JSON object in the following structure, \
leaving any attribute with an unknown value as an empty string:\n{schema}\nDo not add any \
additional characters or formatting such as markdown or code syntax. Follow the exact structure.";

/// The single-stage structured prompt used by the batch endpoint, where each
/// image gets one extraction call instead of the two-stage flow.
///
/// Placeholders: `{schema}`
pub const CATALOG_SINGLE_PROMPT: &str = "Analyze the provided image and extract the product \
details required to list the product on an e-commerce platform. Return the output as a plain \
JSON object in the following structure, leaving any attribute with an unknown value as an empty \
string:\n{schema}\nDo not add any additional characters or formatting such as markdown or code \
syntax. Follow the exact structure.";

/// Builds the free-form Q&A prompt around the caller's custom query.
pub fn build_free_form_prompt(custom_query: &str) -> String {
    FREE_FORM_PROMPT.replace("{custom_query}", custom_query)
}

/// Builds the enrichment prompt around the stage-one response text.
pub fn build_enrichment_prompt(extracted: &str) -> Result<String, ExtractError> {
    let embedded = serde_json::to_string(extracted)?;
    Ok(ENRICHMENT_PROMPT
        .replace("{extracted}", &embedded)
        .replace("{schema}", CATALOG_SCHEMA))
}

/// Builds the single-stage structured extraction prompt.
pub fn build_catalog_prompt() -> String {
    CATALOG_SINGLE_PROMPT.replace("{schema}", CATALOG_SCHEMA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_form_embeds_query_verbatim() {
        let prompt = build_free_form_prompt("¿Cuál es el precio?");
        assert!(prompt.contains("¿Cuál es el precio?"));
        assert!(!prompt.contains("{custom_query}"));
    }

    #[test]
    fn enrichment_embeds_serialized_context_and_schema() {
        let prompt = build_enrichment_prompt("a \"quoted\"\nextraction").unwrap();
        // The prior text is embedded JSON-serialized, escapes included.
        assert!(prompt.contains(r#""a \"quoted\"\nextraction""#));
        assert!(prompt.contains("product_metadata"));
        assert!(!prompt.contains("{schema}"));
    }

    #[test]
    fn schema_template_is_valid_json() {
        let value: serde_json::Value = serde_json::from_str(CATALOG_SCHEMA).unwrap();
        assert!(value["result"]["product_metadata"].is_array());
    }

    #[test]
    fn catalog_prompt_forbids_markdown() {
        let prompt = build_catalog_prompt();
        assert!(prompt.contains("markdown or code syntax"));
        assert!(prompt.contains("product_metadata"));
    }
}
