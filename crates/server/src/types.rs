use serde::Serialize;
use serde_json::Value;
use shelfscan::ExtractError;

use crate::errors::describe_extract_error;

/// The success envelope for single-image queries.
#[derive(Serialize)]
pub struct QueryResponse {
    pub result: Value,
}

/// One slot of a batch response, aligned to the uploaded image order.
///
/// A failed image fills its own slot with the same error shape the
/// single-image endpoint uses, without failing the batch.
#[derive(Serialize)]
#[serde(untagged)]
pub enum BatchSlot {
    Ok { result: Value },
    Err { error: String, details: String },
}

impl From<Result<Value, ExtractError>> for BatchSlot {
    fn from(outcome: Result<Value, ExtractError>) -> Self {
        match outcome {
            Ok(result) => BatchSlot::Ok { result },
            Err(err) => {
                let (summary, details) = describe_extract_error(&err);
                BatchSlot::Err {
                    error: summary.to_string(),
                    details,
                }
            }
        }
    }
}
