use crate::{
    errors::AppError,
    state::AppState,
    types::{BatchSlot, QueryResponse},
    upload::TempUpload,
};
use axum::{extract::State, Json};
use axum_extra::extract::Multipart;
use shelfscan::ExtractionRequest;
use tracing::info;

// --- Route Handlers ---

pub async fn root() -> &'static str {
    "shelfscan server is running."
}

pub async fn health_check() -> &'static str {
    "OK"
}

/// Handler for `POST /query-image`.
///
/// Accepts a multipart body with an `image` file field and an optional
/// `customQuery` text field. Without a custom query the two-stage catalog
/// extraction runs; with one, the model answers the query directly and the
/// raw text is returned.
pub async fn query_image_handler(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<QueryResponse>, AppError> {
    let mut upload: Option<TempUpload> = None;
    let mut custom_query: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(anyhow::Error::from)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "image" => {
                let file_name = field.file_name().map(ToString::to_string);
                let content_type = field.content_type().map(ToString::to_string);
                let bytes = field.bytes().await.map_err(anyhow::Error::from)?;
                if bytes.is_empty() {
                    return Err(AppError::Validation("Uploaded image is empty".to_string()));
                }
                upload = Some(
                    TempUpload::persist(&bytes, file_name.as_deref(), content_type.as_deref())
                        .await
                        .map_err(anyhow::Error::from)?,
                );
            }
            "customQuery" => {
                custom_query = Some(field.text().await.map_err(anyhow::Error::from)?);
            }
            _ => {}
        }
    }

    let upload = upload
        .ok_or_else(|| AppError::Validation("Multipart field 'image' is required".to_string()))?;
    info!(
        mime_type = upload.mime_type(),
        has_query = custom_query.is_some(),
        "Received a request to create product catalog"
    );

    // The upload guard lives until this handler returns, so the temp file
    // is released on the error paths as well.
    let request = ExtractionRequest::single(upload.image_input(), custom_query);
    let result = app_state.client.query_image(&request).await?;

    Ok(Json(QueryResponse { result }))
}

/// Handler for `POST /query-images`.
///
/// Accepts up to `max_batch_size` files under the repeated `images` field
/// plus an optional `customQuery`. Images are processed concurrently; the
/// response array is aligned to upload order and a failed image fills only
/// its own slot.
pub async fn query_images_handler(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<BatchSlot>>, AppError> {
    let mut uploads: Vec<TempUpload> = Vec::new();
    let mut custom_query: Option<String> = None;
    let max_batch_size = app_state.config.max_batch_size;

    while let Some(field) = multipart.next_field().await.map_err(anyhow::Error::from)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "images" => {
                if uploads.len() == max_batch_size {
                    return Err(AppError::Validation(format!(
                        "Too many images: the batch limit is {max_batch_size}"
                    )));
                }
                let file_name = field.file_name().map(ToString::to_string);
                let content_type = field.content_type().map(ToString::to_string);
                let bytes = field.bytes().await.map_err(anyhow::Error::from)?;
                if bytes.is_empty() {
                    return Err(AppError::Validation("Uploaded image is empty".to_string()));
                }
                uploads.push(
                    TempUpload::persist(&bytes, file_name.as_deref(), content_type.as_deref())
                        .await
                        .map_err(anyhow::Error::from)?,
                );
            }
            "customQuery" => {
                custom_query = Some(field.text().await.map_err(anyhow::Error::from)?);
            }
            _ => {}
        }
    }

    if uploads.is_empty() {
        return Err(AppError::Validation(
            "Multipart field 'images' is required".to_string(),
        ));
    }
    info!(count = uploads.len(), "Received a batch extraction request");

    let request = ExtractionRequest {
        images: uploads.iter().map(TempUpload::image_input).collect(),
        custom_query,
    };
    let results = app_state.client.query_images(&request).await?;

    Ok(Json(results.into_iter().map(BatchSlot::from).collect()))
}
