use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::TryStreamExt;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::ImageStore;
use crate::errors::AppError;

const FILE_FIELD: &str = "file";

#[derive(ToSchema)]
pub struct UploadImageForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadImageResponse {
    pub url: String,
    pub public_id: String,
}

/// Reads the first `file` part. Other parts are skipped.
async fn read_file(mut multipart: Multipart) -> Result<(Vec<u8>, Option<String>), AppError> {
    while let Some(mut field) = multipart
        .try_next()
        .await
        .map_err(|e| AppError::Unprocessable(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let mut data = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::Unprocessable(e.to_string()))?
        {
            data.extend_from_slice(&chunk);
        }
        return Ok((data, file_name));
    }

    Err(AppError::Unprocessable(format!(
        "Missing '{}' field",
        FILE_FIELD
    )))
}

/// POST /upload-image
///
/// Forwards the uploaded file to the image host and returns where it lives.
#[utoipa::path(
    post,
    path = "/upload-image",
    request_body(content = UploadImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = UploadImageResponse),
        (status = 422, description = "No file part in the request"),
        (status = 502, description = "Image host failure"),
    ),
    tag = "images"
)]
pub async fn upload_image(
    images: web::Data<dyn ImageStore>,
    multipart: Multipart,
) -> Result<HttpResponse, AppError> {
    let (bytes, file_name) = read_file(multipart).await?;
    log::debug!("uploading {} bytes ({:?})", bytes.len(), file_name);

    let uploaded = images.upload(bytes, file_name).await?;

    Ok(HttpResponse::Ok().json(UploadImageResponse {
        url: uploaded.url,
        public_id: uploaded.public_id,
    }))
}
