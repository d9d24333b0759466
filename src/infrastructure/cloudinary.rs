use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};

use crate::config::CloudinaryConfig;
use crate::domain::errors::DomainError;
use crate::domain::order::UploadedImage;
use crate::domain::ports::ImageStore;

impl From<reqwest::Error> for DomainError {
    fn from(e: reqwest::Error) -> Self {
        DomainError::Upstream(e.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Signs upload parameters the way Cloudinary expects: sort by key, join as
/// `k=v` pairs with `&`, append the API secret, SHA-1, lowercase hex.
pub fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

pub struct CloudinaryImageStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryImageStore {
    pub fn new(config: CloudinaryConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.config.api_base, self.config.cloud_name
        )
    }
}

#[async_trait]
impl ImageStore for CloudinaryImageStore {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        file_name: Option<String>,
    ) -> Result<UploadedImage, DomainError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(&[("timestamp", timestamp.as_str())], &self.config.api_secret);

        let file = Part::bytes(bytes).file_name(file_name.unwrap_or_else(|| "file".to_string()));
        let form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature);

        let resp = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(DomainError::Upstream(format!(
                "image host returned {}: {}",
                status, message
            )));
        }

        let uploaded: UploadResponse = serde_json::from_slice(&body).map_err(|e| {
            DomainError::Upstream(format!("unexpected image host response: {}", e))
        })?;

        Ok(UploadedImage {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use actix_multipart::Multipart;
    use actix_web::{web, App, HttpResponse, HttpServer};
    use futures::TryStreamExt;
    use serde_json::json;

    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn sign_matches_documented_example() {
        let signature = sign(
            &[
                ("timestamp", "1315060510"),
                ("public_id", "sample_image"),
                ("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop"),
            ],
            "abcd",
        );
        assert_eq!(signature, "bfd09f95f331f558cbd1320e67aa8d488770583e");
    }

    #[test]
    fn sign_ignores_parameter_order() {
        let a = sign(&[("a", "1"), ("b", "2")], SECRET);
        let b = sign(&[("b", "2"), ("a", "1")], SECRET);
        assert_eq!(a, b);
        assert_eq!(a.len(), 40);
    }

    /// Stand-in for the upload endpoint: checks the signature and echoes a
    /// Cloudinary-shaped response.
    async fn fake_upload(mut payload: Multipart) -> HttpResponse {
        let mut fields: HashMap<String, Vec<u8>> = HashMap::new();
        while let Ok(Some(mut field)) = payload.try_next().await {
            let name = field.name().unwrap_or_default().to_string();
            let mut data = Vec::new();
            while let Ok(Some(chunk)) = field.try_next().await {
                data.extend_from_slice(&chunk);
            }
            fields.insert(name, data);
        }

        let text = |k: &str| {
            fields
                .get(k)
                .map(|v| String::from_utf8_lossy(v).into_owned())
                .unwrap_or_default()
        };
        let timestamp = text("timestamp");
        if text("signature") != sign(&[("timestamp", timestamp.as_str())], SECRET) {
            return HttpResponse::Unauthorized()
                .json(json!({ "error": { "message": "Invalid Signature" } }));
        }

        HttpResponse::Ok().json(json!({
            "secure_url": "https://res.cloudinary.com/demo/image/upload/v1/sample.jpg",
            "public_id": "sample",
            "bytes": fields.get("file").map(Vec::len).unwrap_or(0),
        }))
    }

    fn spawn_fake_host() -> String {
        let server = HttpServer::new(|| {
            App::new().route("/{cloud}/image/upload", web::post().to(fake_upload))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind failed");
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{}", addr)
    }

    fn store(api_base: String, api_secret: &str) -> CloudinaryImageStore {
        CloudinaryImageStore::new(CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: api_secret.to_string(),
            api_base,
            timeout: Duration::from_secs(5),
        })
        .expect("client build failed")
    }

    #[actix_web::test]
    async fn upload_returns_secure_url_and_public_id() {
        let store = store(spawn_fake_host(), SECRET);

        let uploaded = store
            .upload(b"\x89PNG fake".to_vec(), Some("cat.png".to_string()))
            .await
            .expect("upload failed");

        assert_eq!(
            uploaded,
            UploadedImage {
                url: "https://res.cloudinary.com/demo/image/upload/v1/sample.jpg".to_string(),
                public_id: "sample".to_string(),
            }
        );
    }

    #[actix_web::test]
    async fn host_rejection_is_upstream_error() {
        let store = store(spawn_fake_host(), "wrong-secret");

        let err = store.upload(b"data".to_vec(), None).await.unwrap_err();

        match err {
            DomainError::Upstream(msg) => assert!(msg.contains("Invalid Signature"), "{msg}"),
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[actix_web::test]
    async fn unreachable_host_is_upstream_error() {
        // Reserve a port and release it so nothing is listening there.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .expect("bind failed")
            .local_addr()
            .expect("addr failed")
            .port();
        let store = store(format!("http://127.0.0.1:{}", port), SECRET);

        let err = store.upload(b"data".to_vec(), None).await.unwrap_err();

        assert!(matches!(err, DomainError::Upstream(_)));
    }
}
