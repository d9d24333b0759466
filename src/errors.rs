use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid order ID")]
    BadRequest,

    #[error("Order not found")]
    NotFound,

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Upstream error: {0}")]
    BadGateway(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => AppError::NotFound,
            DomainError::InvalidId(_) => AppError::BadRequest,
            DomainError::InvalidInput(msg) => AppError::Unprocessable(msg),
            DomainError::Upstream(msg) => AppError::BadGateway(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let detail = match self {
            AppError::BadGateway(msg) => {
                log::error!("image host failure: {}", msg);
                "Image host error".to_string()
            }
            AppError::Internal(msg) => {
                log::error!("internal failure: {}", msg);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "detail": detail }))
    }
}

/// Failures while wiring the service together at start-up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create database connection pool: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Failed to run database migrations: {0}")]
    Migrations(String),

    #[error("Failed to build image host client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::ResponseError;

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound.error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn bad_request_returns_400() {
        let resp = AppError::BadRequest.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unprocessable_returns_422() {
        let resp = AppError::Unprocessable("Invalid amount: x".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn payload_too_large_returns_413() {
        let resp = AppError::PayloadTooLarge("too big".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn bad_gateway_returns_502() {
        let resp = AppError::BadGateway("timeout".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn body_carries_detail_message() {
        let body = to_bytes(AppError::NotFound.error_response().into_body())
            .await
            .expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json, serde_json::json!({ "detail": "Order not found" }));
    }

    #[actix_web::test]
    async fn internal_details_are_not_leaked() {
        let err = AppError::Internal("password=hunter2".to_string());
        let body = to_bytes(err.error_response().into_body())
            .await
            .expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json["detail"], "Internal server error");
    }

    #[test]
    fn domain_not_found_maps_to_app_not_found() {
        let app_err: AppError = DomainError::NotFound.into();
        assert!(matches!(app_err, AppError::NotFound));
    }

    #[test]
    fn domain_invalid_id_maps_to_bad_request() {
        let app_err: AppError = DomainError::InvalidId("not-an-id".to_string()).into();
        assert!(matches!(app_err, AppError::BadRequest));
        assert_eq!(app_err.to_string(), "Invalid order ID");
    }

    #[test]
    fn domain_invalid_input_maps_to_unprocessable() {
        let app_err: AppError = DomainError::InvalidInput("bad value".to_string()).into();
        assert!(matches!(app_err, AppError::Unprocessable(ref m) if m == "bad value"));
    }

    #[test]
    fn domain_upstream_maps_to_bad_gateway() {
        let app_err: AppError = DomainError::Upstream("down".to_string()).into();
        assert!(matches!(app_err, AppError::BadGateway(_)));
    }

    #[test]
    fn domain_internal_maps_to_app_internal() {
        let app_err: AppError = DomainError::Internal("oops".to_string()).into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }
}
