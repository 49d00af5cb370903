use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use sensora_cart::CartError;
use sensora_catalog::CatalogError;

#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    Conflict(String),
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::DuplicateSlug(_) => AppError::Conflict(err.to_string()),
            CatalogError::NotFound { .. } => AppError::NotFound(err.to_string()),
            CatalogError::Validation(_) => AppError::Validation(err.to_string()),
            CatalogError::Storage(_) => AppError::Internal(err.into()),
        }
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::InvalidQuantity(_) => AppError::Validation(err.to_string()),
            CartError::CartNotFound(_)
            | CartError::LineNotFound(_)
            | CartError::CustomerNotFound(_)
            | CartError::UnknownProduct(_) => AppError::NotFound(err.to_string()),
            CartError::Storage(_) => AppError::Internal(err.into()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}
