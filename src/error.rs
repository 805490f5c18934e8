use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Template(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Template error"),
            AppError::Session(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Session error"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad request"),
        };

        tracing::error!("Error: {}", self);

        (status, message).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
