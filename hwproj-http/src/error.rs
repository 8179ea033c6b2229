use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

// Error
pub enum Error {
    NotFound(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound(error) => {
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            }
        }
    }
}
