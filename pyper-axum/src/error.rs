use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pyper_core::errors::PyperError;
use tracing::error;

#[derive(Debug)]
pub struct PyperAxumError(pub anyhow::Error);

impl From<anyhow::Error> for PyperAxumError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl From<PyperError> for PyperAxumError {
    fn from(e: PyperError) -> Self {
        Self(e.into_anyhow())
    }
}

impl IntoResponse for PyperAxumError {
    fn into_response(self) -> Response {
        // A PyperError anywhere in the context chain keeps its kind and fields.
        let structured = self
            .0
            .chain()
            .find_map(|e| e.downcast_ref::<PyperError>())
            .map(PyperError::sanitize_for_client);

        let err = match structured {
            Some(err) => err,
            None => {
                error!(error = %self.0, "unhandled error");
                PyperError::normalize(self.0).sanitize_for_client()
            }
        };

        let status =
            StatusCode::from_u16(err.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(err.to_json())).into_response()
    }
}
