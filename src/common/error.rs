use crate::common::response::ApiError;
use crate::infrastructure::transcoder::TranscodeError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Every way a compression request can fail. Each one ends the request.
#[derive(Debug, thiserror::Error)]
pub enum CompressError {
    #[error("Error retrieving the file: {0}")]
    InputRetrieval(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Error saving upload: {0}")]
    Storage(#[source] std::io::Error),

    #[error("Error decoding image: {0}")]
    Decode(String),

    #[error("Error encoding image: {0}")]
    Encode(String),

    #[error("Error compressing media: {0}")]
    Transcode(#[from] TranscodeError),

    #[error("Error reading output: {0}")]
    Output(#[source] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CompressError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CompressError::InputRetrieval(_) | CompressError::UnsupportedFormat(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short message for the client. Transcoder output stays in the server log.
    pub fn client_message(&self) -> String {
        match self {
            CompressError::Transcode(TranscodeError::Unavailable(_)) => {
                "Transcoder is not available on this server".to_string()
            }
            CompressError::Transcode(TranscodeError::TimedOut { stage, .. }) => {
                format!("Compression timed out during {stage}")
            }
            CompressError::Transcode(TranscodeError::Failed { stage, status, .. }) => {
                format!("Error compressing media: {stage} exited with {status}")
            }
            CompressError::Transcode(TranscodeError::Spawn { stage, .. }) => {
                format!("Error compressing media: could not start {stage}")
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for CompressError {
    fn into_response(self) -> Response {
        ApiError(self.client_message(), self.status_code()).into_response()
    }
}
