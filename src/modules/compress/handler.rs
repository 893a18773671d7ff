use super::artifacts::Artifacts;
use super::model::EncodingJob;
use super::service::CompressService;
use crate::common::error::CompressError;
use crate::common::response::ApiResponse;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use futures_util::{Stream, StreamExt};
use tokio_util::io::ReaderStream;
use tracing::{error, info, warn};

/// Compress an uploaded image, GIF or video
///
/// The compressed file is streamed back as an attachment. All temporary files
/// are removed once the body has been sent.
#[utoipa::path(
    post,
    path = "/api/v1/compress",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Compressed file", body = String, content_type = "application/octet-stream"),
        (status = 400, description = "Missing file or unsupported format", body = ApiResponse<String>),
        (status = 413, description = "Upload too large"),
        (status = 500, description = "Encoding failed", body = ApiResponse<String>)
    ),
    tag = "Compress"
)]
pub async fn compress(State(state): State<AppState>, multipart: Multipart) -> Response {
    let job = match CompressService::compress_upload(&state, multipart).await {
        Ok(job) => job,
        Err(e) => return failure(e),
    };

    match stream_output(job).await {
        Ok(res) => res,
        Err(e) => failure(e),
    }
}

fn failure(e: CompressError) -> Response {
    if e.status_code().is_client_error() {
        warn!("Rejected upload: {}", e);
    } else {
        error!("Compression failed: {}", e);
    }
    e.into_response()
}

/// Opens the finished output and hands it to the response body together with
/// the job's artifacts, which drop once the body is done.
async fn stream_output(job: EncodingJob) -> Result<Response, CompressError> {
    let file = tokio::fs::File::open(&job.output)
        .await
        .map_err(CompressError::Output)?;
    let len = file
        .metadata()
        .await
        .map_err(CompressError::Output)?
        .len();

    info!(job_id = %job.id, bytes = len, output = %job.output_name, "Sending compressed file");

    let disposition = format!("attachment; filename=\"{}\"", job.output_name);
    let body = Body::from_stream(guarded(ReaderStream::new(file), job.artifacts));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime::APPLICATION_OCTET_STREAM.as_ref())
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, len)
        .body(body)
        .map_err(|e| CompressError::Internal(e.to_string()))
}

/// Keeps `artifacts` alive for as long as the body stream is.
fn guarded<S>(
    stream: S,
    artifacts: Artifacts,
) -> impl Stream<Item = std::io::Result<bytes::Bytes>> + Send + 'static
where
    S: Stream<Item = std::io::Result<bytes::Bytes>> + Send + 'static,
{
    stream.map(move |chunk| {
        if let Err(e) = &chunk {
            error!(paths = ?artifacts.paths(), "Error writing response: {}", e);
        }
        chunk
    })
}
