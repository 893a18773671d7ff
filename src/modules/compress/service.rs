use super::animation::compress_animation;
use super::still_image::compress_image;
use super::model::{EncodingJob, MediaKind};
use super::video::compress_video;
use crate::common::error::CompressError;
use crate::common::upload::{sanitize_file_name, stream_to_file};
use crate::state::AppState;
use axum::extract::Multipart;
use tracing::{info, warn};

/// Form fields that may carry the upload. `image` is the name the HTML form uses.
pub const FILE_FIELDS: &[&str] = &["image", "file"];

pub struct CompressService;

impl CompressService {
    /// Saves the uploaded file and runs it through the matching strategy.
    ///
    /// On success the returned job owns the finished output and every other
    /// artifact; dropping it removes them. On failure they are already gone,
    /// unless the debug-failure mode kept them.
    pub async fn compress_upload(
        state: &AppState,
        mut multipart: Multipart,
    ) -> Result<EncodingJob, CompressError> {
        let field = loop {
            match multipart
                .next_field()
                .await
                .map_err(|e| CompressError::InputRetrieval(e.body_text()))?
            {
                Some(field) if FILE_FIELDS.contains(&field.name().unwrap_or("")) => break field,
                Some(_) => continue,
                None => {
                    return Err(CompressError::InputRetrieval(
                        "no file field found in multipart request".to_string(),
                    ));
                }
            }
        };

        let declared = field
            .file_name()
            .ok_or_else(|| CompressError::InputRetrieval("upload has no filename".to_string()))?;
        let name = sanitize_file_name(declared)
            .ok_or_else(|| CompressError::InputRetrieval(format!("invalid filename: {declared}")))?;
        let kind = MediaKind::from_file_name(&name)?;

        let mut job = EncodingJob::new(&state.config.work_dir, &name, kind);
        info!(job_id = %job.id, kind = kind.as_str(), file = %name, "Starting compression job");

        let size = stream_to_file(field, &job.input).await?;
        if size == 0 {
            return Err(CompressError::InputRetrieval("uploaded file is empty".to_string()));
        }

        if let Err(e) = Self::encode(state, &mut job).await {
            if state.config.keep_failed_artifacts
                && job.kind.uses_transcoder()
                && matches!(e, CompressError::Transcode(_))
            {
                job.artifacts.preserve();
            }
            if job.artifacts.is_preserved() {
                warn!(job_id = %job.id, file = %job.original_name, "Failed job kept for inspection");
            }
            return Err(e);
        }

        Ok(job)
    }

    async fn encode(state: &AppState, job: &mut EncodingJob) -> Result<(), CompressError> {
        match job.kind {
            MediaKind::StillImage => {
                let input = job.input.clone();
                let output = job.output.clone();
                let profile = state.profiles.image;
                let format = tokio::task::spawn_blocking(move || {
                    compress_image(&input, &output, profile)
                })
                .await
                .map_err(|e| CompressError::Internal(e.to_string()))??;
                info!(job_id = %job.id, ?format, "Image compressed");
            }
            MediaKind::AnimatedImage => {
                compress_animation(job, state.transcoder.as_ref(), &state.profiles.animation)
                    .await?;
                info!(job_id = %job.id, "Animation compressed");
            }
            MediaKind::Video => {
                compress_video(
                    job,
                    state.transcoder.as_ref(),
                    &state.platform,
                    &state.profiles.video,
                )
                .await?;
                info!(job_id = %job.id, "Video compressed");
            }
        }

        if !job.output.is_file() {
            warn!(job_id = %job.id, "Strategy finished without producing output");
            return Err(CompressError::Output(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "encoder produced no output",
            )));
        }

        Ok(())
    }
}
