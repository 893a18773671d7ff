//! Two-pass, bitrate-constrained H.264 re-encode.

use super::model::EncodingJob;
use crate::common::error::CompressError;
use crate::infrastructure::platform::Platform;
use crate::infrastructure::transcoder::Transcoder;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone)]
pub struct VideoProfile {
    /// Linear scale factor; output dimensions are rounded down to even numbers.
    pub scale: f32,
    pub preset: String,
    pub bitrate_kbps: u32,
    pub max_rate_kbps: u32,
    pub buffer_kbps: u32,
    pub audio_bitrate_kbps: u32,
    pub audio_channels: u32,
    pub audio_sample_rate: u32,
}

impl Default for VideoProfile {
    fn default() -> Self {
        Self {
            scale: 0.85,
            preset: "veryslow".to_string(),
            bitrate_kbps: 2000,
            max_rate_kbps: 3000,
            buffer_kbps: 4000,
            audio_bitrate_kbps: 192,
            audio_channels: 2,
            audio_sample_rate: 48000,
        }
    }
}

impl VideoProfile {
    /// Scale and rate-control arguments. Both passes must use exactly these,
    /// otherwise the pass-1 statistics do not match what pass 2 encodes.
    fn encode_args(&self, input: &Path, pass: u8, log_prefix: &Path) -> Vec<String> {
        vec![
            "-y".into(),
            "-i".into(),
            input.to_string_lossy().into_owned(),
            "-vf".into(),
            format!(
                "scale=trunc(iw*{s}/2)*2:trunc(ih*{s}/2)*2:flags=lanczos",
                s = self.scale
            ),
            "-c:v".into(),
            "libx264".into(),
            "-preset".into(),
            self.preset.clone(),
            "-b:v".into(),
            format!("{}k", self.bitrate_kbps),
            "-maxrate".into(),
            format!("{}k", self.max_rate_kbps),
            "-bufsize".into(),
            format!("{}k", self.buffer_kbps),
            "-pass".into(),
            pass.to_string(),
            "-passlogfile".into(),
            log_prefix.to_string_lossy().into_owned(),
        ]
    }

    pub fn analysis_args(&self, input: &Path, log_prefix: &Path, null_device: &str) -> Vec<String> {
        let mut args = self.encode_args(input, 1, log_prefix);
        args.extend([
            "-an".to_string(),
            "-f".to_string(),
            "null".to_string(),
            null_device.to_string(),
        ]);
        args
    }

    pub fn encoding_args(&self, input: &Path, log_prefix: &Path, output: &Path) -> Vec<String> {
        let mut args = self.encode_args(input, 2, log_prefix);
        args.extend([
            "-c:a".to_string(),
            "aac".to_string(),
            "-b:a".to_string(),
            format!("{}k", self.audio_bitrate_kbps),
            "-ac".to_string(),
            self.audio_channels.to_string(),
            "-ar".to_string(),
            self.audio_sample_rate.to_string(),
            output.to_string_lossy().into_owned(),
        ]);
        args
    }
}

/// Runs the analysis pass, then the encoding pass.
///
/// The pass-log files are registered before pass 1 starts, so they are
/// cleaned up whichever pass fails.
pub async fn compress_video(
    job: &mut EncodingJob,
    transcoder: &dyn Transcoder,
    platform: &Platform,
    profile: &VideoProfile,
) -> Result<(), CompressError> {
    let log_prefix = job.scoped_path("2pass");
    for file in platform.pass_log_files(&log_prefix) {
        job.artifacts.register(file);
    }

    info!(job_id = %job.id, "Running analysis pass");
    transcoder
        .run(
            "pass 1",
            &profile.analysis_args(&job.input, &log_prefix, platform.null_device),
        )
        .await?;

    info!(job_id = %job.id, "Running encoding pass");
    transcoder
        .run(
            "pass 2",
            &profile.encoding_args(&job.input, &log_prefix, &job.output),
        )
        .await?;

    Ok(())
}
