use crate::config::env::{self, EnvKey};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 << 20;
pub const DEFAULT_TRANSCODE_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_IMAGE_SCALE_PERCENT: u32 = 75;
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be between {min} and {max}, got {value}")]
    OutOfRange {
        key: &'static str,
        min: u64,
        max: u64,
        value: u64,
    },
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub work_dir: PathBuf,
    pub ffmpeg_path: Option<String>,
    pub max_upload_bytes: usize,
    pub transcode_timeout_secs: u64,
    /// Leave a failed transcode's files on disk for inspection.
    pub keep_failed_artifacts: bool,
    pub image_scale_percent: u32,
    pub jpeg_quality: u8,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Self {
            server_port: env::get_parsed(EnvKey::ServerPort, DEFAULT_PORT),
            work_dir: env::get_opt(EnvKey::WorkDir)
                .map(PathBuf::from)
                .unwrap_or_else(default_work_dir),
            ffmpeg_path: env::get_opt(EnvKey::FfmpegPath),
            max_upload_bytes: env::get_parsed(EnvKey::MaxUploadBytes, DEFAULT_MAX_UPLOAD_BYTES),
            transcode_timeout_secs: env::get_parsed(
                EnvKey::TranscodeTimeoutSecs,
                DEFAULT_TRANSCODE_TIMEOUT_SECS,
            ),
            keep_failed_artifacts: env::get_flag(EnvKey::KeepFailedArtifacts, false),
            image_scale_percent: env::get_parsed(
                EnvKey::ImageScalePercent,
                DEFAULT_IMAGE_SCALE_PERCENT,
            ),
            jpeg_quality: env::get_parsed(EnvKey::JpegQuality, DEFAULT_JPEG_QUALITY),
        };
        config.validate()?;
        Ok(config)
    }

    /// Defaults with artifacts rooted at `work_dir`. Used by tests and embedders.
    pub fn with_work_dir(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            server_port: DEFAULT_PORT,
            work_dir: work_dir.into(),
            ffmpeg_path: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            transcode_timeout_secs: DEFAULT_TRANSCODE_TIMEOUT_SECS,
            keep_failed_artifacts: false,
            image_scale_percent: DEFAULT_IMAGE_SCALE_PERCENT,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(
            EnvKey::ImageScalePercent,
            self.image_scale_percent as u64,
            1,
            100,
        )?;
        check_range(EnvKey::JpegQuality, self.jpeg_quality as u64, 1, 100)?;
        check_range(
            EnvKey::TranscodeTimeoutSecs,
            self.transcode_timeout_secs,
            1,
            u64::MAX,
        )
    }

    pub fn transcode_timeout(&self) -> Duration {
        Duration::from_secs(self.transcode_timeout_secs)
    }
}

fn default_work_dir() -> PathBuf {
    std::env::temp_dir().join("media-shrink")
}

fn check_range(key: EnvKey, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            key: key.as_str(),
            min,
            max,
            value,
        });
    }
    Ok(())
}
