use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    WorkDir,
    FfmpegPath,
    MaxUploadBytes,
    TranscodeTimeoutSecs,
    KeepFailedArtifacts,
    ImageScalePercent,
    JpegQuality,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "PORT",
            EnvKey::WorkDir => "WORK_DIR",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::MaxUploadBytes => "MAX_UPLOAD_BYTES",
            EnvKey::TranscodeTimeoutSecs => "TRANSCODE_TIMEOUT_SECS",
            EnvKey::KeepFailedArtifacts => "KEEP_FAILED_ARTIFACTS",
            EnvKey::ImageScalePercent => "IMAGE_SCALE_PERCENT",
            EnvKey::JpegQuality => "JPEG_QUALITY",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_opt(key: EnvKey) -> Option<String> {
    get(key).ok().filter(|v| !v.trim().is_empty())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

pub fn get_flag(key: EnvKey, default: bool) -> bool {
    match get(key) {
        Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
