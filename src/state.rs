use crate::config::settings::AppConfig;
use crate::infrastructure::platform::Platform;
use crate::infrastructure::transcoder::{FfmpegTranscoder, Transcoder};
use crate::modules::compress::profile::EncodingProfiles;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub platform: Platform,
    pub profiles: Arc<EncodingProfiles>,
    pub transcoder: Arc<dyn Transcoder>,
}

impl AppState {
    pub fn new(config: AppConfig, platform: Platform, transcoder: Arc<dyn Transcoder>) -> Self {
        let profiles = Arc::new(EncodingProfiles::from_config(&config));
        Self {
            config,
            platform,
            profiles,
            transcoder,
        }
    }

    /// State backed by the real ffmpeg binary for this host.
    pub fn from_config(config: AppConfig) -> Self {
        let platform = Platform::detect(config.ffmpeg_path.as_deref());
        let transcoder = Arc::new(FfmpegTranscoder::new(
            platform.ffmpeg_path.clone(),
            config.transcode_timeout(),
        ));
        Self::new(config, platform, transcoder)
    }
}
