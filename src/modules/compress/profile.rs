use super::animation::AnimationProfile;
use super::still_image::ImageProfile;
use super::video::VideoProfile;
use crate::config::settings::AppConfig;

/// Encoding parameters for every strategy, fixed for the life of the server.
#[derive(Debug, Clone)]
pub struct EncodingProfiles {
    pub image: ImageProfile,
    pub animation: AnimationProfile,
    pub video: VideoProfile,
}

impl EncodingProfiles {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            image: ImageProfile {
                scale_percent: config.image_scale_percent,
                jpeg_quality: config.jpeg_quality,
            },
            animation: AnimationProfile::default(),
            video: VideoProfile::default(),
        }
    }
}
