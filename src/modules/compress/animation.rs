//! Palette-quantized re-encode for animated GIFs.

use super::model::EncodingJob;
use crate::common::error::CompressError;
use crate::infrastructure::transcoder::Transcoder;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy)]
pub struct AnimationProfile {
    pub fps: u32,
    /// Linear scale factor applied to both dimensions.
    pub scale: f32,
    pub max_colors: u32,
}

impl Default for AnimationProfile {
    fn default() -> Self {
        Self {
            fps: 15,
            scale: 0.6,
            max_colors: 128,
        }
    }
}

impl AnimationProfile {
    /// Frame sampling and scaling shared by both stages.
    pub fn frame_filter(&self) -> String {
        format!(
            "fps={},scale=iw*{}:ih*{}:flags=bilinear",
            self.fps, self.scale, self.scale
        )
    }

    pub fn palette_args(&self, input: &Path, palette: &Path) -> Vec<String> {
        vec![
            "-y".into(),
            "-i".into(),
            input.to_string_lossy().into_owned(),
            "-vf".into(),
            format!(
                "{},palettegen=max_colors={}:stats_mode=full",
                self.frame_filter(),
                self.max_colors
            ),
            "-update".into(),
            "1".into(),
            palette.to_string_lossy().into_owned(),
        ]
    }

    pub fn apply_args(&self, input: &Path, palette: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".into(),
            "-i".into(),
            input.to_string_lossy().into_owned(),
            "-i".into(),
            palette.to_string_lossy().into_owned(),
            "-lavfi".into(),
            format!("{}[x];[x][1:v]paletteuse=dither=none", self.frame_filter()),
            output.to_string_lossy().into_owned(),
        ]
    }
}

/// Generates a palette, then maps the animation onto it.
pub async fn compress_animation(
    job: &mut EncodingJob,
    transcoder: &dyn Transcoder,
    profile: &AnimationProfile,
) -> Result<(), CompressError> {
    let palette = job.intermediate("palette.png");

    info!(job_id = %job.id, "Generating palette");
    transcoder
        .run("palette generation", &profile.palette_args(&job.input, &palette))
        .await?;

    info!(job_id = %job.id, "Applying palette");
    transcoder
        .run(
            "palette application",
            &profile.apply_args(&job.input, &palette, &job.output),
        )
        .await?;

    Ok(())
}
