use super::artifacts::Artifacts;
use crate::common::error::CompressError;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const STILL_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp", "tif", "tiff"];
const ANIMATED_IMAGE_EXTENSIONS: &[&str] = &["gif"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "webm", "mkv"];

/// Which encoding strategy a file goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    StillImage,
    AnimatedImage,
    Video,
}

impl MediaKind {
    /// Classifies a filename by its extension, case-insensitively.
    ///
    /// Still images the decoder can read but the encoder cannot write are
    /// accepted here and rejected later by the image strategy.
    pub fn from_file_name(name: &str) -> Result<Self, CompressError> {
        let ext = extension(name).ok_or_else(|| {
            CompressError::UnsupportedFormat(format!("{name} has no file extension"))
        })?;

        if STILL_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Ok(MediaKind::StillImage)
        } else if ANIMATED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Ok(MediaKind::AnimatedImage)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Ok(MediaKind::Video)
        } else {
            Err(CompressError::UnsupportedFormat(format!(".{ext}")))
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::StillImage => "still_image",
            MediaKind::AnimatedImage => "animated_image",
            MediaKind::Video => "video",
        }
    }

    pub fn uses_transcoder(self) -> bool {
        !matches!(self, MediaKind::StillImage)
    }
}

fn extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_ascii_lowercase())
}

/// Name of the file handed back to the client.
///
/// WebM cannot carry H.264/AAC, so re-encoded WebM comes back as MP4.
fn output_file_name(name: &str, kind: MediaKind) -> String {
    let renamed = match (kind, extension(name).as_deref()) {
        (MediaKind::Video, Some("webm")) => Path::new(name)
            .with_extension("mp4")
            .to_string_lossy()
            .into_owned(),
        _ => name.to_string(),
    };
    format!("compressed_{renamed}")
}

/// On-disk name for a job file: the job id, its role and the lowercased
/// extension. The client's filename never reaches the filesystem.
fn disk_name(id: Uuid, role: &str, name: &str) -> String {
    match extension(name) {
        Some(ext) => format!("{}_{role}.{ext}", id.simple()),
        None => format!("{}_{role}", id.simple()),
    }
}

/// One request's trip through the pipeline.
///
/// Every path lives under the work directory and is named from the job id,
/// so concurrent uploads of the same filename never share a file.
#[derive(Debug)]
pub struct EncodingJob {
    pub id: Uuid,
    pub kind: MediaKind,
    pub original_name: String,
    pub output_name: String,
    pub input: PathBuf,
    pub output: PathBuf,
    pub artifacts: Artifacts,
    work_dir: PathBuf,
}

impl EncodingJob {
    pub fn new(work_dir: &Path, file_name: &str, kind: MediaKind) -> Self {
        let id = Uuid::new_v4();
        let output_name = output_file_name(file_name, kind);
        let mut artifacts = Artifacts::new(id);

        let input = artifacts.register(work_dir.join(disk_name(id, "upload", file_name)));
        let output = artifacts.register(work_dir.join(disk_name(id, "output", &output_name)));

        Self {
            id,
            kind,
            original_name: file_name.to_string(),
            output_name,
            input,
            output,
            artifacts,
            work_dir: work_dir.to_path_buf(),
        }
    }

    /// Path for a job-scoped intermediate, registered for cleanup.
    pub fn intermediate(&mut self, suffix: &str) -> PathBuf {
        let path = self.scoped_path(suffix);
        self.artifacts.register(path)
    }

    /// Job-scoped path that is not itself a file, e.g. a pass-log prefix.
    pub fn scoped_path(&self, suffix: &str) -> PathBuf {
        self.work_dir.join(format!("{}_{}", self.id.simple(), suffix))
    }
}
