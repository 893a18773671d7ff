use std::path::{Path, PathBuf};
use tracing::info;

#[cfg(windows)]
const BUNDLED_FFMPEG: &str = r"C:\ffmpeg\ffmpeg.exe";

/// Host-specific bits of the transcoding pipeline, resolved once at startup.
#[derive(Clone, Debug)]
pub struct Platform {
    pub ffmpeg_path: PathBuf,
    pub null_device: &'static str,
}

impl Platform {
    pub fn detect(ffmpeg_override: Option<&str>) -> Self {
        let ffmpeg_path = match ffmpeg_override {
            Some(path) => PathBuf::from(path),
            None => default_ffmpeg_path(),
        };

        info!("🎞️ Using ffmpeg at {}", ffmpeg_path.display());

        Self {
            ffmpeg_path,
            null_device: null_device(),
        }
    }

    /// Files ffmpeg writes for `-passlogfile <prefix>` with libx264.
    pub fn pass_log_files(&self, prefix: &Path) -> Vec<PathBuf> {
        let log = append_to_file_name(prefix, "-0.log");
        let mbtree = append_to_file_name(&log, ".mbtree");
        vec![log, mbtree]
    }
}

fn append_to_file_name(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(windows)]
fn null_device() -> &'static str {
    "NUL"
}

#[cfg(not(windows))]
fn null_device() -> &'static str {
    "/dev/null"
}

#[cfg(windows)]
fn default_ffmpeg_path() -> PathBuf {
    let bundled = Path::new(BUNDLED_FFMPEG);
    if bundled.is_file() {
        return bundled.to_path_buf();
    }
    PathBuf::from("ffmpeg.exe")
}

#[cfg(not(windows))]
fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}
