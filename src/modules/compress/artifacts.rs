//! Per-job temporary files and their guaranteed removal.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Every file a job may create, removed from disk when the guard drops.
///
/// Paths are registered before the file is created so that a stage failing
/// halfway still has its output cleaned up. `preserve` turns removal off for
/// the debug-failure mode.
#[derive(Debug)]
pub struct Artifacts {
    job_id: Uuid,
    paths: Vec<PathBuf>,
    preserved: bool,
}

impl Artifacts {
    pub fn new(job_id: Uuid) -> Self {
        Self {
            job_id,
            paths: Vec::new(),
            preserved: false,
        }
    }

    pub fn register(&mut self, path: impl Into<PathBuf>) -> PathBuf {
        let path = path.into();
        if !self.paths.contains(&path) {
            self.paths.push(path.clone());
        }
        path
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn preserve(&mut self) {
        self.preserved = true;
    }

    pub fn is_preserved(&self) -> bool {
        self.preserved
    }
}

impl Drop for Artifacts {
    fn drop(&mut self) {
        if self.preserved {
            warn!(
                job_id = %self.job_id,
                paths = ?self.paths,
                "Keeping artifacts of failed job for debugging"
            );
            return;
        }

        // Blocking unlinks on whatever thread drops the guard, often a runtime
        // worker. A job has at most four files.
        for path in &self.paths {
            remove(path);
        }
        debug!(job_id = %self.job_id, count = self.paths.len(), "Artifacts cleaned up");
    }
}

fn remove(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        // Registered but never written.
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove artifact"),
    }
}
