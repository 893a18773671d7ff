use super::{TranscodeError, Transcoder};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, error};

pub struct FfmpegTranscoder {
    program: PathBuf,
    timeout: Duration,
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn run(&self, stage: &str, args: &[String]) -> Result<(), TranscodeError> {
        debug!(stage, program = %self.program.display(), ?args, "Running transcoder");

        let child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    TranscodeError::Unavailable(self.program.display().to_string())
                }
                _ => TranscodeError::Spawn {
                    stage: stage.to_string(),
                    source: e,
                },
            })?;

        // Dropping the child on timeout kills it.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(res) => res.map_err(|e| TranscodeError::Spawn {
                stage: stage.to_string(),
                source: e,
            })?,
            Err(_) => {
                error!(stage, timeout = ?self.timeout, "Transcoder timed out");
                return Err(TranscodeError::TimedOut {
                    stage: stage.to_string(),
                    after: self.timeout,
                });
            }
        };

        if !output.status.success() {
            // Captured on separate pipes: all of stdout, then all of stderr.
            // ffmpeg writes its diagnostics to stderr, so they come last.
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            error!(stage, status = %output.status, "Transcoder failed:\n{}", combined);
            return Err(TranscodeError::Failed {
                stage: stage.to_string(),
                status: output.status,
                output: combined,
            });
        }

        Ok(())
    }
}
