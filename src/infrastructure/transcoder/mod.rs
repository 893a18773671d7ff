use async_trait::async_trait;
use std::process::ExitStatus;
use std::time::Duration;

pub mod ffmpeg;

pub use ffmpeg::FfmpegTranscoder;

/// How much captured output goes into the error's `Display`.
const OUTPUT_TAIL: usize = 2000;

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("transcoder binary not found: {0}")]
    Unavailable(String),

    #[error("failed to start transcoder for {stage}: {source}")]
    Spawn {
        stage: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} exited with {status}\nOutput: {}", tail(.output))]
    Failed {
        stage: String,
        status: ExitStatus,
        output: String,
    },

    #[error("{stage} timed out after {after:?}")]
    TimedOut { stage: String, after: Duration },
}

fn tail(output: &str) -> &str {
    if output.len() <= OUTPUT_TAIL {
        return output;
    }
    let mut start = output.len() - OUTPUT_TAIL;
    while !output.is_char_boundary(start) {
        start += 1;
    }
    &output[start..]
}

/// Runs one stage of an external encode. One call spawns one process.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn run(&self, stage: &str, args: &[String]) -> Result<(), TranscodeError>;
}
