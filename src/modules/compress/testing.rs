//! Transcoder stand-in shared by the strategy unit tests.

use crate::infrastructure::transcoder::{TranscodeError, Transcoder};
use async_trait::async_trait;
use std::sync::Mutex;

/// Records every stage it is asked to run without touching the filesystem.
#[derive(Default)]
pub(crate) struct Recorder {
    pub calls: Mutex<Vec<(String, Vec<String>)>>,
    pub fail_stage: Option<&'static str>,
}

impl Recorder {
    pub fn failing_at(stage: &'static str) -> Self {
        Self {
            fail_stage: Some(stage),
            ..Default::default()
        }
    }
}

#[async_trait]
impl Transcoder for Recorder {
    async fn run(&self, stage: &str, args: &[String]) -> Result<(), TranscodeError> {
        self.calls
            .lock()
            .unwrap()
            .push((stage.to_string(), args.to_vec()));
        if self.fail_stage == Some(stage) {
            return Err(TranscodeError::Unavailable("ffmpeg".into()));
        }
        Ok(())
    }
}
