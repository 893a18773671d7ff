//! Test helpers: build AppState and router with a fake transcoder.
//!
//! Run with: `cargo test --test compress_test`

#![allow(dead_code)]

pub mod fixtures;

use async_trait::async_trait;
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use media_shrink::app::create_app;
use media_shrink::config::settings::AppConfig;
use media_shrink::infrastructure::platform::Platform;
use media_shrink::infrastructure::transcoder::{TranscodeError, Transcoder};
use media_shrink::state::AppState;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Stands in for ffmpeg: writes the files each stage would write.
///
/// Palette application and pass 2 copy the input to the output, so a
/// response body can be traced back to the upload it came from.
#[derive(Default)]
pub struct FakeTranscoder {
    pub calls: Mutex<Vec<(String, Vec<String>)>>,
    pub fail_stage: Option<&'static str>,
    pub delay: Option<Duration>,
}

impl FakeTranscoder {
    pub fn failing_at(stage: &'static str) -> Self {
        Self {
            fail_stage: Some(stage),
            ..Default::default()
        }
    }

    pub fn stages(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(stage, _)| stage.clone())
            .collect()
    }
}

fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    let idx = args.iter().position(|a| a == flag)?;
    args.get(idx + 1).map(String::as_str)
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn run(&self, stage: &str, args: &[String]) -> Result<(), TranscodeError> {
        self.calls
            .lock()
            .unwrap()
            .push((stage.to_string(), args.to_vec()));

        let input = value_after(args, "-i").map(PathBuf::from);
        let last = args.last().map(PathBuf::from);

        match stage {
            "pass 1" => {
                let prefix = value_after(args, "-passlogfile").expect("pass log prefix");
                std::fs::write(format!("{prefix}-0.log"), b"stats").unwrap();
                std::fs::write(format!("{prefix}-0.log.mbtree"), b"mbtree").unwrap();
            }
            "palette generation" => {
                std::fs::write(last.unwrap(), b"palette").unwrap();
            }
            _ => {
                let data = std::fs::read(input.unwrap()).unwrap();
                if let Some(delay) = self.delay {
                    tokio::time::sleep(delay).await;
                }
                std::fs::write(last.unwrap(), data).unwrap();
            }
        }

        if self.fail_stage == Some(stage) {
            return Err(TranscodeError::TimedOut {
                stage: stage.to_string(),
                after: Duration::from_secs(1),
            });
        }
        Ok(())
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub transcoder: Arc<FakeTranscoder>,
    pub work_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Files currently in the work directory.
    pub fn residue(&self) -> Vec<PathBuf> {
        list_files(self.work_dir.path())
    }
}

pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    files.sort();
    files
}

pub fn setup_test_app(transcoder: FakeTranscoder) -> TestApp {
    setup_test_app_with(transcoder, |_| {})
}

pub fn setup_test_app_with(
    transcoder: FakeTranscoder,
    configure: impl FnOnce(&mut AppConfig),
) -> TestApp {
    let work_dir = TempDir::new().expect("Failed to create work dir");
    let mut config = AppConfig::with_work_dir(work_dir.path());
    configure(&mut config);

    let transcoder = Arc::new(transcoder);
    let state = AppState::new(config, Platform::detect(None), transcoder.clone());
    let server = TestServer::new(create_app(state)).expect("Failed to create test server");

    TestApp {
        server,
        transcoder,
        work_dir,
    }
}

pub fn upload_form(file_name: &str, data: Vec<u8>) -> MultipartForm {
    let part = Part::bytes(data)
        .file_name(file_name)
        .mime_type("application/octet-stream");
    MultipartForm::new().add_part("image", part)
}
