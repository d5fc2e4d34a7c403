/// Tesseract OCR analyzer
///
/// Runs `<command> <image> stdout [-l <language>]` and treats standard output
/// as the recognised text.

use super::{Analysis, AnalysisError, AnalysisResult, ImageAnalyzer};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct TesseractAnalyzer {
    command: String,
    language: Option<String>,
}

impl TesseractAnalyzer {
    pub fn new(command: impl Into<String>, language: Option<String>) -> Self {
        TesseractAnalyzer {
            command: command.into(),
            language,
        }
    }

    fn build_command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.arg(path)
            .arg("stdout")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(language) = &self.language {
            cmd.arg("-l").arg(language);
        }

        cmd
    }
}

#[async_trait]
impl ImageAnalyzer for TesseractAnalyzer {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    #[instrument(skip(self), fields(command = %self.command))]
    async fn analyze(&self, path: &Path) -> AnalysisResult<Analysis> {
        // Fail on a missing image before spawning anything
        tokio::fs::metadata(path).await?;

        let output = self.build_command(path).output().await?;

        if !output.status.success() {
            return Err(AnalysisError::CommandFailed {
                command: self.command.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // Tesseract ends its output with a form feed
        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(chars = text.len(), "OCR finished");

        Ok(Analysis::from_text(text))
    }
}
