/// Image analyzers
///
/// An analyzer turns an image on disk into its recognised text plus a tag
/// string. The tag string is every distinct whitespace-separated token of the
/// text, joined with `", "`.
///
/// # Analyzers
///
/// - **Tesseract**: runs the `tesseract` OCR binary
/// - **Mock**: returns canned text, for tests and machines without OCR
///
/// # Example
///
/// ```no_run
/// use memoria_worker::analyzer::{ImageAnalyzer, MockAnalyzer};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let analyzer = MockAnalyzer::new("cat cat dog");
/// let analysis = analyzer.analyze(Path::new("photo.png")).await?;
/// assert_eq!(analysis.tags, "cat, dog");
/// # Ok(())
/// # }
/// ```

pub mod mock;
pub mod tesseract;

pub use mock::MockAnalyzer;
pub use tesseract::TesseractAnalyzer;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// Analysis and job errors
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The image or the analyzer binary could not be read or started
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The OCR command ran but exited unsuccessfully
    #[error("{command} exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// The task's file row no longer exists
    #[error("File {0} not found")]
    FileMissing(i64),

    /// The analyzer was told to fail (mock only)
    #[error("Analyzer failure: {0}")]
    Rejected(String),

    /// Persisting the result failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Output of one analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    /// Recognised text
    pub text: String,

    /// Distinct tokens of `text`, comma-joined
    pub tags: String,
}

impl Analysis {
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let tags = extract_tags(&text);
        Analysis { text, tags }
    }
}

/// Distinct whitespace-separated tokens of `text`, joined by `", "`
///
/// Tokens come out in sorted order so the same text always yields the same
/// string. Consumers should still treat the result as a set.
pub fn extract_tags(text: &str) -> String {
    text.split_whitespace()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>()
        .join(", ")
}

/// Contract for image analyzers
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    /// Short identifier for logs
    fn name(&self) -> &'static str;

    /// Analyzes the image at `path`
    async fn analyze(&self, path: &Path) -> AnalysisResult<Analysis>;
}

/// Which analyzer implementation to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerKind {
    Tesseract,
    Mock,
}

impl FromStr for AnalyzerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tesseract" => Ok(AnalyzerKind::Tesseract),
            "mock" => Ok(AnalyzerKind::Mock),
            other => Err(format!("unknown analyzer '{other}' (expected 'tesseract' or 'mock')")),
        }
    }
}

impl fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyzerKind::Tesseract => f.write_str("tesseract"),
            AnalyzerKind::Mock => f.write_str("mock"),
        }
    }
}

/// Analyzer settings
///
/// # Environment Variables
///
/// - `ANALYZER`: `tesseract` (default) or `mock`
/// - `TESSERACT_CMD`: OCR binary (default: `tesseract`)
/// - `TESSERACT_LANG`: language passed as `-l` (default: unset)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub kind: AnalyzerKind,
    pub command: String,
    pub language: Option<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            kind: AnalyzerKind::Tesseract,
            command: "tesseract".to_string(),
            language: None,
        }
    }
}

impl AnalyzerConfig {
    /// Reads settings through `lookup`, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AnalyzerConfig::default();

        let kind = match lookup("ANALYZER") {
            Some(value) => value.parse::<AnalyzerKind>().map_err(anyhow::Error::msg)?,
            None => defaults.kind,
        };

        Ok(AnalyzerConfig {
            kind,
            command: lookup("TESSERACT_CMD").unwrap_or(defaults.command),
            language: lookup("TESSERACT_LANG").filter(|lang| !lang.trim().is_empty()),
        })
    }

    /// Builds the configured analyzer
    pub fn build(&self) -> Arc<dyn ImageAnalyzer> {
        match self.kind {
            AnalyzerKind::Tesseract => Arc::new(TesseractAnalyzer::new(
                self.command.clone(),
                self.language.clone(),
            )),
            AnalyzerKind::Mock => Arc::new(MockAnalyzer::default()),
        }
    }
}
