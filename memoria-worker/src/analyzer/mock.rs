/// Mock analyzer for tests and OCR-less setups
///
/// Returns the configured text for every image without touching the file,
/// or fails every call when built with [`MockAnalyzer::failing`].

use super::{Analysis, AnalysisError, AnalysisResult, ImageAnalyzer};
use async_trait::async_trait;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct MockAnalyzer {
    text: String,
    failure: Option<String>,
}

impl MockAnalyzer {
    pub fn new(text: impl Into<String>) -> Self {
        MockAnalyzer {
            text: text.into(),
            failure: None,
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        MockAnalyzer {
            text: String::new(),
            failure: Some(reason.into()),
        }
    }
}

#[async_trait]
impl ImageAnalyzer for MockAnalyzer {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn analyze(&self, _path: &Path) -> AnalysisResult<Analysis> {
        match &self.failure {
            Some(reason) => Err(AnalysisError::Rejected(reason.clone())),
            None => Ok(Analysis::from_text(self.text.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_configured_text() {
        let analyzer = MockAnalyzer::new("buy milk buy eggs");
        let analysis = analyzer.analyze(Path::new("ignored.png")).await.unwrap();

        assert_eq!(analysis.text, "buy milk buy eggs");
        assert_eq!(analysis.tags, "buy, eggs, milk");
    }

    #[tokio::test]
    async fn test_default_is_empty() {
        let analysis = MockAnalyzer::default()
            .analyze(Path::new("x.png"))
            .await
            .unwrap();
        assert_eq!(analysis, Analysis::from_text(""));
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let err = MockAnalyzer::failing("boom")
            .analyze(Path::new("x.png"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Analyzer failure: boom");
    }
}
