use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ReportError, Result};

pub const QUICKCHART_URL: &str = "https://quickchart.io/chart/create";
pub const PDFCO_URL: &str = "https://api.pdf.co/v1/pdf/convert/from/html";

/// Industry benchmark targets used for status classification.
///
/// Read-only after construction; the defaults mirror the targets the report
/// was calibrated against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Benchmarks {
    pub income_target: f64,
    pub cogs_target: f64,
    pub marketing_target: f64,
    pub team_target: f64,
    pub overhead_target: f64,
    pub profit_target: f64,
    pub cash_target: f64,
    pub growth_rate: f64,
}

impl Default for Benchmarks {
    fn default() -> Self {
        Self {
            income_target: 209_475.0,
            cogs_target: 20.0,
            marketing_target: 16.0,
            team_target: 25.0,
            overhead_target: 18.0,
            profit_target: 21.0,
            cash_target: 265_634.0,
            growth_rate: 0.20,
        }
    }
}

/// Explicit pipeline configuration passed into [`crate::ReportPipeline::new`].
///
/// Credentials and endpoints live here rather than in process-global state so
/// callers (and tests) can inject their own.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// API key for the HTML-to-PDF conversion service.
    pub pdfco_api_key: Option<String>,
    /// API key for the generative-text service. Only consumed when the
    /// `gemini` feature is enabled; carried as scaffolding otherwise.
    pub gemini_api_key: Option<String>,
    pub quickchart_url: String,
    pub pdfco_url: String,
    pub chart_timeout: Duration,
    pub pdf_timeout: Duration,
    pub benchmarks: Benchmarks,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            pdfco_api_key: None,
            gemini_api_key: None,
            quickchart_url: QUICKCHART_URL.to_string(),
            pdfco_url: PDFCO_URL.to_string(),
            chart_timeout: Duration::from_secs(30),
            pdf_timeout: Duration::from_secs(60),
            benchmarks: Benchmarks::default(),
        }
    }
}

impl ReportConfig {
    /// Builds a configuration from `PDFCO_API_KEY` / `GEMINI_API_KEY`
    /// environment variables, leaving everything else at defaults.
    pub fn from_env() -> Self {
        Self {
            pdfco_api_key: std::env::var("PDFCO_API_KEY").ok(),
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok(),
            ..Self::default()
        }
    }

    pub fn with_benchmarks(mut self, benchmarks: Benchmarks) -> Self {
        self.benchmarks = benchmarks;
        self
    }

    pub(crate) fn require_pdf_key(&self) -> Result<&str> {
        self.pdfco_api_key
            .as_deref()
            .ok_or_else(|| ReportError::MissingConfig("PDFCO_API_KEY is not set".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_benchmarks_match_calibration() {
        let b = Benchmarks::default();
        assert_eq!(b.income_target, 209_475.0);
        assert_eq!(b.cogs_target, 20.0);
        assert_eq!(b.marketing_target, 16.0);
        assert_eq!(b.team_target, 25.0);
        assert_eq!(b.overhead_target, 18.0);
        assert_eq!(b.profit_target, 21.0);
        assert_eq!(b.cash_target, 265_634.0);
    }

    #[test]
    fn missing_pdf_key_is_a_config_error() {
        let config = ReportConfig::default();
        assert!(config.require_pdf_key().is_err());

        let config = ReportConfig {
            pdfco_api_key: Some("key".to_string()),
            ..ReportConfig::default()
        };
        assert_eq!(config.require_pdf_key().unwrap(), "key");
    }
}
