//! # Financial Report Builder
//!
//! A library for turning three uploaded financial workbooks (profit & loss,
//! balance sheet, cash flow) into a benchmarked, multi-page HTML report with
//! rendered charts, optionally exported to PDF via an external conversion
//! service.
//!
//! ## Core Concepts
//!
//! - **Extraction**: each workbook is routed by role keywords to a
//!   type-specific extractor that populates a normalized [`ExtractedDataset`]
//! - **Metrics**: latest/previous month snapshots and year-to-date totals are
//!   derived once the dataset is fully populated
//! - **Classification**: every tracked category is graded against a fixed
//!   benchmark table (Positive / Neutral / Caution / Warning)
//! - **Assembly**: the dataset, classifications and chart links are rendered
//!   into one self-contained HTML document
//!
//! ## Example
//!
//! ```rust,ignore
//! use financial_report_builder::{ReportConfig, ReportPipeline};
//! use std::collections::BTreeMap;
//! use std::path::PathBuf;
//!
//! let pipeline = ReportPipeline::new(ReportConfig::from_env());
//!
//! let mut sources = BTreeMap::new();
//! sources.insert("profit_loss".to_string(), PathBuf::from("profit_loss.xlsx"));
//! sources.insert("balance_sheet".to_string(), PathBuf::from("balance_sheet.xlsx"));
//! sources.insert("cashflow".to_string(), PathBuf::from("cashflow.xlsx"));
//!
//! let output = pipeline.generate_with_pdf(&sources).await?;
//! println!("PDF: {:?}", output.pdf_url);
//! ```

pub mod charts;
pub mod config;
pub mod error;
pub mod extract;
pub mod numeric;
pub mod pdf;
pub mod report;
pub mod schema;
pub mod status;
pub mod utils;

#[cfg(feature = "gemini")]
pub mod llm;

pub use charts::{build_chart_specs, ChartClient, ChartKind, ChartSpec};
pub use config::{Benchmarks, ReportConfig};
pub use error::{ReportError, Result};
pub use extract::{derive_metrics, Extractor};
pub use numeric::{normalize_cell, normalize_str};
pub use pdf::PdfClient;
pub use report::assemble_report;
pub use schema::*;
pub use status::{classify, Direction, Status};
pub use utils::*;

use log::info;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Everything one report request produces. The HTML is always present;
/// `pdf_url` is filled only by [`ReportPipeline::generate_with_pdf`]; chart
/// links may be empty strings when a render failed or no data was available.
#[derive(Debug, Clone)]
pub struct ReportOutput {
    pub html: String,
    pub pdf_url: Option<String>,
    pub chart_urls: Vec<String>,
}

/// The report generation pipeline: extraction, chart rendering, HTML assembly
/// and PDF export, driven by one explicit [`ReportConfig`].
///
/// Each call builds and discards its own [`ExtractedDataset`]; nothing is
/// shared between requests beyond the read-only configuration.
pub struct ReportPipeline {
    config: ReportConfig,
    chart_client: ChartClient,
}

impl ReportPipeline {
    pub fn new(config: ReportConfig) -> Self {
        let chart_client = ChartClient::new(&config);
        Self {
            config,
            chart_client,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Runs extraction, chart rendering and HTML assembly.
    ///
    /// Recoverable problems (missing workbooks, failed chart renders) degrade
    /// the output; extracting zero periods is fatal and surfaces as
    /// [`ReportError::NoMetrics`].
    pub async fn generate(&self, sources: &BTreeMap<String, PathBuf>) -> Result<ReportOutput> {
        info!("Starting financial report generation...");

        let data = Extractor::new().extract(sources);

        let chart_urls = self.chart_client.render_all(build_chart_specs(&data)).await;

        let narrative = self.narrative(&data).await;
        let html = assemble_report(
            &data,
            &self.config.benchmarks,
            &chart_urls,
            narrative.as_deref(),
        )?;

        info!("Financial report generated for {}", data.company_name);
        Ok(ReportOutput {
            html,
            pdf_url: None,
            chart_urls,
        })
    }

    /// Like [`generate`](Self::generate), then converts the document to PDF.
    /// A PDF-service failure propagates; callers that need the HTML despite a
    /// failed export should call [`generate`](Self::generate) and
    /// [`export_pdf`](Self::export_pdf) separately.
    pub async fn generate_with_pdf(
        &self,
        sources: &BTreeMap<String, PathBuf>,
    ) -> Result<ReportOutput> {
        let mut output = self.generate(sources).await?;
        output.pdf_url = Some(self.export_pdf(&output.html).await?);
        Ok(output)
    }

    /// Converts an assembled document to PDF and returns the download link.
    pub async fn export_pdf(&self, html: &str) -> Result<String> {
        PdfClient::new(&self.config)?.convert(html).await
    }

    #[cfg(feature = "gemini")]
    async fn narrative(&self, data: &ExtractedDataset) -> Option<String> {
        let client = crate::llm::GeminiClient::from_config(&self.config)?;
        client.narrate_insights(data).await
    }

    #[cfg(not(feature = "gemini"))]
    async fn narrative(&self, _data: &ExtractedDataset) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_all_sources_missing_is_a_no_metrics_failure() {
        let pipeline = ReportPipeline::new(ReportConfig::default());
        let sources: BTreeMap<String, PathBuf> = [
            ("profit_loss", "/nonexistent/pl.xlsx"),
            ("balance_sheet", "/nonexistent/bs.xlsx"),
            ("cashflow", "/nonexistent/cf.xlsx"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), PathBuf::from(v)))
        .collect();

        let result = pipeline.generate(&sources).await;
        assert!(matches!(result, Err(ReportError::NoMetrics(_))));
    }
}
