//! HTML-to-PDF conversion via the external conversion service.

use log::info;
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::ReportConfig;
use crate::error::{ReportError, Result};

#[derive(Clone)]
pub struct PdfClient {
    client: Client,
    url: String,
    api_key: String,
}

impl PdfClient {
    pub fn new(config: &ReportConfig) -> Result<Self> {
        let api_key = config.require_pdf_key()?.to_string();
        let client = Client::builder()
            .timeout(config.pdf_timeout)
            .build()
            .unwrap_or_default();
        Ok(Self {
            client,
            url: config.pdfco_url.clone(),
            api_key,
        })
    }

    /// Submits the assembled document and returns the download link. A
    /// non-success status or an explicit error field in the response is fatal
    /// for this step; no retries.
    pub async fn convert(&self, html: &str) -> Result<String> {
        info!("Converting HTML to PDF...");

        let payload = json!({
            "html": html,
            "name": "financial_report.pdf",
            "margins": "10mm",
            "paperSize": "A4",
            "orientation": "portrait",
            "printBackground": true,
            "displayHeaderFooter": false
        });

        let res = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ReportError::PdfConversion(format!(
                "conversion failed (status {}): {}",
                status, body
            )));
        }

        let body: Value = res.json().await?;
        if body.get("error").and_then(Value::as_bool).unwrap_or(false) {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(ReportError::PdfConversion(message.to_string()));
        }

        let pdf_url = body
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| ReportError::PdfConversion("response missing url".to_string()))?;

        info!("PDF generated successfully: {}", pdf_url);
        Ok(pdf_url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_api_key() {
        assert!(PdfClient::new(&ReportConfig::default()).is_err());

        let config = ReportConfig {
            pdfco_api_key: Some("key".to_string()),
            ..ReportConfig::default()
        };
        assert!(PdfClient::new(&config).is_ok());
    }
}
