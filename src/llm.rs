//! Optional Gemini-backed insight narration.
//!
//! The rule-based insight grid is the default; when this feature is enabled
//! and a key is configured, the pipeline asks the model for a short narrative
//! built from a metrics summary and falls back to the rules on any failure.

use log::warn;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::schema::ExtractedDataset;
use crate::utils::{fmt_money, fmt_pct};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    pub fn from_config(config: &ReportConfig) -> Option<Self> {
        config.gemini_api_key.clone().map(Self::new)
    }

    /// Asks the model for a two-sentence performance narrative. Returns `None`
    /// (after logging) on any failure so callers fall back to rule-based text.
    pub async fn narrate_insights(&self, data: &ExtractedDataset) -> Option<String> {
        match self.generate(&insight_prompt(data)?).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Insight narration failed, using rule-based insights: {}", e);
                None
            }
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, GEMINI_MODEL, self.api_key
        );

        let payload = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let res = self.client.post(&url).json(&payload).send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ReportError::InsightGeneration(format!(
                "Gemini API error (status {}): {}",
                status, body
            )));
        }

        let body: GenerateContentResponse = res.json().await?;
        body.candidates
            .and_then(|mut c| c.pop())
            .and_then(|c| c.content.parts.first().cloned())
            .map(|p| p.text)
            .ok_or_else(|| ReportError::InsightGeneration("no candidates returned".to_string()))
    }
}

fn insight_prompt(data: &ExtractedDataset) -> Option<String> {
    let metrics = data.latest_metrics.as_ref()?;
    Some(format!(
        "Write a concise two-sentence financial performance insight for {} in {}. \
         Revenue: {}, expenses: {}, net profit: {} (margin {}), cash position: {}. \
         Plain prose, no markdown.",
        data.company_name,
        data.latest_month,
        fmt_money(metrics.revenue),
        fmt_money(metrics.expenses),
        fmt_money(metrics.profit),
        fmt_pct(metrics.profit_margin()),
        fmt_money(metrics.cash_position),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::derive_metrics;
    use crate::schema::MonthlyRecord;

    #[test]
    fn test_prompt_requires_metrics() {
        let data = ExtractedDataset::new("x".to_string());
        assert!(insight_prompt(&data).is_none());

        let mut data = ExtractedDataset::new("January 2025".to_string());
        data.push_month(
            "January 2025".to_string(),
            MonthlyRecord {
                revenue: 200_000.0,
                cogs: 23_000.0,
                marketing: 31_400.0,
                team: 67_800.0,
                overhead: 46_800.0,
            },
        );
        derive_metrics(&mut data);
        let prompt = insight_prompt(&data).unwrap();
        assert!(prompt.contains("$200,000"));
        assert!(prompt.contains("January 2025"));
    }
}
