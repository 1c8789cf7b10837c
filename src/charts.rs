//! Declarative chart specs and the rendering-service client.
//!
//! Three charts are derived from every dataset: a combined bar/line of the
//! trailing 12 months, a doughnut of the cost components, and the cash
//! position trend. Each submission to the rendering service is isolated; a
//! failed render yields an empty link for that slot only.

use futures::stream::{self, StreamExt};
use log::{error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::schema::ExtractedDataset;

/// How many chart renders are in flight at once. The consumer blocks on all
/// three regardless, so a small pool is enough.
const RENDER_CONCURRENCY: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    Bar,
    Doughnut,
    Line,
}

/// A chart description independent of any rendering engine; consumed once by
/// the chart client.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub config: Value,
}

/// Builds the three chart specs for a dataset, or `None` when the dataset has
/// no derivable latest metrics.
pub fn build_chart_specs(data: &ExtractedDataset) -> Option<[ChartSpec; 3]> {
    let latest = data.latest_metrics.as_ref()?;

    let window = data.months.len().saturating_sub(12);
    let months: Vec<&str> = data.months[window..].iter().map(String::as_str).collect();
    let records: Vec<_> = data.records_in_order().into_iter().skip(window).collect();

    let revenue: Vec<f64> = records.iter().map(|r| r.revenue).collect();
    let expenses: Vec<f64> = records.iter().map(|r| r.expenses()).collect();
    let profit: Vec<f64> = records.iter().map(|r| r.profit()).collect();

    let performance = ChartSpec {
        kind: ChartKind::Bar,
        config: json!({
            "type": "bar",
            "data": {
                "labels": months,
                "datasets": [
                    {
                        "label": "Revenue",
                        "data": revenue,
                        "backgroundColor": "rgba(16, 185, 129, 0.8)",
                        "borderColor": "#10B981",
                        "borderWidth": 2
                    },
                    {
                        "label": "Expenses",
                        "data": expenses,
                        "backgroundColor": "rgba(239, 68, 68, 0.8)",
                        "borderColor": "#EF4444",
                        "borderWidth": 2
                    },
                    {
                        "label": "Profit",
                        "type": "line",
                        "data": profit,
                        "borderColor": "#3B82F6",
                        "backgroundColor": "rgba(59, 130, 246, 0.3)",
                        "fill": true,
                        "tension": 0.4
                    }
                ]
            },
            "options": {
                "responsive": true,
                "plugins": {
                    "title": {"display": true, "text": "12-Month Financial Performance"},
                    "legend": {"position": "top"}
                },
                "scales": {
                    "y": {"beginAtZero": true, "title": {"display": true, "text": "Amount ($)"}},
                    "x": {"title": {"display": true, "text": "Month"}}
                }
            }
        }),
    };

    let breakdown = ChartSpec {
        kind: ChartKind::Doughnut,
        config: json!({
            "type": "doughnut",
            "data": {
                "labels": ["COGS", "Marketing", "Team", "Overheads"],
                "datasets": [{
                    "data": [
                        latest.cogs_percentage(),
                        latest.marketing_percentage(),
                        latest.team_percentage(),
                        latest.overhead_percentage()
                    ],
                    "backgroundColor": ["#F59E0B", "#3B82F6", "#10B981", "#8B5CF6"],
                    "borderWidth": 2
                }]
            },
            "options": {
                "responsive": true,
                "plugins": {
                    "title": {"display": true, "text": "Expense Breakdown (% of Revenue)"},
                    "legend": {"position": "right"}
                }
            }
        }),
    };

    let cash_series = if data.cash_positions.is_empty() {
        vec![0.0; months.len()]
    } else {
        data.cash_positions.clone()
    };

    let cash_trend = ChartSpec {
        kind: ChartKind::Line,
        config: json!({
            "type": "line",
            "data": {
                "labels": months,
                "datasets": [{
                    "label": "Cash Position",
                    "data": cash_series,
                    "borderColor": "#EC4899",
                    "backgroundColor": "rgba(236, 72, 153, 0.2)",
                    "fill": true,
                    "tension": 0.4
                }]
            },
            "options": {
                "responsive": true,
                "plugins": {
                    "title": {"display": true, "text": "Cash Position Trend"},
                    "legend": {"position": "top"}
                },
                "scales": {
                    "y": {"title": {"display": true, "text": "Cash Amount ($)"}},
                    "x": {"title": {"display": true, "text": "Month"}}
                }
            }
        }),
    };

    Some([performance, breakdown, cash_trend])
}

#[derive(Clone)]
pub struct ChartClient {
    client: Client,
    url: String,
}

impl ChartClient {
    pub fn new(config: &ReportConfig) -> Self {
        let client = Client::builder()
            .timeout(config.chart_timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            url: config.quickchart_url.clone(),
        }
    }

    /// Renders all specs with bounded concurrency, preserving slot order. A
    /// missing spec set or a failed render yields an empty link for the slot.
    pub async fn render_all(&self, specs: Option<[ChartSpec; 3]>) -> Vec<String> {
        let Some(specs) = specs else {
            return vec![String::new(); 3];
        };

        stream::iter(specs.into_iter().enumerate())
            .map(|(i, spec)| async move {
                match self.render(&spec).await {
                    Ok(url) => {
                        info!("Chart {} ({:?}) rendered", i + 1, spec.kind);
                        url
                    }
                    Err(e) => {
                        error!("Error rendering chart {}: {}", i + 1, e);
                        String::new()
                    }
                }
            })
            .buffered(RENDER_CONCURRENCY)
            .collect()
            .await
    }

    async fn render(&self, spec: &ChartSpec) -> Result<String> {
        let payload = json!({
            "chart": spec.config,
            "width": 800,
            "height": 400,
            "format": "png",
            "backgroundColor": "white"
        });

        let res = self.client.post(&self.url).json(&payload).send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ReportError::ChartService(format!(
                "render failed (status {}): {}",
                status, body
            )));
        }

        let body: Value = res.json().await?;
        body.get("url")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| ReportError::ChartService("response missing url".to_string()))
    }
}
