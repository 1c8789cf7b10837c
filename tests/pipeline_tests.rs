use financial_report_builder::{
    assemble_report, build_chart_specs, classify, derive_metrics, normalize_str, Benchmarks,
    Direction, ExtractedDataset, MonthlyRecord, ReportConfig, ReportError, ReportPipeline, Status,
};
use std::collections::BTreeMap;
use std::path::PathBuf;

fn record_at_sample_ratios(revenue: f64) -> MonthlyRecord {
    MonthlyRecord {
        revenue,
        cogs: revenue * 0.115,
        marketing: revenue * 0.157,
        team: revenue * 0.339,
        overhead: revenue * 0.234,
    }
}

fn twelve_month_dataset() -> ExtractedDataset {
    let revenues = [
        200_000.0, 210_000.0, 195_000.0, 220_000.0, 215_000.0, 225_000.0, 230_000.0, 240_000.0,
        235_000.0, 245_000.0, 225_000.0, 232_557.0,
    ];

    let mut data = ExtractedDataset::new("February 2025".to_string());
    data.company_name = "Synergy Integrated Health".to_string();
    for (i, revenue) in revenues.iter().enumerate() {
        data.push_month(format!("Month {:02}", i), record_at_sample_ratios(*revenue));
    }
    data.cash_positions = vec![
        -120_000.0, -115_000.0, -110_000.0, -105_000.0, -100_000.0, -95_000.0, -90_000.0,
        -85_000.0, -80_000.0, -75_000.0, -78_000.0, -73_790.0,
    ];
    derive_metrics(&mut data);
    data
}

fn empty_links() -> Vec<String> {
    vec![String::new(), String::new(), String::new()]
}

#[test]
fn end_to_end_metrics_match_expected_profile() {
    let data = twelve_month_dataset();
    let latest = data.latest_metrics.as_ref().unwrap();

    assert_eq!(latest.revenue, 232_557.0);
    // profit = revenue * (1 - 0.115 - 0.157 - 0.339 - 0.234) = revenue * 0.155
    assert!((latest.profit - 232_557.0 * 0.155).abs() < 1.0);
    assert!((latest.profit_margin() - 15.5).abs() < 0.1);
    assert!((latest.cogs_percentage() - 11.5).abs() < 0.01);
    assert_eq!(latest.cash_position, -73_790.0);
}

#[test]
fn ytd_revenue_is_the_exact_sum_of_periods() {
    let data = twelve_month_dataset();
    let ytd = data.ytd.as_ref().unwrap();

    let expected: f64 = data.records_in_order().iter().map(|r| r.revenue).sum();
    assert_eq!(ytd.revenue, expected);
    assert_eq!(ytd.revenue, 2_672_557.0);
}

#[test]
fn cash_movement_and_coverage_direction() {
    let data = twelve_month_dataset();
    let current = data.cash_at_offset(0);
    let previous = data.cash_at_offset(1);

    assert_eq!(current - previous, 4_210.0);

    let expenses = data.latest_metrics.as_ref().unwrap().expenses;
    assert!(current / expenses > previous / expenses);
}

#[test]
fn classifier_boundary_from_sample_benchmarks() {
    // 230000 / 209475 = 1.0979..., which is below the 1.10 Positive edge.
    assert_eq!(
        classify(230_000.0, 209_475.0, Direction::Maximize),
        Status::Neutral
    );
    // Nudging actual over the 1.10 edge flips the band.
    assert_eq!(
        classify(209_475.0 * 1.10, 209_475.0, Direction::Maximize),
        Status::Positive
    );
}

#[test]
fn report_renders_with_full_dataset() -> anyhow::Result<()> {
    let data = twelve_month_dataset();
    let html = assemble_report(&data, &Benchmarks::default(), &empty_links(), None)?;

    assert!(html.contains("Synergy Integrated Health"));
    assert!(html.contains("$232,557"));
    assert!(html.contains("$-73,790"));
    assert!(html.contains("$+4,210"));
    // All three chart slots fall back to placeholder blocks.
    assert_eq!(html.matches(r#"class="chart-placeholder""#).count(), 3);
    Ok(())
}

#[test]
fn degraded_balance_sheet_still_produces_a_document() -> anyhow::Result<()> {
    let mut data = twelve_month_dataset();
    data.cash_positions.clear();
    derive_metrics(&mut data);

    let html = assemble_report(&data, &Benchmarks::default(), &empty_links(), None)?;
    assert!(html.contains("<td>$0</td><td>$0</td>"));
    Ok(())
}

#[test]
fn chart_specs_cover_all_three_kinds() {
    let data = twelve_month_dataset();
    let specs = build_chart_specs(&data).unwrap();

    assert_eq!(specs[0].config["type"], "bar");
    assert_eq!(specs[1].config["type"], "doughnut");
    assert_eq!(specs[2].config["type"], "line");

    let profit_series = specs[0].config["data"]["datasets"][2]["data"]
        .as_array()
        .unwrap();
    assert_eq!(profit_series.len(), 12);
}

#[test]
fn normalizer_handles_report_inputs() {
    assert_eq!(normalize_str("$1,234.50"), 1234.50);
    assert_eq!(normalize_str("(500)"), -500.0);
    assert_eq!(normalize_str(""), 0.0);
    assert_eq!(normalize_str("N/A"), 0.0);
}

#[tokio::test]
async fn missing_all_workbooks_is_fatal_not_empty() {
    let pipeline = ReportPipeline::new(ReportConfig::default());
    let sources: BTreeMap<String, PathBuf> = [
        ("profit_loss", "/tmp/does-not-exist/pl.xlsx"),
        ("balance_sheet", "/tmp/does-not-exist/bs.xlsx"),
        ("cashflow", "/tmp/does-not-exist/cf.xlsx"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), PathBuf::from(v)))
    .collect();

    match pipeline.generate(&sources).await {
        Err(ReportError::NoMetrics(_)) => {}
        other => panic!("expected NoMetrics failure, got {:?}", other.map(|o| o.html.len())),
    }
}
