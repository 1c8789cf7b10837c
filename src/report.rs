//! HTML assembly of the multi-page report.
//!
//! The document structure is fixed: header, metric cards, Action Steps,
//! monthly metrics, cash movement, YTD overview, insights, action plan,
//! charts, bottom line. Assembly requires latest metrics to exist; everything
//! else degrades to safe defaults.

use chrono::Local;
use log::info;

use crate::config::Benchmarks;
use crate::error::{ReportError, Result};
use crate::schema::{ExtractedDataset, FinancialMetrics};
use crate::status::{classify, Direction, Status};
use crate::utils::{fmt_money, fmt_money_signed, fmt_pct, fmt_pct_signed};

/// Assembles the full self-contained document from the dataset, benchmark
/// table and the three chart links (empty links render placeholder blocks).
pub fn assemble_report(
    data: &ExtractedDataset,
    benchmarks: &Benchmarks,
    chart_urls: &[String],
    ai_narrative: Option<&str>,
) -> Result<String> {
    let latest = data
        .latest_metrics
        .as_ref()
        .ok_or_else(|| ReportError::NoMetrics("no monthly records were extracted".to_string()))?;

    info!("Generating financial report HTML for {}", data.company_name);

    let action_steps = action_steps_table(latest, benchmarks);
    let monthly_metrics = monthly_metrics_table(data);
    let cash_movement = cash_movement_table(data);
    let ytd_overview = ytd_overview_table(data, benchmarks);
    let insights = key_insights(latest, data, benchmarks, ai_narrative);
    let action_plan = action_plan(latest, benchmarks);
    let charts = charts_section(chart_urls);
    let bottom_line = bottom_line_section(latest, data, benchmarks);
    let generated = Local::now().format("%B %d, %Y (%I:%M %p)");

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Monthly Financial Analysis &amp; Insights - {company}</title>
    <style>{css}</style>
</head>
<body>
    <div class="page">
        <div class="header">
            <h1>Monthly Financial Analysis &amp; Insights</h1>
            <h2>{company}</h2>
            <div class="meta">
                Period: {period} | Report month: {latest_month} | Generated on: {generated}
            </div>
        </div>

        <div class="metrics-overview">
            <div class="metric-card">
                <span class="metric-value">{revenue}</span>
                <div class="metric-label">Revenue</div>
            </div>
            <div class="metric-card">
                <span class="metric-value">{expenses}</span>
                <div class="metric-label">Expenses</div>
            </div>
            <div class="metric-card">
                <span class="metric-value">{profit}</span>
                <div class="metric-label">Net Profit</div>
            </div>
            <div class="metric-card">
                <span class="metric-value">{margin}</span>
                <div class="metric-label">Margin</div>
            </div>
        </div>

        <div class="section-box">
            <div class="section-header">&#128203; Action Steps</div>
            <div class="section-content">{action_steps}</div>
        </div>

        <div class="section-box">
            <div class="section-header">&#128202; Monthly Metrics</div>
            <div class="section-content">{monthly_metrics}</div>
        </div>
    </div>

    <div class="page">
        <div class="section-box">
            <div class="section-header">&#128176; Cash Movement</div>
            <div class="section-content">{cash_movement}</div>
        </div>

        <div class="section-box">
            <div class="section-header">&#128200; YTD Overview</div>
            <div class="section-content">{ytd_overview}</div>
        </div>

        <div class="section-box">
            <div class="section-content">{insights}</div>
        </div>

        <div class="section-box">
            <div class="section-content">{action_plan}</div>
        </div>
    </div>

    <div class="page">
        <div class="section-box">
            <div class="section-header">&#128202; Financial Performance Charts</div>
            <div class="section-content">{charts}</div>
        </div>

        {bottom_line}

        <div class="footer">
            <p>&copy; {year} {company}. Financial Analysis Report generated for {latest_month}</p>
            <p>This report includes P&amp;L analysis, Balance Sheet overview, and Cash Flow tracking with actionable insights based on actual financial data.</p>
        </div>
    </div>
</body>
</html>"#,
        company = data.company_name,
        css = REPORT_CSS,
        period = data.period,
        latest_month = data.latest_month,
        generated = generated,
        revenue = fmt_money(latest.revenue),
        expenses = fmt_money(latest.expenses),
        profit = fmt_money(latest.profit),
        margin = fmt_pct(latest.profit_margin()),
        year = Local::now().format("%Y"),
        action_steps = action_steps,
        monthly_metrics = monthly_metrics,
        cash_movement = cash_movement,
        ytd_overview = ytd_overview,
        insights = insights,
        action_plan = action_plan,
        charts = charts,
        bottom_line = bottom_line,
    ))
}

fn status_row(
    category: &str,
    status: Status,
    target: String,
    actual: String,
    comment: &str,
) -> String {
    format!(
        r#"<tr class="{}"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
        status.css_class(),
        category,
        status.label(),
        target,
        actual,
        comment
    )
}

fn action_steps_table(metrics: &FinancialMetrics, benchmarks: &Benchmarks) -> String {
    let mut rows = Vec::with_capacity(7);

    let income_status = classify(metrics.revenue, benchmarks.income_target, Direction::Maximize);
    rows.push(status_row(
        "Income",
        income_status,
        fmt_money(benchmarks.income_target),
        fmt_money(metrics.revenue),
        if metrics.revenue > benchmarks.income_target {
            "Income exceeded target. Strong performance."
        } else {
            "Revenue below target. Focus on growth."
        },
    ));

    let cogs_status = classify(metrics.cogs_percentage(), benchmarks.cogs_target, Direction::Minimize);
    rows.push(status_row(
        "COGS/Products",
        cogs_status,
        fmt_pct(benchmarks.cogs_target),
        fmt_pct(metrics.cogs_percentage()),
        if metrics.cogs_percentage() <= benchmarks.cogs_target {
            "Cost management excellent."
        } else {
            "Cost optimization needed."
        },
    ));

    let marketing_status = classify(
        metrics.marketing_percentage(),
        benchmarks.marketing_target,
        Direction::Minimize,
    );
    rows.push(status_row(
        "Marketing",
        marketing_status,
        fmt_pct(benchmarks.marketing_target),
        fmt_pct(metrics.marketing_percentage()),
        if metrics.marketing_percentage() <= benchmarks.marketing_target {
            "Marketing spend within target."
        } else {
            "Marketing spend above target."
        },
    ));

    let team_status = classify(metrics.team_percentage(), benchmarks.team_target, Direction::Minimize);
    rows.push(status_row(
        "Team",
        team_status,
        fmt_pct(benchmarks.team_target),
        fmt_pct(metrics.team_percentage()),
        if metrics.team_percentage() <= benchmarks.team_target {
            "Team costs controlled."
        } else {
            "Team costs need review."
        },
    ));

    let overhead_status = classify(
        metrics.overhead_percentage(),
        benchmarks.overhead_target,
        Direction::Minimize,
    );
    rows.push(status_row(
        "Overheads",
        overhead_status,
        fmt_pct(benchmarks.overhead_target),
        fmt_pct(metrics.overhead_percentage()),
        if metrics.overhead_percentage() <= benchmarks.overhead_target {
            "Overhead management efficient."
        } else {
            "Overhead optimization required."
        },
    ));

    let profit_status = classify(metrics.profit_margin(), benchmarks.profit_target, Direction::Maximize);
    rows.push(status_row(
        "Net Profit",
        profit_status,
        fmt_pct(benchmarks.profit_target),
        fmt_pct(metrics.profit_margin()),
        if metrics.profit_margin() >= benchmarks.profit_target {
            "Profitability strong."
        } else {
            "Profitability needs improvement."
        },
    ));

    // Cash is a plain sign check rather than a banded ratio.
    let cash_status = if metrics.cash_position > 0.0 {
        Status::Positive
    } else {
        Status::Warning
    };
    rows.push(status_row(
        "Cash on Hand",
        cash_status,
        fmt_money(benchmarks.cash_target),
        fmt_money(metrics.cash_position),
        if metrics.cash_position > 0.0 {
            "Cash position healthy."
        } else {
            "Critical cash situation."
        },
    ));

    format!(
        r#"<table>
<thead>
<tr><th>Category</th><th>Status</th><th>Target</th><th>Actual</th><th>Comments</th></tr>
</thead>
<tbody>
{}
</tbody>
</table>
<p class="note"><strong>Note:</strong> Analysis based on industry benchmarks and performance targets.</p>"#,
        rows.join("")
    )
}

fn monthly_metrics_table(data: &ExtractedDataset) -> String {
    let (Some(latest), Some(previous)) = (&data.latest_metrics, &data.previous_metrics) else {
        return "<p>Monthly metrics data not available</p>".to_string();
    };

    let avg_revenue = (latest.revenue + previous.revenue) / 2.0;
    let avg_expenses = (latest.expenses + previous.expenses) / 2.0;
    let avg_profit = (latest.profit + previous.profit) / 2.0;

    let revenue_variance = if avg_revenue > 0.0 {
        (latest.revenue - avg_revenue) / avg_revenue * 100.0
    } else {
        0.0
    };
    let expense_variance = if avg_expenses > 0.0 {
        (latest.expenses - avg_expenses) / avg_expenses * 100.0
    } else {
        0.0
    };
    let profit_variance = if avg_profit != 0.0 {
        (latest.profit - avg_profit) / avg_profit.abs() * 100.0
    } else {
        0.0
    };

    format!(
        r#"<table>
<thead>
<tr><th>Metric</th><th>Actual ($)</th><th>YTD Avg ($)</th><th>Variance</th></tr>
</thead>
<tbody>
<tr><td>Monthly Revenue</td><td>{}</td><td>{}</td><td>{}</td></tr>
<tr><td>Monthly Expenses</td><td>{}</td><td>{}</td><td>{}</td></tr>
<tr><td>Monthly Profit</td><td>{}</td><td>{}</td><td>{}</td></tr>
</tbody>
</table>"#,
        fmt_money(latest.revenue),
        fmt_money(avg_revenue),
        fmt_pct_signed(revenue_variance),
        fmt_money(latest.expenses),
        fmt_money(avg_expenses),
        fmt_pct_signed(expense_variance),
        fmt_money(latest.profit),
        fmt_money(avg_profit),
        fmt_pct_signed(profit_variance),
    )
}

fn cash_movement_table(data: &ExtractedDataset) -> String {
    let current_cash = data.cash_at_offset(0);
    let previous_cash = data.cash_at_offset(1);
    let movement = current_cash - previous_cash;

    let monthly_expenses = data
        .latest_metrics
        .as_ref()
        .map(|m| m.expenses)
        .unwrap_or(1.0);
    let (coverage_current, coverage_previous) = if monthly_expenses > 0.0 {
        (current_cash / monthly_expenses, previous_cash / monthly_expenses)
    } else {
        (0.0, 0.0)
    };
    let arrow = if coverage_current > coverage_previous {
        "\u{2191}"
    } else {
        "\u{2193}"
    };

    format!(
        r#"<table>
<thead>
<tr><th>Account</th><th>Previous Month</th><th>Current Month</th><th>Movement</th></tr>
</thead>
<tbody>
<tr><td>Total Cash</td><td>{}</td><td>{}</td><td>{}</td></tr>
<tr><td>Expense Cover (months)</td><td>{:.1}</td><td>{:.1}</td><td>{}</td></tr>
</tbody>
</table>
<p class="note"><strong>Note:</strong> Expense Coverage = Cash on hand &divide; avg. monthly expenses {}.</p>"#,
        fmt_money(previous_cash),
        fmt_money(current_cash),
        fmt_money_signed(movement),
        coverage_previous,
        coverage_current,
        arrow,
        fmt_money(monthly_expenses),
    )
}

fn ytd_overview_table(data: &ExtractedDataset, benchmarks: &Benchmarks) -> String {
    let ytd = data.ytd.clone().unwrap_or_default();
    let total_revenue = ytd.revenue;

    let pct = |value: f64| {
        if total_revenue > 0.0 {
            value / total_revenue * 100.0
        } else {
            0.0
        }
    };

    let cogs_pct = pct(ytd.cogs);
    let marketing_pct = pct(ytd.marketing);
    let team_pct = pct(ytd.team);
    let overhead_pct = pct(ytd.overhead);
    let profit_pct = pct(ytd.profit);

    format!(
        r#"<table>
<thead>
<tr><th>Category</th><th>YTD Actual</th><th>% of Revenue</th><th>Target %</th><th>Variance</th></tr>
</thead>
<tbody>
<tr><td>Total Income</td><td>{}</td><td>100.0%</td><td>100.0%</td><td>0.0%</td></tr>
<tr><td>COGS</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>
<tr><td>Marketing</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>
<tr><td>Team</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>
<tr><td>Overheads</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>
<tr><td>Net Profit</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>
</tbody>
</table>"#,
        fmt_money(total_revenue),
        fmt_money(ytd.cogs),
        fmt_pct(cogs_pct),
        fmt_pct(benchmarks.cogs_target),
        fmt_pct_signed(cogs_pct - benchmarks.cogs_target),
        fmt_money(ytd.marketing),
        fmt_pct(marketing_pct),
        fmt_pct(benchmarks.marketing_target),
        fmt_pct_signed(marketing_pct - benchmarks.marketing_target),
        fmt_money(ytd.team),
        fmt_pct(team_pct),
        fmt_pct(benchmarks.team_target),
        fmt_pct_signed(team_pct - benchmarks.team_target),
        fmt_money(ytd.overhead),
        fmt_pct(overhead_pct),
        fmt_pct(benchmarks.overhead_target),
        fmt_pct_signed(overhead_pct - benchmarks.overhead_target),
        fmt_money(ytd.profit),
        fmt_pct(profit_pct),
        fmt_pct(benchmarks.profit_target),
        fmt_pct_signed(profit_pct - benchmarks.profit_target),
    )
}

fn key_insights(
    metrics: &FinancialMetrics,
    data: &ExtractedDataset,
    benchmarks: &Benchmarks,
    ai_narrative: Option<&str>,
) -> String {
    if let Some(narrative) = ai_narrative {
        return format!(
            r#"<h3>&#128161; Key Performance Insights</h3>
<div class="insight-box"><p>{}</p></div>"#,
            narrative
        );
    }

    format!(
        r#"<h3>&#128161; Key Performance Insights</h3>
<div class="insight-grid">
    <div class="insight-box">
        <h4>Revenue Performance</h4>
        <p>{month} revenue of {revenue} shows {revenue_word} performance against target of {target}.</p>
    </div>
    <div class="insight-box">
        <h4>Cost Management</h4>
        <p>{cost_word} with {margin} profit margin. Focus on {cost_focus}.</p>
    </div>
    <div class="insight-box">
        <h4>Cash Position</h4>
        <p>Current cash of {cash} provides {cash_word} operational flexibility. {cash_action}.</p>
    </div>
    <div class="insight-box">
        <h4>Profitability Trend</h4>
        <p>{trend_word} with focus needed on {trend_focus}.</p>
    </div>
</div>"#,
        month = data.latest_month,
        revenue = fmt_money(metrics.revenue),
        revenue_word = if metrics.revenue > benchmarks.income_target {
            "strong"
        } else {
            "steady"
        },
        target = fmt_money(benchmarks.income_target),
        cost_word = if metrics.profit_margin() > 15.0 {
            "Costs are well controlled"
        } else {
            "Cost optimization needed"
        },
        margin = fmt_pct(metrics.profit_margin()),
        cost_focus = if metrics.profit_margin() > 15.0 {
            "maintaining efficiency"
        } else {
            "reducing high-cost categories"
        },
        cash = fmt_money(metrics.cash_position),
        cash_word = if metrics.cash_position > 100_000.0 {
            "adequate"
        } else {
            "limited"
        },
        cash_action = if metrics.cash_position > 0.0 {
            "Maintain reserves"
        } else {
            "Immediate cash generation required"
        },
        trend_word = if metrics.profit > 0.0 {
            "Positive trajectory"
        } else {
            "Requires immediate attention"
        },
        trend_focus = if metrics.profit > 0.0 {
            "growth strategies"
        } else {
            "expense management"
        },
    )
}

fn action_plan(metrics: &FinancialMetrics, benchmarks: &Benchmarks) -> String {
    format!(
        r#"<h3>&#128197; Action Plan</h3>
<div class="action-timeline">
    <div class="timeline-section">
        <h4>This Week</h4>
        <ul>
            <li>{week_1}</li>
            <li>{week_2}</li>
            <li>{week_3}</li>
        </ul>
    </div>
    <div class="timeline-section">
        <h4>This Month</h4>
        <ul>
            <li>{month_1}</li>
            <li>{month_2}</li>
            <li>{month_3}</li>
        </ul>
    </div>
    <div class="timeline-section">
        <h4>Next 3 Months</h4>
        <ul>
            <li>{quarter_1} operations for sustainable profitability</li>
            <li>Explore revenue diversification opportunities</li>
            <li>Build cash reserves to 3-month operating expense coverage</li>
        </ul>
    </div>
</div>"#,
        week_1 = if metrics.profit > 0.0 {
            "Review expansion opportunities"
        } else {
            "Review highest expense categories immediately"
        },
        week_2 = if metrics.cash_position > 0.0 {
            "Optimize cash deployment"
        } else {
            "Analyze cash flow projections for next 30 days"
        },
        week_3 = if metrics.profit_margin() > 20.0 {
            "Evaluate growth investments"
        } else {
            "Identify quick cost reduction opportunities"
        },
        month_1 = if metrics.profit_margin() > 15.0 {
            "Scale successful initiatives"
        } else {
            "Implement expense control measures for categories above target"
        },
        month_2 = if metrics.revenue > benchmarks.income_target {
            "Enhance market position"
        } else {
            "Optimize pricing strategy to improve margins"
        },
        month_3 = if metrics.profit > 0.0 {
            "Strengthen competitive advantages"
        } else {
            "Strengthen collection processes for outstanding receivables"
        },
        quarter_1 = if metrics.profit_margin() > 15.0 {
            "Maintain"
        } else {
            "Restructure"
        },
    )
}

fn chart_block(title: &str, url: &str, placeholder: &str, max_width: u32) -> String {
    if url.is_empty() {
        format!(
            r#"<h3>{}</h3><div class="chart-placeholder">{}</div>"#,
            title, placeholder
        )
    } else {
        format!(
            r#"<h3>{}</h3><img src="{}" alt="{}" style="width: 100%; max-width: {}px; height: auto;">"#,
            title, url, title, max_width
        )
    }
}

fn charts_section(chart_urls: &[String]) -> String {
    let url = |i: usize| chart_urls.get(i).map(String::as_str).unwrap_or("");

    format!(
        r#"<div class="chart-container">
    {}
</div>

<div class="chart-row">
    <div class="chart-container">
        {}
    </div>
    <div class="chart-container">
        {}
    </div>
</div>"#,
        chart_block(
            "12-Month Income, Expenses and Profit",
            url(0),
            "Chart 1: Performance (Unavailable)",
            800
        ),
        chart_block(
            "YTD Expenses Breakdown",
            url(1),
            "Chart 2: Breakdown (Unavailable)",
            600
        ),
        chart_block("Cash on Hand", url(2), "Chart 3: Cash Flow (Unavailable)", 600),
    )
}

fn bottom_line_section(
    metrics: &FinancialMetrics,
    data: &ExtractedDataset,
    benchmarks: &Benchmarks,
) -> String {
    format!(
        r#"<div class="two-column">
    <div class="section-box">
        <div class="bottom-line-header">&#128161; Bottom Line</div>
        <div class="bottom-line-content">
            <p><strong>Financial Health:</strong> {company} shows revenue of {revenue} in {month}.
            Net profit margin of {margin} {margin_word} industry targets.
            {cash_word} cash position requires {cash_action}.</p>
        </div>
    </div>
    <div class="section-box">
        <div class="bottom-line-header">&#10145;&#65039; Next Steps</div>
        <div class="bottom-line-content">
            <p><strong>Priority 1:</strong> {priority_1}</p>
            <p><strong>Priority 2:</strong> {priority_2}</p>
        </div>
    </div>
</div>"#,
        company = data.company_name,
        revenue = fmt_money(metrics.revenue),
        month = data.latest_month,
        margin = fmt_pct(metrics.profit_margin()),
        margin_word = if metrics.profit_margin() >= benchmarks.profit_target {
            "meets"
        } else {
            "falls short of"
        },
        cash_word = if metrics.cash_position > 0.0 {
            "Strong"
        } else {
            "Critical"
        },
        cash_action = if metrics.cash_position > 0.0 {
            "maintenance"
        } else {
            "immediate attention"
        },
        priority_1 = if metrics.profit_margin() >= 15.0 {
            "Maintain strong performance"
        } else {
            "Improve profitability through cost optimization"
        },
        priority_2 = if metrics.revenue > benchmarks.income_target {
            "Continue revenue growth initiatives"
        } else {
            "Focus on revenue enhancement strategies"
        },
    )
}

const REPORT_CSS: &str = r#"
@page { size: A4; margin: 8mm; }

body {
    font-family: 'Segoe UI', system-ui, -apple-system, sans-serif;
    line-height: 1.3;
    margin: 0;
    padding: 10px;
    color: #1f2937;
    font-size: 10px;
    background: white;
}

.page { page-break-after: always; min-height: 270mm; padding: 0; margin: 0; }
.page:last-child { page-break-after: avoid; }

.header {
    background: #6366f1;
    color: white;
    padding: 12px 16px;
    text-align: center;
    margin-bottom: 12px;
    border-radius: 6px;
    box-shadow: 0 2px 4px rgba(0, 0, 0, 0.1);
}

.header h1 { margin: 0 0 4px 0; font-size: 20px; font-weight: 600; letter-spacing: -0.5px; }
.header h2 { margin: 0 0 4px 0; font-size: 16px; font-weight: 500; }
.header .meta { font-size: 11px; margin-top: 4px; opacity: 0.95; }

.metrics-overview {
    display: grid;
    grid-template-columns: repeat(4, 1fr);
    gap: 8px;
    margin: 12px 0;
}

.metric-card {
    background: white;
    border: 1px solid #e5e7eb;
    border-radius: 6px;
    padding: 10px;
    text-align: center;
    box-shadow: 0 1px 3px rgba(0, 0, 0, 0.1);
}

.metric-value {
    font-size: 16px;
    font-weight: 700;
    color: #6366f1;
    margin-bottom: 2px;
    display: block;
}

.metric-label {
    font-size: 9px;
    color: #6b7280;
    text-transform: uppercase;
    font-weight: 600;
    letter-spacing: 0.3px;
}

.section-box {
    background: white;
    border: 1px solid #e5e7eb;
    border-radius: 6px;
    box-shadow: 0 1px 3px rgba(0, 0, 0, 0.1);
    overflow: hidden;
    margin-bottom: 12px;
}

.section-header {
    background: #6366f1;
    color: white;
    padding: 8px 12px;
    font-size: 12px;
    font-weight: 600;
    display: flex;
    align-items: center;
    gap: 6px;
}

.section-content { padding: 10px; background: white; }

table { width: 100%; border-collapse: collapse; font-size: 9px; background: white; margin: 0; }

th {
    background: #6b7280;
    color: white;
    padding: 6px 8px;
    text-align: left;
    font-weight: 600;
    font-size: 9px;
    line-height: 1.2;
}

td { padding: 6px 8px; text-align: left; border-bottom: 1px solid #f3f4f6; line-height: 1.2; }

tr:nth-child(even) td { background: #f9fafb; }
tr:nth-child(odd) td { background: white; }

.positive { background: #dcfce7 !important; color: #166534; }
.caution { background: #fef3c7 !important; color: #92400e; }
.warning { background: #fee2e2 !important; color: #991b1b; }
.neutral { background: #f3f4f6 !important; color: #374151; }

.insight-grid { display: grid; grid-template-columns: repeat(2, 1fr); gap: 10px; margin: 10px 0; }

.insight-box {
    background: #f8fafc;
    border: 1px solid #e2e8f0;
    border-radius: 4px;
    padding: 8px;
}

.insight-box h4 { margin: 0 0 4px 0; font-size: 10px; color: #374151; }
.insight-box p { margin: 0; font-size: 9px; line-height: 1.3; }

.action-timeline { display: grid; grid-template-columns: repeat(3, 1fr); gap: 10px; }

.timeline-section h4 {
    background: #6366f1;
    color: white;
    margin: 0 0 6px 0;
    padding: 4px 8px;
    font-size: 10px;
    border-radius: 3px;
}

.timeline-section ul { margin: 0; padding-left: 12px; font-size: 9px; }
.timeline-section li { margin: 3px 0; line-height: 1.2; }

.two-column { display: grid; grid-template-columns: 1fr 1fr; gap: 12px; margin: 12px 0; }

.bottom-line-header {
    background: #6366f1;
    color: white;
    padding: 8px 12px;
    font-size: 12px;
    font-weight: 600;
}

.bottom-line-content { padding: 10px; background: white; }
.bottom-line-content p { margin: 0 0 8px 0; font-size: 10px; line-height: 1.3; }

.footer {
    text-align: center;
    color: #6b7280;
    font-size: 8px;
    margin-top: 20px;
    padding-top: 12px;
    border-top: 1px solid #e5e7eb;
}

.note { font-size: 9px; color: #6b7280; font-style: italic; margin-top: 6px; }

.chart-container {
    text-align: center;
    margin: 15px 0;
    background: white;
    border: 1px solid #e5e7eb;
    border-radius: 6px;
    padding: 12px;
    box-shadow: 0 1px 3px rgba(0, 0, 0, 0.1);
}

.chart-container h3 { font-size: 12px; margin: 0 0 8px 0; color: #374151; }

.chart-row { display: grid; grid-template-columns: 1fr 1fr; gap: 12px; margin: 15px 0; }

.chart-placeholder {
    background: #f3f4f6;
    border: 2px dashed #d1d5db;
    border-radius: 6px;
    padding: 20px 10px;
    text-align: center;
    color: #6b7280;
    font-style: italic;
    font-size: 9px;
}

@media print {
    .page { page-break-after: always; }
    .no-break { page-break-inside: avoid; }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::derive_metrics;
    use crate::schema::MonthlyRecord;

    fn dataset() -> ExtractedDataset {
        let mut data = ExtractedDataset::new("February 2025".to_string());
        data.company_name = "Synergy Integrated Health".to_string();
        for i in 0..12 {
            let revenue = 200_000.0 + i as f64 * 2_000.0;
            data.push_month(
                format!("Month {:02}", i),
                MonthlyRecord {
                    revenue,
                    cogs: revenue * 0.115,
                    marketing: revenue * 0.157,
                    team: revenue * 0.339,
                    overhead: revenue * 0.234,
                },
            );
        }
        data.cash_positions = vec![-78_000.0, -73_790.0];
        derive_metrics(&mut data);
        data
    }

    fn no_links() -> Vec<String> {
        vec![String::new(), String::new(), String::new()]
    }

    #[test]
    fn test_no_metrics_is_fatal() {
        let data = ExtractedDataset::new("x".to_string());
        let result = assemble_report(&data, &Benchmarks::default(), &no_links(), None);
        assert!(matches!(result, Err(ReportError::NoMetrics(_))));
    }

    #[test]
    fn test_report_contains_fixed_sections() {
        let html = assemble_report(&dataset(), &Benchmarks::default(), &no_links(), None).unwrap();
        assert!(html.contains("Synergy Integrated Health"));
        assert!(html.contains("Action Steps"));
        assert!(html.contains("Monthly Metrics"));
        assert!(html.contains("Cash Movement"));
        assert!(html.contains("YTD Overview"));
        assert!(html.contains("Key Performance Insights"));
        assert!(html.contains("Action Plan"));
        assert!(html.contains("Bottom Line"));
        assert!(html.contains("chart-placeholder"));
    }

    #[test]
    fn test_cash_movement_figures() {
        let html = cash_movement_table(&dataset());
        assert!(html.contains("$-78,000"));
        assert!(html.contains("$-73,790"));
        assert!(html.contains("$+4,210"));
        // Negative cash moving toward zero improves coverage.
        assert!(html.contains("\u{2191}"));
    }

    #[test]
    fn test_degraded_cash_reports_zero() {
        let mut data = dataset();
        data.cash_positions.clear();
        derive_metrics(&mut data);
        let html = cash_movement_table(&data);
        assert!(html.contains("<td>$0</td><td>$0</td>"));

        // The whole document still assembles.
        assert!(assemble_report(&data, &Benchmarks::default(), &no_links(), None).is_ok());
    }

    #[test]
    fn test_action_steps_row_classes_come_from_status() {
        let html = action_steps_table(
            dataset().latest_metrics.as_ref().unwrap(),
            &Benchmarks::default(),
        );
        // COGS at 11.5% vs 20% target: Positive. Marketing at 15.7% vs 16%:
        // Neutral. Team at 33.9% vs 25% blows past the caution band: Warning.
        assert!(html.contains(r#"<tr class="positive"><td>COGS/Products</td>"#));
        assert!(html.contains(r#"<tr class="neutral"><td>Marketing</td>"#));
        assert!(html.contains(r#"<tr class="warning"><td>Team</td>"#));
        // Negative cash is a warning row.
        assert!(html.contains(r#"<tr class="warning"><td>Cash on Hand</td>"#));
    }

    #[test]
    fn test_chart_links_render_images() {
        let links = vec![
            "https://example.com/c1.png".to_string(),
            String::new(),
            "https://example.com/c3.png".to_string(),
        ];
        let html = charts_section(&links);
        assert!(html.contains(r#"src="https://example.com/c1.png""#));
        assert!(html.contains("Chart 2: Breakdown (Unavailable)"));
        assert!(html.contains(r#"src="https://example.com/c3.png""#));
    }

    #[test]
    fn test_ai_narrative_replaces_insight_grid() {
        let data = dataset();
        let insights = key_insights(
            data.latest_metrics.as_ref().unwrap(),
            &data,
            &Benchmarks::default(),
            Some("Narrative from the model."),
        );
        assert!(insights.contains("Narrative from the model."));
        assert!(!insights.contains("insight-grid"));
    }
}
