use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Logical role of an uploaded workbook, matched by keywords in the role key
/// the caller supplies (e.g. "profit_loss", "balance_sheet", "cashflow").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkbookRole {
    ProfitLoss,
    BalanceSheet,
    CashFlow,
}

impl WorkbookRole {
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.to_lowercase();
        if key.contains("profit") || key.contains("loss") || key.contains("p&l") {
            Some(Self::ProfitLoss)
        } else if key.contains("balance") {
            Some(Self::BalanceSheet)
        } else if key.contains("cash") {
            Some(Self::CashFlow)
        } else {
            None
        }
    }
}

/// One calendar month's figures. Profit is always recomputed from the
/// components so the two can never drift apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    pub revenue: f64,
    pub cogs: f64,
    pub marketing: f64,
    pub team: f64,
    pub overhead: f64,
}

impl MonthlyRecord {
    pub fn expenses(&self) -> f64 {
        self.cogs + self.marketing + self.team + self.overhead
    }

    pub fn profit(&self) -> f64 {
        self.revenue - self.expenses()
    }
}

/// Snapshot of one month's metrics plus the cash position at that point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
    pub cash_position: f64,
    pub cogs: f64,
    pub marketing: f64,
    pub team: f64,
    pub overheads: f64,
}

impl FinancialMetrics {
    pub fn from_record(record: &MonthlyRecord, cash_position: f64) -> Self {
        Self {
            revenue: record.revenue,
            expenses: record.expenses(),
            profit: record.profit(),
            cash_position,
            cogs: record.cogs,
            marketing: record.marketing,
            team: record.team,
            overheads: record.overhead,
        }
    }

    fn pct_of_revenue(&self, value: f64) -> f64 {
        if self.revenue > 0.0 {
            value / self.revenue * 100.0
        } else {
            0.0
        }
    }

    pub fn profit_margin(&self) -> f64 {
        self.pct_of_revenue(self.profit)
    }

    pub fn cogs_percentage(&self) -> f64 {
        self.pct_of_revenue(self.cogs)
    }

    pub fn marketing_percentage(&self) -> f64 {
        self.pct_of_revenue(self.marketing)
    }

    pub fn team_percentage(&self) -> f64 {
        self.pct_of_revenue(self.team)
    }

    pub fn overhead_percentage(&self) -> f64 {
        self.pct_of_revenue(self.overheads)
    }
}

/// Year-to-date totals across every extracted period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YtdTotals {
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
    pub cogs: f64,
    pub marketing: f64,
    pub team: f64,
    pub overhead: f64,
}

/// A named cash-flow account with its reported balances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowAccount {
    pub account: String,
    pub values: Vec<f64>,
}

/// The normalized dataset one report request is built from.
///
/// Populated fully by extraction before any metric or chart derivation runs,
/// and discarded once the document is rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDataset {
    pub company_name: String,
    /// Human-readable span of the report, e.g. "March 2024 - February 2025".
    pub period: String,
    pub latest_month: String,
    pub previous_month: String,
    /// Period labels in chronological order.
    pub months: Vec<String>,
    /// Monthly records keyed by zero-padded insertion-order keys ("month_00"),
    /// so map order matches period order.
    pub monthly: BTreeMap<String, MonthlyRecord>,
    /// Cash position per period, from the balance sheet.
    pub cash_positions: Vec<f64>,
    pub cash_accounts: Vec<CashFlowAccount>,
    pub latest_metrics: Option<FinancialMetrics>,
    pub previous_metrics: Option<FinancialMetrics>,
    pub ytd: Option<YtdTotals>,
}

impl ExtractedDataset {
    pub fn new(default_period: String) -> Self {
        Self {
            company_name: "Financial Report".to_string(),
            period: default_period.clone(),
            latest_month: default_period.clone(),
            previous_month: default_period,
            months: Vec::new(),
            monthly: BTreeMap::new(),
            cash_positions: Vec::new(),
            cash_accounts: Vec::new(),
            latest_metrics: None,
            previous_metrics: None,
            ytd: None,
        }
    }

    /// Appends one period, keeping the label list and monthly map in lockstep.
    pub fn push_month(&mut self, label: String, record: MonthlyRecord) {
        let key = format!("month_{:02}", self.monthly.len());
        self.months.push(label);
        self.monthly.insert(key, record);
    }

    pub fn records_in_order(&self) -> Vec<&MonthlyRecord> {
        self.monthly.values().collect()
    }

    /// Cash position `offset` entries back from the end of the series, or 0.0
    /// when the series is empty or too short.
    pub fn cash_at_offset(&self, offset: usize) -> f64 {
        let len = self.cash_positions.len();
        if len > offset {
            self.cash_positions[len - 1 - offset]
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(revenue: f64) -> MonthlyRecord {
        MonthlyRecord {
            revenue,
            cogs: revenue * 0.115,
            marketing: revenue * 0.157,
            team: revenue * 0.339,
            overhead: revenue * 0.234,
        }
    }

    #[test]
    fn test_profit_recomputed_from_components() {
        let r = MonthlyRecord {
            revenue: 100.0,
            cogs: 10.0,
            marketing: 20.0,
            team: 30.0,
            overhead: 15.0,
        };
        assert_eq!(r.expenses(), 75.0);
        assert_eq!(r.profit(), 25.0);
    }

    #[test]
    fn test_percentages_guard_zero_revenue() {
        let m = FinancialMetrics::from_record(
            &MonthlyRecord {
                revenue: 0.0,
                cogs: 500.0,
                marketing: 0.0,
                team: 0.0,
                overhead: 0.0,
            },
            0.0,
        );
        assert_eq!(m.profit_margin(), 0.0);
        assert_eq!(m.cogs_percentage(), 0.0);
        assert_eq!(m.marketing_percentage(), 0.0);
        assert_eq!(m.team_percentage(), 0.0);
        assert_eq!(m.overhead_percentage(), 0.0);
    }

    #[test]
    fn test_cogs_percentage() {
        let m = FinancialMetrics::from_record(
            &MonthlyRecord {
                revenue: 200_000.0,
                cogs: 23_000.0,
                marketing: 0.0,
                team: 0.0,
                overhead: 0.0,
            },
            0.0,
        );
        assert!((m.cogs_percentage() - 11.5).abs() < 1e-9);
    }

    #[test]
    fn test_push_month_keeps_order_and_cardinality() {
        let mut data = ExtractedDataset::new("February 2025".to_string());
        for (i, label) in ["January 2025", "February 2025"].iter().enumerate() {
            data.push_month(label.to_string(), record(100_000.0 + i as f64));
        }
        assert_eq!(data.months.len(), data.monthly.len());
        let records = data.records_in_order();
        assert_eq!(records[0].revenue, 100_000.0);
        assert_eq!(records[1].revenue, 100_001.0);
    }

    #[test]
    fn test_cash_at_offset_never_faults() {
        let mut data = ExtractedDataset::new("x".to_string());
        assert_eq!(data.cash_at_offset(0), 0.0);
        assert_eq!(data.cash_at_offset(1), 0.0);

        data.cash_positions = vec![-78_000.0, -73_790.0];
        assert_eq!(data.cash_at_offset(0), -73_790.0);
        assert_eq!(data.cash_at_offset(1), -78_000.0);
        assert_eq!(data.cash_at_offset(2), 0.0);
    }

    #[test]
    fn test_role_keyword_routing() {
        assert_eq!(WorkbookRole::from_key("profit_loss"), Some(WorkbookRole::ProfitLoss));
        assert_eq!(WorkbookRole::from_key("P&L 2025"), Some(WorkbookRole::ProfitLoss));
        assert_eq!(WorkbookRole::from_key("balance_sheet"), Some(WorkbookRole::BalanceSheet));
        assert_eq!(WorkbookRole::from_key("cashflow"), Some(WorkbookRole::CashFlow));
        assert_eq!(WorkbookRole::from_key("inventory"), None);
    }
}
