//! Advisory context block
//!
//! Renders a [`SummaryReport`] as the plain-text snapshot that precedes a
//! question to the advisory text generator.

use std::fmt::Write;

use super::format::{Currency, format_currency};
use super::policy::ScoringPolicy;
use super::types::SummaryReport;

pub const EMPTY_CONTEXT: &str = "No financial data has been provided yet.";

pub fn render_financial_context(
    report: Option<&SummaryReport>,
    currency: Currency,
    policy: &ScoringPolicy,
) -> String {
    let Some(report) = report else {
        return EMPTY_CONTEXT.to_string();
    };

    let money = |value: f64| format_currency(value, currency);
    let mut out = String::new();
    let _ = writeln!(out, "=== CURRENT FINANCIAL SNAPSHOT ===");
    let _ = writeln!(out, "Monthly Surplus / Deficit: {}", money(report.monthly_surplus));
    let _ = writeln!(out, "Total Monthly Expenses: {}", money(report.total_expenses));
    let _ = writeln!(
        out,
        "Savings Rate: {:.1}%  ({})",
        report.savings_rate_pct,
        report.savings_status.description(policy)
    );
    let _ = writeln!(out, "Debt-to-Income Ratio: {:.1}%", report.dti_pct);
    let _ = writeln!(out, "Total Outstanding Debt: {}", money(report.total_debt));
    let _ = write!(out, "Financial Health Score: {} / 100", report.health_score);

    if !report.expense_ratios.is_empty() {
        let _ = write!(out, "\n\nExpense Breakdown (% of income):");
        for ratio in &report.expense_ratios {
            let _ = write!(out, "\n  • {}: {:.1}%", ratio.category, ratio.pct);
        }
    }

    // A projection that ends at zero carries nothing worth telling the advisor.
    if let Some(projected) = report.projected_portfolio.filter(|v| *v != 0.0) {
        let _ = write!(out, "\n\nProjected Portfolio Value: {}", money(projected));
        let _ = write!(
            out,
            "\n  Total Contributions: {}",
            money(report.total_contributions.unwrap_or(0.0))
        );
        let _ = write!(
            out,
            "\n  Total Returns: {}",
            money(report.total_returns.unwrap_or(0.0))
        );
    }

    out
}
