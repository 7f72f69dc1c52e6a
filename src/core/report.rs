use super::format::{round_money, round_pct};
use super::types::{
    BudgetBreakdown, DebtAnalysis, ProjectionRecord, SavingsAnalysis, SummaryReport,
};

/// Flattens the component results into the single report handed to display
/// and advisory consumers.
///
/// Without a final projection record the projection fields stay `None`,
/// which consumers read as "no investment activity".
pub fn generate_summary_report(
    budget: &BudgetBreakdown,
    savings: &SavingsAnalysis,
    debt: &DebtAnalysis,
    final_projection: Option<&ProjectionRecord>,
    health_score: u8,
) -> SummaryReport {
    SummaryReport {
        monthly_surplus: round_money(budget.surplus),
        total_expenses: round_money(budget.total_expenses),
        expense_ratios: budget.expense_ratios.clone(),
        savings_rate_pct: round_pct(savings.rate_pct),
        savings_status: savings.status,
        dti_pct: round_pct(debt.dti_pct),
        total_debt: round_money(debt.total_balance),
        health_score,
        projected_portfolio: final_projection.map(|r| r.total_value),
        total_contributions: final_projection.map(|r| r.contributions),
        total_returns: final_projection.map(|r| r.returns),
    }
}
