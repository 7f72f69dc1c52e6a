use tracing::debug;

use super::budget::calculate_budget_breakdown;
use super::debt::compute_debt_metrics;
use super::error::{EngineError, Result, ensure_finite};
use super::health::score_financial_health;
use super::policy::ScoringPolicy;
use super::projection::project_investment_growth;
use super::report::generate_summary_report;
use super::savings::analyze_savings_rate;
use super::types::{Analysis, DtiBand, HealthBand, HealthScoreInputs, Household};

/// Runs every component over one household snapshot.
///
/// Budget feeds the savings analysis (the surplus is what gets saved), and
/// the savings rate, DTI and surplus ratio feed the health score. The
/// projection is skipped entirely when no investment parameters are given.
pub fn run_analysis(household: &Household, policy: &ScoringPolicy) -> Result<Analysis> {
    let income = household.income.ok_or(EngineError::MissingIncome)?;
    let income = ensure_finite("income", income)?;
    for expense in &household.expenses {
        ensure_finite("expense amount", expense.amount)?;
    }
    for debt in &household.debts {
        ensure_finite("debt balance", debt.balance)?;
        ensure_finite("debt interest rate", debt.annual_rate_pct)?;
        ensure_finite("debt minimum payment", debt.min_payment)?;
    }

    let budget = calculate_budget_breakdown(income, &household.expenses);
    let savings = analyze_savings_rate(income, budget.surplus, policy);
    let debt = compute_debt_metrics(&household.debts, income, policy);

    let projection = match &household.investment {
        Some(params) => project_investment_growth(params)?,
        None => Vec::new(),
    };
    let has_investments = household
        .investment
        .as_ref()
        .is_some_and(|p| p.has_activity());

    let health_score = score_financial_health(
        &HealthScoreInputs {
            savings_rate_pct: savings.rate_pct,
            dti_pct: debt.dti_pct,
            surplus_ratio_pct: budget.savings_potential_pct,
            has_investments,
        },
        policy,
    );

    let report = generate_summary_report(
        &budget,
        &savings,
        &debt,
        projection.last(),
        health_score,
    );

    debug!(
        surplus = budget.surplus,
        dti = debt.dti_pct,
        debts = debt.details.len(),
        projection_years = projection.len().saturating_sub(1),
        health_score,
        "analysis complete"
    );

    Ok(Analysis {
        health_band: HealthBand::from_score(health_score, policy),
        dti_band: DtiBand::from_dti(debt.dti_pct, policy),
        budget,
        savings,
        debt,
        projection,
        health_score,
        report,
    })
}
