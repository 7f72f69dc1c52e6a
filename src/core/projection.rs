use super::error::{EngineError, Result, ensure_finite};
use super::format::round_money;
use super::types::{InvestmentParameters, ProjectionRecord};

/// Year-by-year value of an investment compounded monthly, with an optional
/// contribution added at the end of every month.
///
/// Yields `years + 1` records; record 0 is the starting principal.
pub fn project_investment_growth(params: &InvestmentParameters) -> Result<Vec<ProjectionRecord>> {
    if params.years == 0 {
        return Err(EngineError::ZeroHorizon);
    }
    let principal = ensure_finite("principal", params.principal)?;
    let annual_return_pct = ensure_finite("annual_return_pct", params.annual_return_pct)?;
    let contribution = ensure_finite("monthly_contribution", params.monthly_contribution)?;

    let r_monthly = annual_return_pct / 100.0 / 12.0;
    let mut records = Vec::with_capacity(params.years as usize + 1);
    records.push(ProjectionRecord {
        year: 0,
        total_value: principal,
        contributions: principal,
        returns: 0.0,
    });

    let mut balance = principal;
    let mut contributed = principal;
    for year in 1..=params.years {
        for _ in 0..12 {
            balance = balance * (1.0 + r_monthly) + contribution;
            contributed += contribution;
        }
        records.push(ProjectionRecord {
            year,
            total_value: round_money(balance),
            contributions: round_money(contributed),
            returns: round_money(balance - contributed),
        });
    }

    Ok(records)
}
