use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::{Result, ensure_finite};
use super::format::round_money;
use super::policy::ScoringPolicy;
use super::solver::{GoalSolveConfig, SolveTarget, solve_goal};

/// Years of spending the nest egg must cover when returns do not beat
/// inflation.
const FALLBACK_YEARS_OF_SPENDING: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementParameters {
    pub current_age: u32,
    pub retirement_age: u32,
    pub desired_monthly_income: f64,
    /// Pension, social security and other income that needs no savings.
    pub guaranteed_monthly_income: f64,
    pub annual_return_pct: f64,
    pub inflation_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementEstimate {
    pub covered: bool,
    pub years_to_retire: u32,
    pub monthly_gap: f64,
    pub real_return_pct: f64,
    pub required_nest_egg: f64,
    pub current_trajectory: f64,
    pub gap: f64,
    /// Gap spread evenly over the remaining months, ignoring growth.
    pub simple_monthly_extra: Option<f64>,
    /// Contribution that closes the gap once monthly compounding is counted.
    pub compounding_monthly_extra: Option<f64>,
}

pub fn estimate_retirement(
    params: &RetirementParameters,
    current_trajectory: f64,
    policy: &ScoringPolicy,
) -> Result<RetirementEstimate> {
    let desired = ensure_finite("desired monthly income", params.desired_monthly_income)?;
    let guaranteed = ensure_finite("guaranteed monthly income", params.guaranteed_monthly_income)?;
    let nominal = ensure_finite("annual return", params.annual_return_pct)? / 100.0;
    let inflation = ensure_finite("inflation", params.inflation_pct)? / 100.0;
    let current_trajectory = ensure_finite("current portfolio", current_trajectory)?;

    let years_to_retire = params.retirement_age.saturating_sub(params.current_age);
    let real_return = ensure_finite("real return", (1.0 + nominal) / (1.0 + inflation) - 1.0)?;
    let monthly_gap = desired - guaranteed;

    if monthly_gap <= 0.0 {
        return Ok(RetirementEstimate {
            covered: true,
            years_to_retire,
            monthly_gap: 0.0,
            real_return_pct: round_money(real_return * 100.0),
            required_nest_egg: 0.0,
            current_trajectory: round_money(current_trajectory),
            gap: 0.0,
            simple_monthly_extra: None,
            compounding_monthly_extra: None,
        });
    }

    let annual_gap = monthly_gap * 12.0;
    let required_nest_egg = if real_return > 0.0 {
        annual_gap / real_return
    } else {
        annual_gap * FALLBACK_YEARS_OF_SPENDING
    };
    let gap = (required_nest_egg - current_trajectory).max(0.0);

    let (simple_monthly_extra, compounding_monthly_extra) = if gap > 0.0 && years_to_retire > 0 {
        let simple = gap / (years_to_retire as f64 * 12.0);
        let compounding = solve_compounding_extra(
            gap,
            params.annual_return_pct,
            years_to_retire,
            simple,
            policy,
        );
        (Some(round_money(simple)), compounding.map(round_money))
    } else {
        (None, None)
    };

    debug!(
        years_to_retire,
        nest_egg = required_nest_egg,
        gap,
        "retirement estimate computed"
    );

    Ok(RetirementEstimate {
        covered: false,
        years_to_retire,
        monthly_gap: round_money(monthly_gap),
        real_return_pct: round_money(real_return * 100.0),
        required_nest_egg: round_money(required_nest_egg),
        current_trajectory: round_money(current_trajectory),
        gap: round_money(gap),
        simple_monthly_extra,
        compounding_monthly_extra,
    })
}

fn solve_compounding_extra(
    gap: f64,
    annual_return_pct: f64,
    years: u32,
    simple_extra: f64,
    policy: &ScoringPolicy,
) -> Option<f64> {
    // With a non-negative return the flat estimate always suffices, so it
    // bounds the search; negative returns get extra headroom.
    let search_max = if annual_return_pct >= 0.0 {
        simple_extra * 1.001 + 0.01
    } else {
        simple_extra * 4.0 + 0.01
    };
    let config = GoalSolveConfig {
        target: SolveTarget::RequiredContribution {
            principal: 0.0,
            annual_return_pct,
            years,
            target_value: gap,
        },
        search_min: 0.0,
        search_max,
        tolerance: 0.005,
        max_iterations: 96,
    };
    match solve_goal(config, policy) {
        Ok(result) => result.solved_value,
        Err(err) => {
            warn!(error = %err, "compounding contribution solve rejected");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> RetirementParameters {
        RetirementParameters {
            current_age: 35,
            retirement_age: 65,
            desired_monthly_income: 5_000.0,
            guaranteed_monthly_income: 2_000.0,
            annual_return_pct: 7.0,
            inflation_pct: 3.0,
        }
    }

    #[test]
    fn guaranteed_income_covering_needs_reports_covered() {
        let mut p = params();
        p.guaranteed_monthly_income = 5_000.0;
        let estimate = estimate_retirement(&p, 0.0, &ScoringPolicy::default()).expect("valid");
        assert!(estimate.covered);
        assert_eq!(estimate.required_nest_egg, 0.0);
        assert_eq!(estimate.simple_monthly_extra, None);
    }

    #[test]
    fn nest_egg_uses_real_return() {
        let estimate = estimate_retirement(&params(), 100_000.0, &ScoringPolicy::default())
            .expect("valid");
        let real = (1.0 + 7.0 / 100.0) / (1.0 + 3.0 / 100.0) - 1.0;
        assert_eq!(estimate.required_nest_egg, round_money(36_000.0 / real));
        assert_eq!(estimate.gap, round_money(36_000.0 / real - 100_000.0));
        assert_eq!(estimate.years_to_retire, 30);
        let simple = estimate.simple_monthly_extra.expect("gap is positive");
        assert_eq!(simple, round_money((36_000.0 / real - 100_000.0) / 360.0));
    }

    #[test]
    fn non_positive_real_return_falls_back_to_thirty_years() {
        let mut p = params();
        p.annual_return_pct = 2.0;
        p.inflation_pct = 4.0;
        let estimate = estimate_retirement(&p, 0.0, &ScoringPolicy::default()).expect("valid");
        assert_eq!(estimate.required_nest_egg, 36_000.0 * 30.0);
    }

    #[test]
    fn compounding_extra_is_below_the_flat_estimate() {
        let estimate = estimate_retirement(&params(), 0.0, &ScoringPolicy::default()).expect("valid");
        let simple = estimate.simple_monthly_extra.expect("simple");
        let compounding = estimate.compounding_monthly_extra.expect("compounding");
        assert!(compounding > 0.0);
        assert!(compounding < simple);
    }

    #[test]
    fn portfolio_beyond_nest_egg_leaves_no_gap() {
        let estimate = estimate_retirement(&params(), 10_000_000.0, &ScoringPolicy::default())
            .expect("valid");
        assert!(!estimate.covered);
        assert_eq!(estimate.gap, 0.0);
        assert_eq!(estimate.simple_monthly_extra, None);
        assert_eq!(estimate.compounding_monthly_extra, None);
    }

    #[test]
    fn already_retired_has_no_monthly_extra() {
        let mut p = params();
        p.current_age = 70;
        let estimate = estimate_retirement(&p, 0.0, &ScoringPolicy::default()).expect("valid");
        assert_eq!(estimate.years_to_retire, 0);
        assert!(estimate.gap > 0.0);
        assert_eq!(estimate.simple_monthly_extra, None);
    }

    #[test]
    fn inflation_of_minus_one_hundred_is_rejected() {
        let mut p = params();
        p.inflation_pct = -100.0;
        assert!(estimate_retirement(&p, 0.0, &ScoringPolicy::default()).is_err());
    }
}
