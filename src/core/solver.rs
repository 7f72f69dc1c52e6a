use serde::{Deserialize, Serialize};

use super::debt::payoff_months;
use super::policy::ScoringPolicy;
use super::projection::project_investment_growth;
use super::types::InvestmentParameters;

pub const MAX_SOLVE_ITERATIONS: u32 = 200;
pub const MAX_CONTRIBUTION_YEARS: u32 = 100;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "goalType", rename_all = "kebab-case")]
pub enum SolveTarget {
    /// Smallest monthly contribution whose final projected value reaches
    /// `target_value`.
    #[serde(rename_all = "camelCase")]
    RequiredContribution {
        principal: f64,
        annual_return_pct: f64,
        years: u32,
        target_value: f64,
    },
    /// Smallest monthly payment that clears the debt within `max_months`.
    #[serde(rename_all = "camelCase")]
    RequiredDebtPayment {
        balance: f64,
        annual_rate_pct: f64,
        max_months: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSolveConfig {
    pub target: SolveTarget,
    pub search_min: f64,
    pub search_max: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSolveIteration {
    pub iteration: u32,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub candidate_value: f64,
    pub outcome: f64,
    pub meets_target: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSolveResult {
    pub target: SolveTarget,
    pub search_min: f64,
    pub search_max: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
    pub solved_value: Option<f64>,
    /// Final value (contribution goals) or payoff months (debt goals) at the
    /// solved value.
    pub achieved_outcome: Option<f64>,
    pub iterations: Vec<GoalSolveIteration>,
    pub converged: bool,
    pub feasible: bool,
    pub message: String,
}

/// Bisects the monthly amount between the search bounds. Both goal types are
/// monotone: a larger amount never makes the outcome worse.
pub fn solve_goal(config: GoalSolveConfig, policy: &ScoringPolicy) -> Result<GoalSolveResult, String> {
    validate_config(config, policy)?;

    let mut iterations = Vec::with_capacity(config.max_iterations as usize);
    let low_eval = evaluate_candidate(config.target, config.search_min, policy)?;
    let high_eval = evaluate_candidate(config.target, config.search_max, policy)?;

    let mut solved_value = None;
    let mut converged = false;
    let feasible;
    let message;

    if low_eval.meets_target {
        solved_value = Some(config.search_min);
        converged = true;
        feasible = true;
        message = "Already meets target at lower search bound.".to_string();
    } else if !high_eval.meets_target {
        feasible = false;
        message = "No feasible amount found within the search bounds.".to_string();
    } else {
        let mut lo = config.search_min;
        let mut hi = config.search_max;
        let mut it = 0;
        while it < config.max_iterations {
            it += 1;
            let mid = (lo + hi) * 0.5;
            let eval = evaluate_candidate(config.target, mid, policy)?;
            iterations.push(GoalSolveIteration {
                iteration: it,
                lower_bound: lo,
                upper_bound: hi,
                candidate_value: mid,
                outcome: eval.outcome,
                meets_target: eval.meets_target,
            });

            if eval.meets_target {
                hi = mid;
            } else {
                lo = mid;
            }

            if (hi - lo).abs() <= config.tolerance {
                converged = true;
                break;
            }
        }
        solved_value = Some(hi);
        feasible = true;
        message = if converged {
            match config.target {
                SolveTarget::RequiredContribution { .. } => {
                    "Solved required monthly contribution.".to_string()
                }
                SolveTarget::RequiredDebtPayment { .. } => {
                    "Solved required monthly payment.".to_string()
                }
            }
        } else {
            "Reached max iterations before tolerance was met; returning best estimate.".to_string()
        };
    }

    let achieved_outcome = match solved_value {
        Some(value) => Some(evaluate_candidate(config.target, value, policy)?.outcome),
        None => None,
    };

    Ok(GoalSolveResult {
        target: config.target,
        search_min: config.search_min,
        search_max: config.search_max,
        tolerance: config.tolerance,
        max_iterations: config.max_iterations,
        solved_value,
        achieved_outcome,
        iterations,
        converged,
        feasible,
        message,
    })
}

#[derive(Debug, Clone, Copy)]
struct CandidateEval {
    outcome: f64,
    meets_target: bool,
}

fn evaluate_candidate(
    target: SolveTarget,
    candidate_value: f64,
    policy: &ScoringPolicy,
) -> Result<CandidateEval, String> {
    match target {
        SolveTarget::RequiredContribution {
            principal,
            annual_return_pct,
            years,
            target_value,
        } => {
            let records = project_investment_growth(&InvestmentParameters {
                principal,
                annual_return_pct,
                years,
                monthly_contribution: candidate_value.max(0.0),
            })
            .map_err(|e| e.to_string())?;
            let outcome = records.last().map(|r| r.total_value).unwrap_or(principal);
            Ok(CandidateEval {
                outcome,
                meets_target: outcome >= target_value,
            })
        }
        SolveTarget::RequiredDebtPayment {
            balance,
            annual_rate_pct,
            max_months,
        } => {
            let months = payoff_months(balance, annual_rate_pct, candidate_value, policy);
            // A zero payment reports zero months without ever paying anything.
            let meets_target = candidate_value > 0.0 && months <= max_months;
            Ok(CandidateEval {
                outcome: months as f64,
                meets_target,
            })
        }
    }
}

fn validate_config(config: GoalSolveConfig, policy: &ScoringPolicy) -> Result<(), String> {
    policy.validate().map_err(|e| format!("invalid policy: {e}"))?;

    match config.target {
        SolveTarget::RequiredContribution {
            principal,
            annual_return_pct,
            years,
            target_value,
        } => {
            if !principal.is_finite() || principal < 0.0 {
                return Err("principal must be >= 0".to_string());
            }
            if !annual_return_pct.is_finite() {
                return Err("annual_return_pct must be finite".to_string());
            }
            if years == 0 || years > MAX_CONTRIBUTION_YEARS {
                return Err(format!(
                    "years must be between 1 and {MAX_CONTRIBUTION_YEARS}"
                ));
            }
            if !target_value.is_finite() || target_value <= 0.0 {
                return Err("target_value must be > 0".to_string());
            }
        }
        SolveTarget::RequiredDebtPayment {
            balance,
            annual_rate_pct,
            max_months,
        } => {
            if !balance.is_finite() || balance <= 0.0 {
                return Err("balance must be > 0".to_string());
            }
            if !annual_rate_pct.is_finite() || annual_rate_pct < 0.0 {
                return Err("annual_rate_pct must be >= 0".to_string());
            }
            if max_months == 0 || max_months >= policy.never_paid_months {
                return Err(format!(
                    "max_months must be between 1 and {}",
                    policy.never_paid_months.saturating_sub(1)
                ));
            }
        }
    }
    if !config.search_min.is_finite() || !config.search_max.is_finite() {
        return Err("search bounds must be finite".to_string());
    }
    if config.search_min < 0.0 {
        return Err("search_min must be >= 0".to_string());
    }
    if config.search_max <= config.search_min {
        return Err("search_max must be greater than search_min".to_string());
    }
    if !config.tolerance.is_finite() || config.tolerance <= 0.0 {
        return Err("tolerance must be > 0".to_string());
    }
    if config.max_iterations == 0 || config.max_iterations > MAX_SOLVE_ITERATIONS {
        return Err(format!(
            "max_iterations must be between 1 and {MAX_SOLVE_ITERATIONS}"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn contribution_config(target_value: f64, search_max: f64) -> GoalSolveConfig {
        GoalSolveConfig {
            target: SolveTarget::RequiredContribution {
                principal: 0.0,
                annual_return_pct: 0.0,
                years: 1,
                target_value,
            },
            search_min: 0.0,
            search_max,
            tolerance: 0.01,
            max_iterations: 64,
        }
    }

    #[test]
    fn required_contribution_solver_finds_deterministic_solution() {
        // No growth: 12 contributions must add up to 1200.
        let result = solve_goal(contribution_config(1200.0, 500.0), &ScoringPolicy::default())
            .expect("must solve");
        assert!(result.feasible);
        assert!(result.converged);
        assert_close(result.solved_value.expect("value expected"), 100.0, 0.02);
        assert!(result.achieved_outcome.expect("outcome expected") >= 1200.0);
    }

    #[test]
    fn growth_lowers_the_required_contribution() {
        let mut config = contribution_config(50_000.0, 5_000.0);
        config.target = SolveTarget::RequiredContribution {
            principal: 0.0,
            annual_return_pct: 7.0,
            years: 10,
            target_value: 50_000.0,
        };
        let result = solve_goal(config, &ScoringPolicy::default()).expect("must solve");
        let solved = result.solved_value.expect("value expected");
        // Without growth 50k over 120 months needs ~416.67.
        assert!(solved < 50_000.0 / 120.0);
        assert!(solved > 250.0);
    }

    #[test]
    fn required_contribution_solver_reports_infeasible_when_bounds_too_low() {
        let result = solve_goal(contribution_config(1200.0, 50.0), &ScoringPolicy::default())
            .expect("must return result");
        assert!(!result.feasible);
        assert!(result.solved_value.is_none());
        assert!(result.achieved_outcome.is_none());
    }

    #[test]
    fn lower_bound_already_meeting_target_short_circuits() {
        let mut config = contribution_config(1_000.0, 100.0);
        config.target = SolveTarget::RequiredContribution {
            principal: 5_000.0,
            annual_return_pct: 3.0,
            years: 2,
            target_value: 1_000.0,
        };
        let result = solve_goal(config, &ScoringPolicy::default()).expect("must solve");
        assert_eq!(result.solved_value, Some(0.0));
        assert!(result.iterations.is_empty());
    }

    #[test]
    fn required_debt_payment_clears_within_budget() {
        let policy = ScoringPolicy::default();
        let config = GoalSolveConfig {
            target: SolveTarget::RequiredDebtPayment {
                balance: 1_200.0,
                annual_rate_pct: 0.0,
                max_months: 12,
            },
            search_min: 0.0,
            search_max: 1_200.0,
            tolerance: 0.01,
            max_iterations: 64,
        };
        let result = solve_goal(config, &policy).expect("must solve");
        let payment = result.solved_value.expect("value expected");
        assert_close(payment, 100.0, 0.02);
        assert!(payoff_months(1_200.0, 0.0, payment, &policy) <= 12);
    }

    #[test]
    fn required_debt_payment_must_beat_interest() {
        let policy = ScoringPolicy::default();
        let config = GoalSolveConfig {
            target: SolveTarget::RequiredDebtPayment {
                balance: 5_000.0,
                annual_rate_pct: 18.0,
                max_months: 24,
            },
            search_min: 0.0,
            search_max: 5_000.0,
            tolerance: 0.01,
            max_iterations: 64,
        };
        let result = solve_goal(config, &policy).expect("must solve");
        let payment = result.solved_value.expect("value expected");
        // Interest alone is 75/month; clearing in two years needs far more.
        assert!(payment > 5_000.0 / 24.0);
        assert!(payoff_months(5_000.0, 18.0, payment, &policy) <= 24);
        assert!(payoff_months(5_000.0, 18.0, payment - 1.0, &policy) > 24);
    }

    #[test]
    fn validate_config_rejects_inverted_bounds() {
        let mut config = contribution_config(1200.0, 500.0);
        config.search_max = 0.0;
        let err = solve_goal(config, &ScoringPolicy::default()).expect_err("must reject");
        assert!(err.contains("search_max"));
    }

    #[test]
    fn validate_config_rejects_months_at_sentinel() {
        let config = GoalSolveConfig {
            target: SolveTarget::RequiredDebtPayment {
                balance: 100.0,
                annual_rate_pct: 5.0,
                max_months: 999,
            },
            search_min: 0.0,
            search_max: 100.0,
            tolerance: 0.01,
            max_iterations: 10,
        };
        let err = solve_goal(config, &ScoringPolicy::default()).expect_err("must reject");
        assert!(err.contains("max_months"));
    }

    #[test]
    fn validate_config_rejects_zero_sentinel_policy() {
        let policy = ScoringPolicy {
            never_paid_months: 0,
            ..ScoringPolicy::default()
        };
        let config = GoalSolveConfig {
            target: SolveTarget::RequiredDebtPayment {
                balance: 900.0,
                annual_rate_pct: 12.0,
                max_months: 6,
            },
            search_min: 0.0,
            search_max: 1800.0,
            tolerance: 0.01,
            max_iterations: 100,
        };
        let err = solve_goal(config, &policy).expect_err("must reject");
        assert!(err.contains("neverPaidMonths"), "{err}");
    }

    #[test]
    fn validate_config_bounds_iterations_and_years() {
        let mut config = contribution_config(1200.0, 500.0);
        config.max_iterations = 4_000_000_000;
        let err = solve_goal(config, &ScoringPolicy::default()).expect_err("must reject");
        assert!(err.contains("max_iterations"), "{err}");

        config.max_iterations = MAX_SOLVE_ITERATIONS;
        assert!(solve_goal(config, &ScoringPolicy::default()).is_ok());

        config.target = SolveTarget::RequiredContribution {
            principal: 0.0,
            annual_return_pct: 5.0,
            years: u32::MAX,
            target_value: 1200.0,
        };
        let err = solve_goal(config, &ScoringPolicy::default()).expect_err("must reject");
        assert!(err.contains("years"), "{err}");
    }

    #[test]
    fn solve_target_reads_tagged_json() {
        let target: SolveTarget = serde_json::from_str(
            r#"{"goalType":"required-debt-payment","balance":900,"annualRatePct":12,"maxMonths":6}"#,
        )
        .expect("valid json");
        assert_eq!(
            target,
            SolveTarget::RequiredDebtPayment {
                balance: 900.0,
                annual_rate_pct: 12.0,
                max_months: 6,
            }
        );
    }
}
