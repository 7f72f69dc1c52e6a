use serde::{Deserialize, Serialize};

/// Upper bound for the month-valued policy horizons (100 years).
pub const MAX_HORIZON_MONTHS: u32 = 1200;

/// Benchmarks, weights and horizons used across the engine.
///
/// Every component that needs a threshold receives it from here, so a
/// different scoring policy can be swapped in without touching the math.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringPolicy {
    /// Savings rate (percent of income) treated as the healthy benchmark.
    pub savings_benchmark_pct: f64,
    /// Lowest savings rate still classed as fair.
    pub savings_fair_floor_pct: f64,
    pub savings_weight: f64,
    pub dti_weight: f64,
    pub surplus_weight: f64,
    pub investment_weight: f64,
    /// DTI at or below this earns the full DTI weight.
    pub dti_full_credit_pct: f64,
    /// DTI above this earns nothing; between the two the credit decays linearly.
    pub dti_zero_credit_pct: f64,
    /// Surplus ratio that saturates the surplus term.
    pub surplus_target_pct: f64,
    /// Month cap for the payoff simulation.
    pub simulation_horizon_months: u32,
    /// Closed-form payoff estimate reported for debts that never amortize.
    pub never_paid_months: u32,
    pub health_excellent_floor: u8,
    pub health_fair_floor: u8,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            savings_benchmark_pct: 20.0,
            savings_fair_floor_pct: 10.0,
            savings_weight: 30.0,
            dti_weight: 25.0,
            surplus_weight: 25.0,
            investment_weight: 20.0,
            dti_full_credit_pct: 15.0,
            dti_zero_credit_pct: 36.0,
            surplus_target_pct: 20.0,
            simulation_horizon_months: 360,
            never_paid_months: 999,
            health_excellent_floor: 70,
            health_fair_floor: 40,
        }
    }
}

impl ScoringPolicy {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("savingsBenchmarkPct", self.savings_benchmark_pct),
            ("surplusTargetPct", self.surplus_target_pct),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{name} must be > 0"));
            }
        }

        if !self.savings_fair_floor_pct.is_finite()
            || self.savings_fair_floor_pct > self.savings_benchmark_pct
        {
            return Err("savingsFairFloorPct must be <= savingsBenchmarkPct".to_string());
        }

        for (name, value) in [
            ("savingsWeight", self.savings_weight),
            ("dtiWeight", self.dti_weight),
            ("surplusWeight", self.surplus_weight),
            ("investmentWeight", self.investment_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be >= 0"));
            }
        }

        if !self.dti_full_credit_pct.is_finite() || self.dti_full_credit_pct < 0.0 {
            return Err("dtiFullCreditPct must be >= 0".to_string());
        }

        if !self.dti_zero_credit_pct.is_finite()
            || self.dti_zero_credit_pct <= self.dti_full_credit_pct
        {
            return Err("dtiZeroCreditPct must be > dtiFullCreditPct".to_string());
        }

        for (name, value) in [
            ("simulationHorizonMonths", self.simulation_horizon_months),
            ("neverPaidMonths", self.never_paid_months),
        ] {
            if value == 0 || value > MAX_HORIZON_MONTHS {
                return Err(format!("{name} must be between 1 and {MAX_HORIZON_MONTHS}"));
            }
        }

        if self.health_fair_floor > self.health_excellent_floor || self.health_excellent_floor > 100
        {
            return Err(
                "healthFairFloor must be <= healthExcellentFloor <= 100".to_string(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_valid() {
        assert_eq!(ScoringPolicy::default().validate(), Ok(()));
    }

    #[test]
    fn default_weights_sum_to_one_hundred() {
        let p = ScoringPolicy::default();
        let total = p.savings_weight + p.dti_weight + p.surplus_weight + p.investment_weight;
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn validate_rejects_inverted_dti_thresholds() {
        let policy = ScoringPolicy {
            dti_full_credit_pct: 40.0,
            ..ScoringPolicy::default()
        };
        let err = policy.validate().expect_err("must reject");
        assert!(err.contains("dtiZeroCreditPct"));
    }

    #[test]
    fn validate_bounds_month_horizons() {
        for (policy, field) in [
            (
                ScoringPolicy {
                    never_paid_months: 0,
                    ..ScoringPolicy::default()
                },
                "neverPaidMonths",
            ),
            (
                ScoringPolicy {
                    never_paid_months: u32::MAX,
                    ..ScoringPolicy::default()
                },
                "neverPaidMonths",
            ),
            (
                ScoringPolicy {
                    simulation_horizon_months: MAX_HORIZON_MONTHS + 1,
                    ..ScoringPolicy::default()
                },
                "simulationHorizonMonths",
            ),
        ] {
            let err = policy.validate().expect_err("must reject");
            assert!(err.contains(field), "{err}");
        }

        let longest = ScoringPolicy {
            simulation_horizon_months: MAX_HORIZON_MONTHS,
            never_paid_months: MAX_HORIZON_MONTHS,
            ..ScoringPolicy::default()
        };
        assert_eq!(longest.validate(), Ok(()));
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let policy: ScoringPolicy =
            serde_json::from_str(r#"{"savingsBenchmarkPct": 15}"#).expect("valid policy json");
        assert_eq!(policy.savings_benchmark_pct, 15.0);
        assert_eq!(policy.simulation_horizon_months, 360);
        assert_eq!(policy.never_paid_months, 999);
    }
}
