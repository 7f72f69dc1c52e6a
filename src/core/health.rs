use super::policy::ScoringPolicy;
use super::types::{HealthBand, HealthScoreInputs};

/// Composite 0-100 score from savings rate, DTI, surplus ratio and
/// investment activity. Each term is computed on its own, then the sum is
/// rounded and clamped.
pub fn score_financial_health(inputs: &HealthScoreInputs, policy: &ScoringPolicy) -> u8 {
    let savings_rate = finite_or_zero(inputs.savings_rate_pct);
    let dti = finite_or_zero(inputs.dti_pct);
    let surplus_ratio = finite_or_zero(inputs.surplus_ratio_pct);

    let savings_term = (savings_rate / policy.savings_benchmark_pct).min(1.0) * policy.savings_weight;
    let dti_term = dti_credit(dti, policy);
    let surplus_term = (surplus_ratio / policy.surplus_target_pct).min(1.0) * policy.surplus_weight;
    let investment_term = if inputs.has_investments {
        policy.investment_weight
    } else {
        0.0
    };

    let total = savings_term + dti_term + surplus_term + investment_term;
    total.round_ties_even().clamp(0.0, 100.0) as u8
}

fn dti_credit(dti: f64, policy: &ScoringPolicy) -> f64 {
    let full = policy.dti_full_credit_pct;
    let zero = policy.dti_zero_credit_pct;
    if dti <= full {
        policy.dti_weight
    } else if dti <= zero {
        policy.dti_weight * (1.0 - (dti - full) / (zero - full))
    } else {
        0.0
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

impl HealthBand {
    pub fn from_score(score: u8, policy: &ScoringPolicy) -> Self {
        if score >= policy.health_excellent_floor {
            HealthBand::Excellent
        } else if score >= policy.health_fair_floor {
            HealthBand::Fair
        } else {
            HealthBand::NeedsWork
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{any, prop_assert, prop_assert_eq, proptest};

    fn inputs(savings: f64, dti: f64, surplus: f64, invested: bool) -> HealthScoreInputs {
        HealthScoreInputs {
            savings_rate_pct: savings,
            dti_pct: dti,
            surplus_ratio_pct: surplus,
            has_investments: invested,
        }
    }

    #[test]
    fn strong_finances_score_one_hundred() {
        let score = score_financial_health(&inputs(25.0, 5.0, 25.0, true), &ScoringPolicy::default());
        assert_eq!(score, 100);
    }

    #[test]
    fn weak_finances_score_zero() {
        let score = score_financial_health(&inputs(0.0, 50.0, 0.0, false), &ScoringPolicy::default());
        assert_eq!(score, 0);
    }

    #[test]
    fn absent_inputs_score_only_the_dti_term() {
        let score = score_financial_health(&HealthScoreInputs::default(), &ScoringPolicy::default());
        assert_eq!(score, 25);
    }

    #[test]
    fn dti_credit_decays_linearly() {
        let policy = ScoringPolicy::default();
        assert_eq!(score_financial_health(&inputs(0.0, 15.0, 0.0, false), &policy), 25);
        // Halfway between 15 and 36 earns 12.5, which rounds to even.
        assert_eq!(score_financial_health(&inputs(0.0, 25.5, 0.0, false), &policy), 12);
        assert_eq!(score_financial_health(&inputs(0.0, 36.0, 0.0, false), &policy), 0);
    }

    #[test]
    fn partial_savings_and_surplus_are_prorated() {
        // 10/20 * 30 + 25 + 10/20 * 25 = 52.5, rounded half to even.
        let score = score_financial_health(&inputs(10.0, 10.0, 10.0, false), &ScoringPolicy::default());
        assert_eq!(score, 52);
    }

    #[test]
    fn investment_term_is_all_or_nothing() {
        let policy = ScoringPolicy::default();
        let without = score_financial_health(&inputs(0.0, 40.0, 0.0, false), &policy);
        let with = score_financial_health(&inputs(0.0, 40.0, 0.0, true), &policy);
        assert_eq!(with - without, 20);
    }

    #[test]
    fn deficits_clamp_at_zero() {
        let score = score_financial_health(&inputs(-80.0, 50.0, -80.0, false), &ScoringPolicy::default());
        assert_eq!(score, 0);
    }

    #[test]
    fn non_finite_inputs_count_as_zero() {
        let score = score_financial_health(
            &inputs(f64::NAN, f64::INFINITY, f64::NAN, false),
            &ScoringPolicy::default(),
        );
        assert_eq!(score, 25);
    }

    #[test]
    fn oversized_weights_still_clamp_to_one_hundred() {
        let policy = ScoringPolicy {
            investment_weight: 80.0,
            ..ScoringPolicy::default()
        };
        assert_eq!(score_financial_health(&inputs(30.0, 0.0, 30.0, true), &policy), 100);
    }

    #[test]
    fn health_band_edges() {
        let policy = ScoringPolicy::default();
        assert_eq!(HealthBand::from_score(70, &policy), HealthBand::Excellent);
        assert_eq!(HealthBand::from_score(69, &policy), HealthBand::Fair);
        assert_eq!(HealthBand::from_score(40, &policy), HealthBand::Fair);
        assert_eq!(HealthBand::from_score(39, &policy), HealthBand::NeedsWork);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(128))]

        #[test]
        fn prop_score_is_bounded(
            savings in -1_000.0f64..1_000.0,
            dti in -100.0f64..500.0,
            surplus in -1_000.0f64..1_000.0,
            invested in any::<bool>()
        ) {
            let policy = ScoringPolicy::default();
            let i = inputs(savings, dti, surplus, invested);
            let score = score_financial_health(&i, &policy);
            prop_assert!(score <= 100);
            prop_assert_eq!(score, score_financial_health(&i, &policy));
        }
    }
}
