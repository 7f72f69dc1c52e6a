use tracing::debug;

use super::policy::ScoringPolicy;
use super::types::{SavingsAnalysis, SavingsStatus};

impl SavingsStatus {
    pub fn description(self, policy: &ScoringPolicy) -> String {
        let benchmark = policy.savings_benchmark_pct;
        match self {
            SavingsStatus::NoIncome => "No income reported".to_string(),
            SavingsStatus::Excellent => {
                format!("Excellent: meets or exceeds the {benchmark}% savings benchmark")
            }
            SavingsStatus::Fair => {
                format!("Fair: below the recommended {benchmark}% benchmark")
            }
            SavingsStatus::Low => {
                "Low: significantly below the recommended savings rate".to_string()
            }
        }
    }
}

/// Benchmarks `savings` (usually the monthly surplus) against income.
pub fn analyze_savings_rate(income: f64, savings: f64, policy: &ScoringPolicy) -> SavingsAnalysis {
    if income <= 0.0 {
        debug!(savings, "savings rate requested without income");
        return SavingsAnalysis {
            rate_pct: 0.0,
            status: SavingsStatus::NoIncome,
            gap_pct: 0.0,
        };
    }

    let rate_pct = savings / income * 100.0;
    let status = if rate_pct >= policy.savings_benchmark_pct {
        SavingsStatus::Excellent
    } else if rate_pct >= policy.savings_fair_floor_pct {
        SavingsStatus::Fair
    } else {
        SavingsStatus::Low
    };

    SavingsAnalysis {
        rate_pct,
        status,
        gap_pct: (policy.savings_benchmark_pct - rate_pct).max(0.0),
    }
}
