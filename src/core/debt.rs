use tracing::debug;

use super::format::round_money;
use super::policy::ScoringPolicy;
use super::types::{Debt, DebtAnalysis, DebtDetail, DtiBand, TimelineMonth};

/// Months needed to clear `balance` at a fixed `payment`, via the amortization
/// closed form.
///
/// Returns `policy.never_paid_months` when the payment does not cover the
/// monthly interest, and caps interest-bearing estimates at that value.
pub fn payoff_months(
    balance: f64,
    annual_rate_pct: f64,
    payment: f64,
    policy: &ScoringPolicy,
) -> u32 {
    if payment <= 0.0 || balance <= 0.0 {
        return 0;
    }

    let never = policy.never_paid_months;
    let r = annual_rate_pct / 100.0 / 12.0;
    if r == 0.0 {
        return (balance / payment).ceil() as u32;
    }

    let denom = payment - balance * r;
    if denom <= 0.0 {
        debug!(balance, annual_rate_pct, payment, "payment does not cover interest");
        return never;
    }

    let months = -(1.0 - balance * r / payment).ln() / (1.0 + r).ln();
    ceil_months(months, never)
}

fn ceil_months(months: f64, cap: u32) -> u32 {
    let months = months.ceil();
    if !months.is_finite() || months >= cap as f64 {
        cap
    } else {
        months.max(0.0) as u32
    }
}

/// Highest rate first. Equal rates keep their input order.
pub fn avalanche_order(debts: &[Debt]) -> Vec<Debt> {
    let mut sorted = debts.to_vec();
    sorted.sort_by(|a, b| b.annual_rate_pct.total_cmp(&a.annual_rate_pct));
    sorted
}

/// Month-by-month balances paying only the minimum on every debt.
///
/// Stops at the first month where every balance is zero, or at
/// `horizon_months`. Balances are rounded to the cent for display; the
/// simulation itself runs on unrounded values.
pub fn simulate_payoff(ordered: &[Debt], horizon_months: u32) -> Vec<TimelineMonth> {
    run_simulation(ordered, horizon_months).timeline
}

struct Simulation {
    timeline: Vec<TimelineMonth>,
    /// First month each debt's unrounded balance reached zero.
    cleared_in: Vec<Option<u32>>,
}

fn run_simulation(ordered: &[Debt], horizon_months: u32) -> Simulation {
    let rates: Vec<f64> = ordered.iter().map(Debt::monthly_rate).collect();
    let mut balances: Vec<f64> = ordered.iter().map(|d| d.balance).collect();
    let mut cleared_in: Vec<Option<u32>> = balances
        .iter()
        .map(|b| if *b <= 0.0 { Some(0) } else { None })
        .collect();
    let mut timeline = Vec::new();

    if ordered.is_empty() {
        return Simulation {
            timeline,
            cleared_in,
        };
    }

    for month in 1..=horizon_months {
        let mut all_clear = true;
        for (idx, debt) in ordered.iter().enumerate() {
            let balance = balances[idx];
            balances[idx] = (balance + balance * rates[idx] - debt.min_payment).max(0.0);
            if balances[idx] > 0.0 {
                all_clear = false;
            } else if cleared_in[idx].is_none() {
                cleared_in[idx] = Some(month);
            }
        }

        timeline.push(TimelineMonth {
            month,
            balances: balances.iter().copied().map(round_money).collect(),
        });

        if all_clear {
            break;
        }
    }

    Simulation {
        timeline,
        cleared_in,
    }
}

pub fn compute_debt_metrics(debts: &[Debt], income: f64, policy: &ScoringPolicy) -> DebtAnalysis {
    if debts.is_empty() {
        return DebtAnalysis::default();
    }

    let total_balance: f64 = debts.iter().map(|d| d.balance).sum();
    let total_min_payment: f64 = debts.iter().map(|d| d.min_payment).sum();
    let dti_pct = if income > 0.0 {
        total_min_payment / income * 100.0
    } else {
        0.0
    };

    let ordered = avalanche_order(debts);
    let Simulation {
        timeline,
        cleared_in,
    } = run_simulation(&ordered, policy.simulation_horizon_months);
    let details = ordered
        .iter()
        .zip(cleared_in)
        .map(|(d, simulated_payoff_month)| DebtDetail {
            name: d.name.clone(),
            balance: d.balance,
            annual_rate_pct: d.annual_rate_pct,
            min_payment: d.min_payment,
            payoff_months: payoff_months(d.balance, d.annual_rate_pct, d.min_payment, policy),
            simulated_payoff_month,
        })
        .collect();

    DebtAnalysis {
        dti_pct,
        total_balance,
        total_min_payment,
        details,
        timeline,
    }
}

impl DebtAnalysis {
    /// First simulated month in which the debt at `index` (in detail order)
    /// reaches zero, if it does so within the simulation horizon.
    ///
    /// This is tracked on the unrounded simulation balances, so a residual
    /// under half a cent still counts as owed even though the timeline shows
    /// `0.00`. It is not derived from the closed-form `payoff_months`; the two
    /// can disagree for debts that never amortize.
    pub fn simulated_payoff_month(&self, index: usize) -> Option<u32> {
        self.details
            .get(index)
            .and_then(|d| d.simulated_payoff_month)
    }
}

impl DtiBand {
    pub fn from_dti(dti_pct: f64, policy: &ScoringPolicy) -> Self {
        if dti_pct <= policy.dti_full_credit_pct {
            DtiBand::Healthy
        } else if dti_pct <= policy.dti_zero_credit_pct {
            DtiBand::Moderate
        } else {
            DtiBand::High
        }
    }
}
