use serde::{Deserialize, Serialize};

use super::format::round_money;

/// Upper bound on goals accepted in one request.
pub const MAX_GOALS: usize = 5;

/// Fraction of the monthly requirement the surplus must still cover for a
/// goal to count as at risk rather than out of reach.
const AT_RISK_COVERAGE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub name: String,
    pub target_amount: f64,
    pub current_savings: f64,
    pub months_remaining: u32,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalFeasibility {
    Achieved,
    Achievable,
    AtRisk,
    NotFeasible,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalAssessment {
    pub name: String,
    pub remaining: f64,
    pub months: u32,
    pub monthly_needed: f64,
    pub progress_pct: f64,
    pub feasibility: GoalFeasibility,
}

/// Compares what a goal needs per month with the household's monthly surplus.
pub fn assess_goal(goal: &SavingsGoal, monthly_surplus: f64) -> GoalAssessment {
    let remaining = goal.target_amount - goal.current_savings;
    let months = goal.months_remaining.max(1);
    let monthly_needed = if remaining > 0.0 {
        remaining / months as f64
    } else {
        0.0
    };

    let feasibility = if remaining <= 0.0 {
        GoalFeasibility::Achieved
    } else if monthly_surplus >= monthly_needed {
        GoalFeasibility::Achievable
    } else if monthly_surplus >= monthly_needed * AT_RISK_COVERAGE {
        GoalFeasibility::AtRisk
    } else {
        GoalFeasibility::NotFeasible
    };

    let progress_pct = if goal.target_amount > 0.0 {
        (goal.current_savings / goal.target_amount * 100.0).clamp(0.0, 100.0)
    } else {
        100.0
    };

    GoalAssessment {
        name: goal.name.clone(),
        remaining: round_money(remaining.max(0.0)),
        months,
        monthly_needed: round_money(monthly_needed),
        progress_pct: round_money(progress_pct),
        feasibility,
    }
}

/// Each goal is judged against the whole surplus, independently of the others.
pub fn assess_goals(goals: &[SavingsGoal], monthly_surplus: f64) -> Vec<GoalAssessment> {
    goals
        .iter()
        .map(|goal| assess_goal(goal, monthly_surplus))
        .collect()
}
