mod budget;
mod context;
mod debt;
mod engine;
mod error;
mod format;
mod goals;
mod health;
mod policy;
mod projection;
mod report;
mod retirement;
mod savings;
mod solver;
mod types;

pub use budget::calculate_budget_breakdown;
pub use context::{EMPTY_CONTEXT, render_financial_context};
pub use debt::{avalanche_order, compute_debt_metrics, payoff_months, simulate_payoff};
pub use engine::run_analysis;
pub use error::{EngineError, Result};
pub use format::{Currency, format_currency, format_percentage, round_money, round_pct, round_to};
pub use goals::{GoalAssessment, GoalFeasibility, MAX_GOALS, SavingsGoal, assess_goal, assess_goals};
pub use health::score_financial_health;
pub use policy::{MAX_HORIZON_MONTHS, ScoringPolicy};
pub use projection::project_investment_growth;
pub use report::generate_summary_report;
pub use retirement::{RetirementEstimate, RetirementParameters, estimate_retirement};
pub use savings::analyze_savings_rate;
pub use solver::{
    GoalSolveConfig, GoalSolveIteration, GoalSolveResult, MAX_CONTRIBUTION_YEARS, MAX_SOLVE_ITERATIONS,
    SolveTarget, solve_goal,
};
pub use types::{
    Analysis, BudgetBreakdown, CategoryRatio, Debt, DebtAnalysis, DebtDetail, DtiBand, Expense,
    HealthBand, HealthScoreInputs, Household, InvestmentParameters, ProjectionRecord,
    SavingsAnalysis, SavingsStatus, SummaryReport, TimelineMonth,
};
