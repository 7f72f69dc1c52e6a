use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub category: String,
    pub amount: f64,
}

impl Expense {
    pub fn new(category: impl Into<String>, amount: f64) -> Self {
        Self {
            category: category.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    pub name: String,
    pub balance: f64,
    pub annual_rate_pct: f64,
    pub min_payment: f64,
}

impl Debt {
    pub fn new(name: impl Into<String>, balance: f64, annual_rate_pct: f64, min_payment: f64) -> Self {
        Self {
            name: name.into(),
            balance,
            annual_rate_pct,
            min_payment,
        }
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_pct / 100.0 / 12.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentParameters {
    pub principal: f64,
    pub annual_return_pct: f64,
    pub years: u32,
    pub monthly_contribution: f64,
}

impl InvestmentParameters {
    /// Any invested balance or recurring contribution counts as investing.
    pub fn has_activity(&self) -> bool {
        self.principal > 0.0 || self.monthly_contribution > 0.0
    }
}

/// One snapshot of a household's finances, as handed over by the boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    pub income: Option<f64>,
    pub expenses: Vec<Expense>,
    pub debts: Vec<Debt>,
    pub investment: Option<InvestmentParameters>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRatio {
    pub category: String,
    pub pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetBreakdown {
    pub total_expenses: f64,
    pub surplus: f64,
    pub expense_ratios: Vec<CategoryRatio>,
    pub savings_potential_pct: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SavingsStatus {
    NoIncome,
    Excellent,
    Fair,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsAnalysis {
    pub rate_pct: f64,
    pub status: SavingsStatus,
    pub gap_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtDetail {
    pub name: String,
    pub balance: f64,
    pub annual_rate_pct: f64,
    pub min_payment: f64,
    pub payoff_months: u32,
    /// First simulated month the balance reached zero, if within the horizon.
    pub simulated_payoff_month: Option<u32>,
}

/// Balances at the end of one simulated month, aligned with
/// [`DebtAnalysis::details`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineMonth {
    pub month: u32,
    pub balances: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtAnalysis {
    pub dti_pct: f64,
    pub total_balance: f64,
    pub total_min_payment: f64,
    pub details: Vec<DebtDetail>,
    pub timeline: Vec<TimelineMonth>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DtiBand {
    Healthy,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRecord {
    pub year: u32,
    pub total_value: f64,
    pub contributions: f64,
    pub returns: f64,
}

/// Inputs to the health score. Absent values default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HealthScoreInputs {
    pub savings_rate_pct: f64,
    pub dti_pct: f64,
    pub surplus_ratio_pct: f64,
    pub has_investments: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HealthBand {
    Excellent,
    Fair,
    NeedsWork,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub monthly_surplus: f64,
    pub total_expenses: f64,
    pub expense_ratios: Vec<CategoryRatio>,
    pub savings_rate_pct: f64,
    pub savings_status: SavingsStatus,
    pub dti_pct: f64,
    pub total_debt: f64,
    pub health_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_portfolio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_contributions: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_returns: Option<f64>,
}

impl SummaryReport {
    pub fn has_projection(&self) -> bool {
        self.projected_portfolio.is_some()
    }
}

/// Everything computed for one household snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub budget: BudgetBreakdown,
    pub savings: SavingsAnalysis,
    pub debt: DebtAnalysis,
    pub projection: Vec<ProjectionRecord>,
    pub health_score: u8,
    pub health_band: HealthBand,
    pub dti_band: DtiBand,
    pub report: SummaryReport,
}
