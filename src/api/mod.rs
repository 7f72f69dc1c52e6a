mod cache;

use axum::{
    Router,
    extract::{Json, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{
    Currency, Debt, EMPTY_CONTEXT, Expense, GoalAssessment, GoalSolveConfig, Household,
    InvestmentParameters, MAX_GOALS, RetirementParameters, SavingsGoal, ScoringPolicy, SolveTarget,
    assess_goals, estimate_retirement, project_investment_growth, render_financial_context,
    run_analysis, solve_goal,
};

use cache::TtlCache;

const MIN_DEBT_RATE_PCT: f64 = 0.1;
const MAX_DEBT_RATE_PCT: f64 = 30.0;
const MAX_INVESTMENT_YEARS: u32 = 100;

#[derive(Parser, Debug)]
#[command(
    name = "finhealth",
    about = "Household finance engine (budget, savings rate, debt payoff, growth projection, health score)",
    version
)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 8080)]
        port: u16,
        #[arg(
            long,
            default_value_t = 300,
            help = "Seconds to memoize /api/analyze responses; 0 disables the cache"
        )]
        cache_ttl_secs: u64,
    },
    /// Analyze one household snapshot and print the result
    Analyze(AnalyzeArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliCurrency {
    Usd,
    Eur,
    Gbp,
    Inr,
}

impl From<CliCurrency> for Currency {
    fn from(value: CliCurrency) -> Self {
        match value {
            CliCurrency::Usd => Currency::Usd,
            CliCurrency::Eur => Currency::Eur,
            CliCurrency::Gbp => Currency::Gbp,
            CliCurrency::Inr => Currency::Inr,
        }
    }
}

impl From<Currency> for CliCurrency {
    fn from(value: Currency) -> Self {
        match value {
            Currency::Usd => CliCurrency::Usd,
            Currency::Eur => CliCurrency::Eur,
            Currency::Gbp => CliCurrency::Gbp,
            Currency::Inr => CliCurrency::Inr,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Json,
    Context,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(long, help = "Monthly gross income")]
    income: Option<f64>,
    #[arg(
        long = "expense",
        value_name = "CATEGORY=AMOUNT",
        value_parser = parse_expense_arg,
        help = "Monthly expense; repeat per category"
    )]
    expenses: Vec<Expense>,
    #[arg(
        long = "debt",
        value_name = "NAME:BALANCE:RATE:PAYMENT",
        value_parser = parse_debt_arg,
        help = "Outstanding debt with annual rate in percent; repeat per debt"
    )]
    debts: Vec<Debt>,
    #[arg(long, help = "Current portfolio value; enables the growth projection")]
    principal: Option<f64>,
    #[arg(long, help = "Monthly investment contribution; enables the growth projection")]
    monthly_contribution: Option<f64>,
    #[arg(long, default_value_t = 8.0, help = "Expected annual return in percent")]
    annual_return: f64,
    #[arg(long, default_value_t = 20, help = "Projection horizon in years")]
    years: u32,
    #[arg(long, help = "Savings rate benchmark in percent")]
    savings_benchmark: Option<f64>,
    #[arg(long, help = "Month cap for the debt payoff simulation")]
    simulation_horizon_months: Option<u32>,
    #[arg(long, value_enum, default_value_t = CliCurrency::Usd)]
    currency: CliCurrency,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
    #[arg(skip)]
    policy: ScoringPolicy,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AnalyzePayload {
    income: Option<f64>,
    expenses: Option<Vec<ExpensePayload>>,
    debts: Option<Vec<DebtPayload>>,
    investment: Option<InvestmentPayload>,
    policy: Option<ScoringPolicy>,
    currency: Option<Currency>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ExpensePayload {
    category: Option<String>,
    amount: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DebtPayload {
    name: Option<String>,
    balance: Option<f64>,
    interest_rate: Option<f64>,
    min_payment: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct InvestmentPayload {
    principal: Option<f64>,
    annual_return: Option<f64>,
    years: Option<u32>,
    monthly_contribution: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RetirementPayload {
    current_age: Option<u32>,
    retirement_age: Option<u32>,
    desired_monthly_income: Option<f64>,
    guaranteed_monthly_income: Option<f64>,
    annual_return: Option<f64>,
    inflation: Option<f64>,
    current_portfolio: Option<f64>,
    investment: Option<InvestmentPayload>,
    policy: Option<ScoringPolicy>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GoalsPayload {
    monthly_surplus: Option<f64>,
    goals: Option<Vec<GoalPayload>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GoalPayload {
    name: Option<String>,
    target_amount: Option<f64>,
    current_savings: Option<f64>,
    months_remaining: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SolvePayload {
    target: Option<SolveTarget>,
    search_min: Option<f64>,
    search_max: Option<f64>,
    tolerance: Option<f64>,
    max_iterations: Option<u32>,
    policy: Option<ScoringPolicy>,
}

/// A validated analysis request. Its JSON form is the cache key.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest {
    household: Household,
    policy: ScoringPolicy,
    currency: Currency,
}

#[derive(Debug)]
struct RetirementRequest {
    params: RetirementParameters,
    current_portfolio: f64,
    policy: ScoringPolicy,
}

#[derive(Debug)]
struct GoalsRequest {
    monthly_surplus: f64,
    goals: Vec<SavingsGoal>,
}

#[derive(Debug)]
struct SolveRequest {
    config: GoalSolveConfig,
    policy: ScoringPolicy,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoalsResponse {
    monthly_surplus: f64,
    goals: Vec<GoalAssessment>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub struct AppState {
    cache: TtlCache<serde_json::Value>,
}

impl AppState {
    pub fn new(cache_ttl: Duration) -> Self {
        Self {
            cache: TtlCache::new(cache_ttl),
        }
    }
}

fn parse_expense_arg(raw: &str) -> Result<Expense, String> {
    let (category, amount) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=AMOUNT, got '{raw}'"))?;
    let amount = amount
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid amount in '{raw}': {e}"))?;
    Ok(Expense::new(category.trim(), amount))
}

fn parse_debt_arg(raw: &str) -> Result<Debt, String> {
    let parts: Vec<&str> = raw.split(':').collect();
    let [name, balance, rate, payment] = parts.as_slice() else {
        return Err(format!("expected NAME:BALANCE:RATE:PAYMENT, got '{raw}'"));
    };
    let number = |label: &str, value: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid {label} in '{raw}': {e}"))
    };
    Ok(Debt::new(
        name.trim(),
        number("balance", *balance)?,
        number("rate", *rate)?,
        number("payment", *payment)?,
    ))
}

fn build_request(args: AnalyzeArgs) -> Result<AnalyzeRequest, String> {
    let Some(income) = args.income else {
        return Err("--income is required".to_string());
    };
    if !income.is_finite() || income < 0.0 {
        return Err("--income must be >= 0".to_string());
    }

    let mut seen = HashSet::new();
    for expense in &args.expenses {
        if expense.category.trim().is_empty() {
            return Err("--expense category must not be empty".to_string());
        }
        if !expense.amount.is_finite() || expense.amount < 0.0 {
            return Err(format!("--expense {} must be >= 0", expense.category));
        }
        if !seen.insert(expense.category.as_str()) {
            return Err(format!("--expense {} is listed more than once", expense.category));
        }
    }
    if !args.expenses.iter().any(|e| e.amount > 0.0) {
        return Err("at least one --expense must be > 0".to_string());
    }

    let mut debts = Vec::with_capacity(args.debts.len());
    for debt in args.debts {
        if !debt.balance.is_finite() {
            return Err(format!("--debt {} balance must be a finite number", debt.name));
        }
        if debt.balance <= 0.0 {
            debug!(name = %debt.name, "dropping debt with no outstanding balance");
            continue;
        }
        if !(MIN_DEBT_RATE_PCT..=MAX_DEBT_RATE_PCT).contains(&debt.annual_rate_pct) {
            return Err(format!(
                "--debt {} interest rate must be between {MIN_DEBT_RATE_PCT} and {MAX_DEBT_RATE_PCT}",
                debt.name
            ));
        }
        if !debt.min_payment.is_finite() || debt.min_payment < 0.0 {
            return Err(format!("--debt {} minimum payment must be >= 0", debt.name));
        }
        debts.push(debt);
    }

    let investment = if args.principal.is_some() || args.monthly_contribution.is_some() {
        Some(build_investment(
            args.principal.unwrap_or(0.0),
            args.annual_return,
            args.years,
            args.monthly_contribution.unwrap_or(0.0),
        )?)
    } else {
        None
    };

    let mut policy = args.policy;
    if let Some(v) = args.savings_benchmark {
        policy.savings_benchmark_pct = v;
    }
    if let Some(v) = args.simulation_horizon_months {
        policy.simulation_horizon_months = v;
    }
    policy.validate().map_err(|e| format!("invalid policy: {e}"))?;

    Ok(AnalyzeRequest {
        household: Household {
            income: Some(income),
            expenses: args.expenses,
            debts,
            investment,
        },
        policy,
        currency: args.currency.into(),
    })
}

fn build_investment(
    principal: f64,
    annual_return: f64,
    years: u32,
    monthly_contribution: f64,
) -> Result<InvestmentParameters, String> {
    if !principal.is_finite() || principal < 0.0 {
        return Err("--principal must be >= 0".to_string());
    }
    if !monthly_contribution.is_finite() || monthly_contribution < 0.0 {
        return Err("--monthly-contribution must be >= 0".to_string());
    }
    if !annual_return.is_finite() {
        return Err("--annual-return must be a finite number".to_string());
    }
    if !(1..=MAX_INVESTMENT_YEARS).contains(&years) {
        return Err(format!("--years must be between 1 and {MAX_INVESTMENT_YEARS}"));
    }
    Ok(InvestmentParameters {
        principal,
        annual_return_pct: annual_return,
        years,
        monthly_contribution,
    })
}

pub fn run_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let format = args.format;
    let request = build_request(args).map_err(anyhow::Error::msg)?;
    let analysis = run_analysis(&request.household, &request.policy)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
        OutputFormat::Context => println!(
            "{}",
            render_financial_context(Some(&analysis.report), request.currency, &request.policy)
        ),
    }
    Ok(())
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze_handler))
        .route("/api/context", post(context_handler))
        .route("/api/retirement", post(retirement_handler))
        .route("/api/goals", post(goals_handler))
        .route("/api/solve", post(solve_handler))
        .route("/api/policy", get(policy_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(host: &str, port: u16, cache_ttl: Duration) -> std::io::Result<()> {
    let state = Arc::new(AppState::new(cache_ttl));
    let app = create_router(state);

    let listener = TcpListener::bind((host, port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, cache_ttl_secs = cache_ttl.as_secs(), "finhealth HTTP API listening");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn policy_handler() -> Response {
    json_response(StatusCode::OK, ScoringPolicy::default())
}

async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AnalyzePayload>,
) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return bad_request(&msg),
    };

    let key = match serde_json::to_string(&request) {
        Ok(key) => Some(key),
        Err(e) => {
            warn!(error = %e, "analysis request is not cacheable");
            None
        }
    };
    if let Some(cached) = key.as_deref().and_then(|k| state.cache.get(k)) {
        debug!("analysis served from cache");
        return json_response(StatusCode::OK, cached);
    }

    let analysis = match run_analysis(&request.household, &request.policy) {
        Ok(analysis) => analysis,
        Err(e) => return bad_request(&e.to_string()),
    };
    let body = match serde_json::to_value(&analysis) {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "failed to serialize analysis");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to serialize analysis");
        }
    };
    if let Some(key) = key {
        state.cache.insert(key, body.clone());
    }
    json_response(StatusCode::OK, body)
}

async fn context_handler(Json(payload): Json<AnalyzePayload>) -> Response {
    if payload.income.is_none() {
        return text_response(StatusCode::OK, EMPTY_CONTEXT.to_string());
    }
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return bad_request(&msg),
    };
    match run_analysis(&request.household, &request.policy) {
        Ok(analysis) => text_response(
            StatusCode::OK,
            render_financial_context(Some(&analysis.report), request.currency, &request.policy),
        ),
        Err(e) => bad_request(&e.to_string()),
    }
}

async fn retirement_handler(Json(payload): Json<RetirementPayload>) -> Response {
    let request = match retirement_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return bad_request(&msg),
    };
    match estimate_retirement(&request.params, request.current_portfolio, &request.policy) {
        Ok(estimate) => json_response(StatusCode::OK, estimate),
        Err(e) => bad_request(&e.to_string()),
    }
}

async fn goals_handler(Json(payload): Json<GoalsPayload>) -> Response {
    let request = match goals_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return bad_request(&msg),
    };
    json_response(
        StatusCode::OK,
        GoalsResponse {
            monthly_surplus: request.monthly_surplus,
            goals: assess_goals(&request.goals, request.monthly_surplus),
        },
    )
}

async fn solve_handler(Json(payload): Json<SolvePayload>) -> Response {
    let request = match solve_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return bad_request(&msg),
    };
    match solve_goal(request.config, &request.policy) {
        Ok(result) => json_response(StatusCode::OK, result),
        Err(msg) => bad_request(&msg),
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn text_response(status: StatusCode, body: String) -> Response {
    with_cache_control((
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    ))
}

fn bad_request(msg: &str) -> Response {
    info!(error = msg, "request rejected");
    error_response(StatusCode::BAD_REQUEST, msg)
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<AnalyzeRequest, String> {
    let payload = serde_json::from_str::<AnalyzePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: AnalyzePayload) -> Result<AnalyzeRequest, String> {
    build_request(analyze_args_from_payload(payload)?)
}

fn analyze_args_from_payload(payload: AnalyzePayload) -> Result<AnalyzeArgs, String> {
    let mut args = default_analyze_args_for_api();

    args.income = payload.income;
    if let Some(expenses) = payload.expenses {
        args.expenses = Vec::with_capacity(expenses.len());
        for (idx, e) in expenses.into_iter().enumerate() {
            let Some(category) = e.category else {
                return Err(format!("expenses[{idx}].category is required"));
            };
            args.expenses.push(Expense::new(category, e.amount.unwrap_or(0.0)));
        }
    }
    if let Some(debts) = payload.debts {
        args.debts = debts
            .into_iter()
            .enumerate()
            .map(|(idx, d)| {
                Debt::new(
                    d.name.unwrap_or_else(|| format!("Debt {}", idx + 1)),
                    d.balance.unwrap_or(0.0),
                    d.interest_rate.unwrap_or(0.0),
                    d.min_payment.unwrap_or(0.0),
                )
            })
            .collect();
    }
    if let Some(investment) = payload.investment {
        args.principal = Some(investment.principal.unwrap_or(0.0));
        args.monthly_contribution = Some(investment.monthly_contribution.unwrap_or(0.0));
        if let Some(v) = investment.annual_return {
            args.annual_return = v;
        }
        if let Some(v) = investment.years {
            args.years = v;
        }
    }
    if let Some(policy) = payload.policy {
        args.policy = policy;
    }
    if let Some(currency) = payload.currency {
        args.currency = currency.into();
    }

    Ok(args)
}

fn default_analyze_args_for_api() -> AnalyzeArgs {
    AnalyzeArgs {
        income: None,
        expenses: Vec::new(),
        debts: Vec::new(),
        principal: None,
        monthly_contribution: None,
        annual_return: 8.0,
        years: 20,
        savings_benchmark: None,
        simulation_horizon_months: None,
        currency: CliCurrency::Usd,
        format: OutputFormat::Json,
        policy: ScoringPolicy::default(),
    }
}

fn retirement_request_from_payload(payload: RetirementPayload) -> Result<RetirementRequest, String> {
    let current_age = payload.current_age.unwrap_or(30);
    let retirement_age = payload.retirement_age.unwrap_or(65);
    let desired = payload.desired_monthly_income.unwrap_or(4_000.0);
    let guaranteed = payload.guaranteed_monthly_income.unwrap_or(1_500.0);
    let annual_return = payload.annual_return.unwrap_or(5.0);
    let inflation = payload.inflation.unwrap_or(3.0);

    if !(18..=100).contains(&current_age) {
        return Err("currentAge must be between 18 and 100".to_string());
    }
    if retirement_age <= current_age || retirement_age > 100 {
        return Err("retirementAge must be > currentAge and <= 100".to_string());
    }
    if !desired.is_finite() || desired < 0.0 {
        return Err("desiredMonthlyIncome must be >= 0".to_string());
    }
    if !guaranteed.is_finite() || guaranteed < 0.0 {
        return Err("guaranteedMonthlyIncome must be >= 0".to_string());
    }
    if !annual_return.is_finite() {
        return Err("annualReturn must be a finite number".to_string());
    }
    if !inflation.is_finite() || inflation <= -100.0 {
        return Err("inflation must be > -100".to_string());
    }

    let current_portfolio = match (payload.current_portfolio, payload.investment) {
        (Some(value), _) => value,
        (None, Some(investment)) => {
            let params = build_investment(
                investment.principal.unwrap_or(0.0),
                investment.annual_return.unwrap_or(8.0),
                investment.years.unwrap_or(20),
                investment.monthly_contribution.unwrap_or(0.0),
            )?;
            project_investment_growth(&params)
                .map_err(|e| e.to_string())?
                .last()
                .map_or(0.0, |record| record.total_value)
        }
        (None, None) => 0.0,
    };
    if !current_portfolio.is_finite() || current_portfolio < 0.0 {
        return Err("currentPortfolio must be >= 0".to_string());
    }

    let policy = payload.policy.unwrap_or_default();
    policy.validate().map_err(|e| format!("invalid policy: {e}"))?;

    Ok(RetirementRequest {
        params: RetirementParameters {
            current_age,
            retirement_age,
            desired_monthly_income: desired,
            guaranteed_monthly_income: guaranteed,
            annual_return_pct: annual_return,
            inflation_pct: inflation,
        },
        current_portfolio,
        policy,
    })
}

fn goals_request_from_payload(payload: GoalsPayload) -> Result<GoalsRequest, String> {
    let Some(monthly_surplus) = payload.monthly_surplus else {
        return Err("monthlySurplus is required".to_string());
    };
    if !monthly_surplus.is_finite() {
        return Err("monthlySurplus must be a finite number".to_string());
    }

    let raw_goals = payload.goals.unwrap_or_default();
    if raw_goals.len() > MAX_GOALS {
        return Err(format!("at most {MAX_GOALS} goals are supported"));
    }

    let mut goals = Vec::with_capacity(raw_goals.len());
    for (idx, goal) in raw_goals.into_iter().enumerate() {
        let name = goal.name.unwrap_or_default();
        if name.trim().is_empty() {
            return Err(format!("goals[{idx}].name is required"));
        }
        let target_amount = goal.target_amount.unwrap_or(0.0);
        if !target_amount.is_finite() || target_amount <= 0.0 {
            return Err(format!("goals[{idx}].targetAmount must be > 0"));
        }
        let current_savings = goal.current_savings.unwrap_or(0.0);
        if !current_savings.is_finite() || current_savings < 0.0 {
            return Err(format!("goals[{idx}].currentSavings must be >= 0"));
        }
        let Some(months_remaining) = goal.months_remaining else {
            return Err(format!("goals[{idx}].monthsRemaining is required"));
        };
        goals.push(SavingsGoal {
            name,
            target_amount,
            current_savings,
            months_remaining,
        });
    }

    Ok(GoalsRequest {
        monthly_surplus,
        goals,
    })
}

fn solve_request_from_payload(payload: SolvePayload) -> Result<SolveRequest, String> {
    let Some(target) = payload.target else {
        return Err("target is required".to_string());
    };
    let default_max = match target {
        SolveTarget::RequiredContribution { target_value, .. } => target_value,
        SolveTarget::RequiredDebtPayment { balance, .. } => balance * 2.0,
    };
    let policy = payload.policy.unwrap_or_default();
    policy.validate().map_err(|e| format!("invalid policy: {e}"))?;

    Ok(SolveRequest {
        config: GoalSolveConfig {
            target,
            search_min: payload.search_min.unwrap_or(0.0),
            search_max: payload.search_max.unwrap_or(default_max),
            tolerance: payload.tolerance.unwrap_or(0.01),
            max_iterations: payload.max_iterations.unwrap_or(100),
        },
        policy,
    })
}
