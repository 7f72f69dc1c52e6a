use super::format::round_pct;
use super::types::{BudgetBreakdown, CategoryRatio, Expense};

/// Splits `income` into expenses and surplus.
///
/// The surplus may be negative. With no income every ratio is reported as
/// zero rather than dividing by zero.
pub fn calculate_budget_breakdown(income: f64, expenses: &[Expense]) -> BudgetBreakdown {
    let total_expenses: f64 = expenses.iter().map(|e| e.amount).sum();
    let surplus = income - total_expenses;

    let (expense_ratios, savings_potential_pct) = if income > 0.0 {
        let ratios = expenses
            .iter()
            .map(|e| CategoryRatio {
                category: e.category.clone(),
                pct: round_pct(e.amount / income * 100.0),
            })
            .collect();
        (ratios, round_pct(surplus / income * 100.0))
    } else {
        let ratios = expenses
            .iter()
            .map(|e| CategoryRatio {
                category: e.category.clone(),
                pct: 0.0,
            })
            .collect();
        (ratios, 0.0)
    };

    BudgetBreakdown {
        total_expenses,
        surplus,
        expense_ratios,
        savings_potential_pct,
    }
}
