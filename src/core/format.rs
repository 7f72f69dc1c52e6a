//! Rounding and display formatting for money and percentages.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Inr,
}

impl Currency {
    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Inr => "₹",
        }
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Money is reported to the cent.
pub fn round_money(value: f64) -> f64 {
    round_to(value, 2)
}

/// Percentages are reported to one decimal.
pub fn round_pct(value: f64) -> f64 {
    round_to(value, 1)
}

/// Formats `value` as e.g. `$12,345.67` or `-£1,200.00`.
pub fn format_currency(value: f64, currency: Currency) -> String {
    let cents = (value.abs() * 100.0).round_ties_even() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{sign}{}{}.{:02}",
        currency.symbol(),
        group_thousands(cents / 100),
        cents % 100
    )
}

/// Values strictly between 0 and 1 are read as fractions and scaled to percent.
pub fn format_percentage(value: f64, decimals: usize) -> String {
    let value = if value > 0.0 && value < 1.0 {
        value * 100.0
    } else {
        value
    };
    format!("{value:.decimals$}%")
}

fn group_thousands(whole: u64) -> String {
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_currency_groups_thousands() {
        assert_eq!(format_currency(1_234_567.891, Currency::Usd), "$1,234,567.89");
        assert_eq!(format_currency(999.5, Currency::Usd), "$999.50");
        assert_eq!(format_currency(0.0, Currency::Usd), "$0.00");
    }

    #[test]
    fn format_currency_puts_sign_before_symbol() {
        assert_eq!(format_currency(-1500.0, Currency::Gbp), "-£1,500.00");
        assert_eq!(format_currency(-0.001, Currency::Usd), "$0.00");
    }

    #[test]
    fn format_currency_uses_currency_symbol() {
        assert_eq!(format_currency(10.0, Currency::Eur), "€10.00");
        assert_eq!(format_currency(10.0, Currency::Inr), "₹10.00");
    }

    #[test]
    fn format_percentage_scales_fractions() {
        assert_eq!(format_percentage(0.25, 1), "25.0%");
        assert_eq!(format_percentage(32.0, 1), "32.0%");
        assert_eq!(format_percentage(1.0, 1), "1.0%");
        assert_eq!(format_percentage(-4.25, 2), "-4.25%");
    }

    #[test]
    fn rounding_helpers() {
        assert_eq!(round_pct(31.96), 32.0);
        assert_eq!(round_money(10.456), 10.46);
        assert_eq!(round_to(-2.25, 0), -2.0);
    }

    #[test]
    fn exact_halves_round_to_even() {
        assert_eq!(round_pct(0.25), 0.2);
        assert_eq!(round_pct(0.75), 0.8);
        assert_eq!(round_money(0.125), 0.12);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(-3.5, 0), -4.0);
        assert_eq!(format_currency(0.125, Currency::Usd), "$0.12");
    }
}
