//! Error types for the computation engine

use thiserror::Error;

/// Contract violations raised by the engine.
///
/// Degenerate financial situations (zero income, no debts, a debt that never
/// amortizes) are not errors; they produce defined outputs instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("investment horizon must be at least one year")]
    ZeroHorizon,

    #[error("monthly income is required for an analysis")]
    MissingIncome,

    #[error("{field} must be a finite number, got {value}")]
    NonFiniteAmount { field: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, EngineError>;

pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::NonFiniteAmount { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_passes_through_numbers() {
        assert_eq!(ensure_finite("income", 12.5), Ok(12.5));
    }

    #[test]
    fn ensure_finite_names_the_field() {
        let err = ensure_finite("principal", f64::NAN).expect_err("NaN must be rejected");
        assert!(err.to_string().starts_with("principal must be a finite number"));
    }
}
