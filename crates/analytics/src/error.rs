use thiserror::Error;

/// Failures raised by an individual metric calculator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculationError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    #[error("Not enough data to perform calculation: {0}")]
    InsufficientData(String),

    #[error("Arithmetic overflow while computing {0}")]
    Overflow(String),
}

impl CalculationError {
    /// True for errors caused by the input violating the listing invariants.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CalculationError::Validation(_) | CalculationError::DivisionByZero(_)
        )
    }
}
