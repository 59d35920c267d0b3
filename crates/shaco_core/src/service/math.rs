//! Math helper: two operands, one operator, one result.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl MathOp {
    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
        }
    }
}

impl FromStr for MathOp {
    type Err = MathError;

    /// Accepts names, short names, words and symbols, case-insensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "add" | "plus" | "sum" | "+" => Ok(Self::Add),
            "subtract" | "sub" | "minus" | "-" => Ok(Self::Subtract),
            "multiply" | "mul" | "times" | "*" | "x" => Ok(Self::Multiply),
            "divide" | "div" | "over" | "/" => Ok(Self::Divide),
            other => Err(MathError::UnknownOperator(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    DivisionByZero,
    UnknownOperator(String),
    /// Result overflowed to infinity or NaN.
    NotFinite,
}

impl Display for MathError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::UnknownOperator(value) => write!(f, "unknown operator `{value}`"),
            Self::NotFinite => write!(f, "result is out of range"),
        }
    }
}

impl Error for MathError {}

/// Applies `op` to `a` and `b`.
///
/// A zero divisor (`0.0` or `-0.0`) always yields `DivisionByZero`.
pub fn calculate(op: MathOp, a: f64, b: f64) -> Result<f64, MathError> {
    let result = match op {
        MathOp::Add => a + b,
        MathOp::Subtract => a - b,
        MathOp::Multiply => a * b,
        MathOp::Divide => {
            if b == 0.0 {
                return Err(MathError::DivisionByZero);
            }
            a / b
        }
    };

    if result.is_finite() {
        Ok(result)
    } else {
        Err(MathError::NotFinite)
    }
}

/// Renders a result, dropping `.0` for integral values.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::{calculate, format_number, MathError, MathOp};

    #[test]
    fn basic_operations() {
        assert_eq!(calculate(MathOp::Add, 2.0, 3.0), Ok(5.0));
        assert_eq!(calculate(MathOp::Subtract, 2.0, 3.0), Ok(-1.0));
        assert_eq!(calculate(MathOp::Multiply, 2.5, 4.0), Ok(10.0));
        assert_eq!(calculate(MathOp::Divide, 7.0, 2.0), Ok(3.5));
    }

    #[test]
    fn zero_divisor_is_always_an_error() {
        assert_eq!(
            calculate(MathOp::Divide, 4.0, 0.0),
            Err(MathError::DivisionByZero)
        );
        assert_eq!(
            calculate(MathOp::Divide, 0.0, -0.0),
            Err(MathError::DivisionByZero)
        );
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(
            calculate(MathOp::Multiply, f64::MAX, 2.0),
            Err(MathError::NotFinite)
        );
    }

    #[test]
    fn operator_parsing() {
        assert_eq!("ADD".parse::<MathOp>(), Ok(MathOp::Add));
        assert_eq!("/".parse::<MathOp>(), Ok(MathOp::Divide));
        assert!(matches!(
            "mod".parse::<MathOp>(),
            Err(MathError::UnknownOperator(_))
        ));
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(3.5), "3.5");
        assert_eq!(format_number(-12.0), "-12");
        assert_eq!(format_number(1e20), "100000000000000000000");
    }
}
