//! Operation evaluator: the closed set of arithmetic operations.
//!
//! Each [`OperationKind`] dispatches to a pure function. The evaluator
//! guards division by zero itself, so it stays safe when called outside
//! the validated request path.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EvalError;

/// The kind of arithmetic operation a calculation performs.
///
/// Wire names are `"Add"`, `"Sub"`, `"Multiply"` and `"Divide"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// `a + b`
    Add,
    /// `a - b`
    #[serde(rename = "Sub")]
    Subtract,
    /// `a * b`
    Multiply,
    /// `a / b`, with `b != 0`
    Divide,
}

/// Every supported kind, in dispatch-table order.
const SUPPORTED: [OperationKind; 4] = [
    OperationKind::Add,
    OperationKind::Subtract,
    OperationKind::Multiply,
    OperationKind::Divide,
];

type OperationFn = fn(f64, f64) -> Result<f64, EvalError>;

impl OperationKind {
    /// The wire name of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Subtract => "Sub",
            Self::Multiply => "Multiply",
            Self::Divide => "Divide",
        }
    }

    fn operation(self) -> OperationFn {
        match self {
            Self::Add => add,
            Self::Subtract => subtract,
            Self::Multiply => multiply,
            Self::Divide => divide,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SUPPORTED
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EvalError::UnsupportedOperation(s.to_string()))
    }
}

fn add(a: f64, b: f64) -> Result<f64, EvalError> {
    Ok(a + b)
}

fn subtract(a: f64, b: f64) -> Result<f64, EvalError> {
    Ok(a - b)
}

fn multiply(a: f64, b: f64) -> Result<f64, EvalError> {
    Ok(a * b)
}

fn divide(a: f64, b: f64) -> Result<f64, EvalError> {
    if b == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(a / b)
}

/// Evaluate `kind` over the operands `a` and `b`.
pub fn evaluate(a: f64, b: f64, kind: OperationKind) -> Result<f64, EvalError> {
    (kind.operation())(a, b)
}

/// Evaluate an operation given by its wire name.
///
/// Fails with [`EvalError::UnsupportedOperation`] for unknown names.
pub fn evaluate_named(a: f64, b: f64, name: &str) -> Result<f64, EvalError> {
    evaluate(a, b, name.parse()?)
}

/// All supported operation kinds.
pub fn supported_kinds() -> &'static [OperationKind] {
    &SUPPORTED
}

/// Whether `name` is the wire name of a supported operation.
pub fn is_supported(name: &str) -> bool {
    name.parse::<OperationKind>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_basic_operations() {
        assert_eq!(evaluate(10.0, 5.0, OperationKind::Add), Ok(15.0));
        assert_eq!(evaluate(10.0, 5.0, OperationKind::Subtract), Ok(5.0));
        assert_eq!(evaluate(10.0, 5.0, OperationKind::Multiply), Ok(50.0));
        assert_eq!(evaluate(10.0, 5.0, OperationKind::Divide), Ok(2.0));
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(
            evaluate(10.0, 0.0, OperationKind::Divide),
            Err(EvalError::DivisionByZero)
        );
        assert_eq!(
            evaluate(1.0, -0.0, OperationKind::Divide),
            Err(EvalError::DivisionByZero)
        );
    }

    #[test]
    fn test_unsupported_operation() {
        let result = evaluate_named(1.0, 2.0, "Power");
        assert_eq!(
            result,
            Err(EvalError::UnsupportedOperation("Power".to_string()))
        );
        // Names are case-sensitive.
        assert!(evaluate_named(1.0, 2.0, "add").is_err());
    }

    #[test]
    fn test_evaluate_named() {
        assert_eq!(evaluate_named(20.0, 8.0, "Sub"), Ok(12.0));
        assert_eq!(evaluate_named(6.0, 7.0, "Multiply"), Ok(42.0));
        assert_eq!(evaluate_named(15.0, 3.0, "Divide"), Ok(5.0));
    }

    #[test]
    fn test_supported_kinds() {
        let names: Vec<_> = supported_kinds().iter().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["Add", "Sub", "Multiply", "Divide"]);
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported("Add"));
        assert!(is_supported("Divide"));
        assert!(!is_supported("Subtract"));
        assert!(!is_supported(""));
    }

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&OperationKind::Subtract).unwrap(),
            "\"Sub\""
        );
        let kind: OperationKind = serde_json::from_str("\"Divide\"").unwrap();
        assert_eq!(kind, OperationKind::Divide);
        assert!(serde_json::from_str::<OperationKind>("\"Subtract\"").is_err());
    }

    #[test]
    fn test_floating_point_and_negatives() {
        let sum = evaluate(0.1, 0.2, OperationKind::Add).unwrap();
        assert!((sum - 0.3).abs() < 1e-10);
        assert_eq!(evaluate(-5.0, 3.0, OperationKind::Add), Ok(-2.0));
        assert_eq!(evaluate(-4.0, -2.0, OperationKind::Multiply), Ok(8.0));
        assert_eq!(evaluate(-9.0, 3.0, OperationKind::Divide), Ok(-3.0));
    }

    proptest! {
        #[test]
        fn prop_arithmetic_identities(a in -1e12f64..1e12, b in -1e12f64..1e12) {
            prop_assert_eq!(evaluate(a, b, OperationKind::Add).unwrap(), a + b);
            prop_assert_eq!(evaluate(a, b, OperationKind::Subtract).unwrap(), a - b);
            prop_assert_eq!(evaluate(a, b, OperationKind::Multiply).unwrap(), a * b);
        }

        #[test]
        fn prop_divide_by_zero_always_fails(a in proptest::num::f64::ANY) {
            prop_assert_eq!(
                evaluate(a, 0.0, OperationKind::Divide),
                Err(EvalError::DivisionByZero)
            );
        }

        #[test]
        fn prop_divide_matches_quotient(
            a in -1e6f64..1e6,
            b in prop_oneof![-1e6f64..-1e-3, 1e-3f64..1e6],
        ) {
            let result = evaluate(a, b, OperationKind::Divide).unwrap();
            prop_assert!((result - a / b).abs() <= 1e-10 * (a / b).abs().max(1.0));
        }
    }
}
