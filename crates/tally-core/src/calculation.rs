//! Calculation records and the raw inputs that create or change them.
//!
//! A [`Calculation`] is owned optionally by a user. Its `created_at` is set
//! once by the store; `updated_at` stays `None` until the record is mutated.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::EvalError;
use crate::operation::{evaluate, OperationKind};
use crate::types::{CalculationId, UserId};

/// A persisted calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    pub id: CalculationId,
    pub a: f64,
    pub b: f64,
    #[serde(rename = "type")]
    pub kind: OperationKind,
    /// Computed result; `None` until evaluated.
    pub result: Option<f64>,
    pub user_id: Option<UserId>,
    /// Unix milliseconds.
    pub created_at: i64,
    /// Unix milliseconds, set only by mutations after creation.
    pub updated_at: Option<i64>,
}

impl Calculation {
    /// Evaluate this calculation from its stored fields.
    pub fn compute_result(&self) -> Result<f64, EvalError> {
        evaluate(self.a, self.b, self.kind)
    }

    /// Evaluate and store the result on this record.
    pub fn save_result(&mut self) -> Result<f64, EvalError> {
        let result = self.compute_result()?;
        self.result = Some(result);
        Ok(result)
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Calculation(id={}, a={:?}, b={:?}, type='{}', result=",
            self.id, self.a, self.b, self.kind
        )?;
        match self.result {
            Some(result) => write!(f, "{result:?})>"),
            None => write!(f, "None)>"),
        }
    }
}

/// A calculation ready to be inserted; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCalculation {
    pub a: f64,
    pub b: f64,
    pub kind: OperationKind,
    pub result: Option<f64>,
    pub user_id: Option<UserId>,
}

impl NewCalculation {
    /// Build an unevaluated calculation.
    pub fn new(a: f64, b: f64, kind: OperationKind) -> Self {
        Self {
            a,
            b,
            kind,
            result: None,
            user_id: None,
        }
    }

    /// Set the owning user.
    pub fn owner(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Evaluate and record the result.
    pub fn evaluated(mut self) -> Result<Self, EvalError> {
        self.result = Some(evaluate(self.a, self.b, self.kind)?);
        Ok(self)
    }
}

/// Raw calculation-create input.
///
/// Operands arrive as JSON values: numbers or numeric strings are accepted,
/// everything else is rejected during validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationCreate {
    pub a: Value,
    pub b: Value,
    #[serde(rename = "type")]
    pub kind: String,
}

impl CalculationCreate {
    /// Convenience constructor for numeric operands.
    pub fn new(a: f64, b: f64, kind: OperationKind) -> Self {
        Self {
            a: Value::from(a),
            b: Value::from(b),
            kind: kind.as_str().to_string(),
        }
    }
}

/// Raw calculation-update input. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationUpdate {
    #[serde(default)]
    pub a: Option<Value>,
    #[serde(default)]
    pub b: Option<Value>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl CalculationUpdate {
    /// Whether the update carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.a.is_none() && self.b.is_none() && self.kind.is_none()
    }
}
