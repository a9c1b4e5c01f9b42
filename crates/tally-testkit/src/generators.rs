//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::Value;

use tally_core::{supported_kinds, CalculationCreate, OperationKind};

/// Generate a finite operand of moderate magnitude.
pub fn operand() -> impl Strategy<Value = f64> {
    -1.0e9f64..1.0e9f64
}

/// Generate a finite, non-zero operand.
pub fn nonzero_operand() -> impl Strategy<Value = f64> {
    operand().prop_filter("operand must be non-zero", |b| *b != 0.0)
}

/// Generate an OperationKind.
pub fn operation_kind() -> impl Strategy<Value = OperationKind> {
    proptest::sample::select(supported_kinds())
}

/// Generate a name that no supported kind uses.
pub fn unsupported_kind_name() -> impl Strategy<Value = String> {
    "[A-Za-z]{1,12}".prop_filter("must not be a supported kind", |name| {
        !tally_core::is_supported(name)
    })
}

/// Generate a username that satisfies the policy.
pub fn valid_username() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_]{3,50}".prop_map(String::from)
}

/// Generate a username that violates the policy.
pub fn invalid_username() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z0-9_]{0,2}",
        "[A-Za-z0-9_]{51,60}",
        "[A-Za-z0-9_]{1,10}[@ .!-][A-Za-z0-9_]{1,10}",
    ]
}

/// Generate a password that satisfies the policy.
pub fn valid_password() -> impl Strategy<Value = String> {
    ("[A-Z]", "[a-z]", "[0-9]", "[A-Za-z0-9!@#$%^&*]{5,24}")
        .prop_map(|(upper, lower, digit, rest)| format!("{rest}{lower}{digit}{upper}"))
}

/// Generate an email address of the usual shape.
pub fn email() -> impl Strategy<Value = String> {
    ("[a-z][a-z0-9._]{0,15}", "[a-z][a-z0-9]{0,15}", "(com|org|net|io)")
        .prop_map(|(local, domain, tld)| format!("{local}@{domain}.{tld}"))
}

/// Parameters for a calculation that passes validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationParams {
    pub a: f64,
    pub b: f64,
    pub kind: OperationKind,
}

impl Arbitrary for CalculationParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (operand(), operand(), nonzero_operand(), operation_kind())
            .prop_map(|(a, b, nonzero_b, kind)| CalculationParams {
                a,
                b: if kind == OperationKind::Divide { nonzero_b } else { b },
                kind,
            })
            .boxed()
    }
}

/// Build a create request, sending each operand either as a number or as
/// a numeric string.
pub fn calculation_create() -> impl Strategy<Value = (CalculationParams, CalculationCreate)> {
    (any::<CalculationParams>(), any::<bool>(), any::<bool>()).prop_map(
        |(params, a_as_string, b_as_string)| {
            let encode = |v: f64, as_string: bool| {
                if as_string {
                    Value::String(v.to_string())
                } else {
                    Value::from(v)
                }
            };
            let input = CalculationCreate {
                a: encode(params.a, a_as_string),
                b: encode(params.b, b_as_string),
                kind: params.kind.as_str().to_string(),
            };
            (params, input)
        },
    )
}
