//! Known inputs with their expected outcomes.
//!
//! Every implementation of the evaluator and the registration policy must
//! agree with these tables exactly (results to within 1e-10).

use tally_core::{evaluate_named, validate_new_user, EvalError, UserCreate, ValidationError};

/// Tolerance for comparing evaluated results.
pub const TOLERANCE: f64 = 1e-10;

/// A single evaluation case.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationCase {
    pub name: &'static str,
    pub a: f64,
    pub b: f64,
    /// Wire name of the operation.
    pub kind: &'static str,
    pub expected: Result<f64, EvalError>,
}

fn eval_case(
    name: &'static str,
    a: f64,
    b: f64,
    kind: &'static str,
    expected: Result<f64, EvalError>,
) -> EvaluationCase {
    EvaluationCase {
        name,
        a,
        b,
        kind,
        expected,
    }
}

/// All evaluation cases.
pub fn evaluation_cases() -> Vec<EvaluationCase> {
    vec![
        eval_case("add", 5.0, 3.0, "Add", Ok(8.0)),
        eval_case("sub", 5.0, 3.0, "Sub", Ok(2.0)),
        eval_case("multiply", 5.0, 3.0, "Multiply", Ok(15.0)),
        eval_case("divide", 6.0, 3.0, "Divide", Ok(2.0)),
        eval_case("add_fractions", 5.5, 2.5, "Add", Ok(8.0)),
        eval_case("divide_repeating", 10.0, 3.0, "Divide", Ok(3.3333333333333335)),
        eval_case("add_negative", -5.0, 3.0, "Add", Ok(-2.0)),
        eval_case("divide_negatives", -10.0, -2.0, "Divide", Ok(5.0)),
        eval_case("multiply_by_zero", 7.0, 0.0, "Multiply", Ok(0.0)),
        eval_case("divide_zero_numerator", 0.0, 4.0, "Divide", Ok(0.0)),
        eval_case(
            "divide_by_zero",
            5.0,
            0.0,
            "Divide",
            Err(EvalError::DivisionByZero),
        ),
        eval_case(
            "divide_by_negative_zero",
            5.0,
            -0.0,
            "Divide",
            Err(EvalError::DivisionByZero),
        ),
        eval_case(
            "unknown_operation",
            5.0,
            3.0,
            "InvalidOperation",
            Err(EvalError::UnsupportedOperation("InvalidOperation".into())),
        ),
        eval_case(
            "long_name_not_accepted",
            5.0,
            3.0,
            "Subtract",
            Err(EvalError::UnsupportedOperation("Subtract".into())),
        ),
    ]
}

/// Check every evaluation case, returning the first mismatch.
pub fn verify_evaluation_cases() -> Result<(), String> {
    for case in evaluation_cases() {
        let actual = evaluate_named(case.a, case.b, case.kind);
        let matches = match (&actual, &case.expected) {
            (Ok(got), Ok(want)) => (got - want).abs() < TOLERANCE,
            (Err(got), Err(want)) => got == want,
            _ => false,
        };
        if !matches {
            return Err(format!(
                "case {}: expected {:?}, got {:?}",
                case.name, case.expected, actual
            ));
        }
    }
    Ok(())
}

/// A single registration-policy case.
#[derive(Debug, Clone)]
pub struct UserPolicyCase {
    pub name: &'static str,
    pub input: UserCreate,
    pub expected: Result<(), ValidationError>,
}

fn user_case(
    name: &'static str,
    username: &str,
    email: &str,
    password: &str,
    expected: Result<(), ValidationError>,
) -> UserPolicyCase {
    UserPolicyCase {
        name,
        input: UserCreate::new(username, email, password),
        expected,
    }
}

fn bad_username(msg: &str) -> Result<(), ValidationError> {
    Err(ValidationError::InvalidUsername(msg.into()))
}

fn bad_password(msg: &str) -> Result<(), ValidationError> {
    Err(ValidationError::InvalidPassword(msg.into()))
}

/// All registration-policy cases.
pub fn user_policy_cases() -> Vec<UserPolicyCase> {
    let email = "test@example.com";
    let long_name = "a".repeat(51);
    vec![
        user_case("valid", "testuser", email, "Password123!", Ok(())),
        user_case("shortest_name", "abc", email, "Password123", Ok(())),
        user_case(
            "longest_name",
            &"a".repeat(50),
            email,
            "Password123",
            Ok(()),
        ),
        user_case(
            "name_too_short",
            "ab",
            email,
            "Password123!",
            bad_username("Username must be at least 3 characters long"),
        ),
        user_case(
            "name_too_long",
            &long_name,
            email,
            "Password123!",
            bad_username("Username must be less than 50 characters long"),
        ),
        user_case(
            "name_bad_chars",
            "test@user",
            email,
            "Password123!",
            bad_username("Username can only contain letters, numbers, and underscores"),
        ),
        user_case(
            "bad_email",
            "testuser",
            "not-an-email",
            "Password123!",
            Err(ValidationError::InvalidEmail(
                "value is not a valid email address".into(),
            )),
        ),
        user_case(
            "password_too_short",
            "testuser",
            email,
            "Pass1!",
            bad_password("Password must be at least 8 characters long"),
        ),
        user_case(
            "password_no_upper",
            "testuser",
            email,
            "password123!",
            bad_password("Password must contain at least one uppercase letter"),
        ),
        user_case(
            "password_no_lower",
            "testuser",
            email,
            "PASSWORD123!",
            bad_password("Password must contain at least one lowercase letter"),
        ),
        user_case(
            "password_no_digit",
            "testuser",
            email,
            "Password!",
            bad_password("Password must contain at least one digit"),
        ),
        user_case(
            "password_over_72_bytes",
            "testuser",
            email,
            &format!("Aa1{}RealSecretTail", "x".repeat(69)),
            bad_password("Password must be at most 72 bytes long"),
        ),
    ]
}

/// Check every registration-policy case, returning the first mismatch.
pub fn verify_user_policy_cases() -> Result<(), String> {
    for case in user_policy_cases() {
        let actual = validate_new_user(&case.input);
        if actual != case.expected {
            return Err(format!(
                "case {}: expected {:?}, got {:?}",
                case.name, case.expected, actual
            ));
        }
    }
    Ok(())
}
