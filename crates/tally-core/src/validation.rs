//! Input validation: operand coercion, division-by-zero rejection, and the
//! username/password/email policy.
//!
//! Validation runs before the evaluator or the store is touched, so an
//! invalid record is never constructed.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::calculation::{Calculation, CalculationCreate, CalculationUpdate};
use crate::error::ValidationError;
use crate::operation::OperationKind;
use crate::user::{LoginInput, UserCreate};

/// Minimum username length in characters.
pub const USERNAME_MIN: usize = 3;
/// Maximum username length in characters.
pub const USERNAME_MAX: usize = 50;
/// Minimum password length in characters.
pub const PASSWORD_MIN: usize = 8;
/// Maximum password length in bytes. bcrypt ignores anything past this.
pub const PASSWORD_MAX_BYTES: usize = 72;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// A validated calculation-create request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidCalculation {
    pub a: f64,
    pub b: f64,
    pub kind: OperationKind,
}

/// A validated calculation-update request.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalculationChanges {
    pub a: Option<f64>,
    pub b: Option<f64>,
    pub kind: Option<OperationKind>,
}

impl CalculationChanges {
    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.a.is_none() && self.b.is_none() && self.kind.is_none()
    }

    /// Merge these changes into a stored calculation.
    ///
    /// The merged `(kind, b)` pair is re-checked, so setting `b = 0` on a
    /// stored Divide (or switching a stored `b = 0` to Divide) is rejected.
    /// On error `calc` is left untouched. Returns whether a field changed.
    /// The stored result is not recomputed here.
    pub fn apply_to(&self, calc: &mut Calculation) -> Result<bool, ValidationError> {
        let a = self.a.unwrap_or(calc.a);
        let b = self.b.unwrap_or(calc.b);
        let kind = self.kind.unwrap_or(calc.kind);
        check_division(kind, b)?;

        let changed = a.to_bits() != calc.a.to_bits()
            || b.to_bits() != calc.b.to_bits()
            || kind != calc.kind;
        calc.a = a;
        calc.b = b;
        calc.kind = kind;
        Ok(changed)
    }
}

/// Coerce a JSON operand to a finite real number.
///
/// Accepts numbers and strings that parse as numbers. Booleans, nulls,
/// arrays, objects, non-numeric strings and non-finite values are rejected.
pub fn coerce_operand(field: &str, value: &Value) -> Result<f64, ValidationError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(ValidationError::InvalidOperand(format!(
            "{field} must be numeric"
        ))),
    }
}

fn parse_kind(name: &str) -> Result<OperationKind, ValidationError> {
    Ok(name.parse::<OperationKind>()?)
}

fn check_division(kind: OperationKind, b: f64) -> Result<(), ValidationError> {
    if kind == OperationKind::Divide && b == 0.0 {
        return Err(ValidationError::DivisionByZero);
    }
    Ok(())
}

/// Validate a calculation-create request.
pub fn validate_calculation_create(
    input: &CalculationCreate,
) -> Result<ValidCalculation, ValidationError> {
    let a = coerce_operand("a", &input.a)?;
    let b = coerce_operand("b", &input.b)?;
    let kind = parse_kind(&input.kind)?;
    check_division(kind, b)?;
    Ok(ValidCalculation { a, b, kind })
}

/// Validate a calculation-update request on its own.
///
/// Only fields present in the payload are inspected; the merged check
/// against the stored record happens in [`CalculationChanges::apply_to`].
pub fn validate_calculation_update(
    input: &CalculationUpdate,
) -> Result<CalculationChanges, ValidationError> {
    let a = input
        .a
        .as_ref()
        .map(|v| coerce_operand("a", v))
        .transpose()?;
    let b = input
        .b
        .as_ref()
        .map(|v| coerce_operand("b", v))
        .transpose()?;
    let kind = input.kind.as_deref().map(parse_kind).transpose()?;

    if let (Some(kind), Some(b)) = (kind, b) {
        check_division(kind, b)?;
    }

    Ok(CalculationChanges { a, b, kind })
}

/// Validate a username: 3 to 50 ASCII letters, digits or underscores.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let length = username.chars().count();
    if length < USERNAME_MIN {
        return Err(ValidationError::InvalidUsername(format!(
            "Username must be at least {USERNAME_MIN} characters long"
        )));
    }
    if length > USERNAME_MAX {
        return Err(ValidationError::InvalidUsername(format!(
            "Username must be less than {USERNAME_MAX} characters long"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ValidationError::InvalidUsername(
            "Username can only contain letters, numbers, and underscores".into(),
        ));
    }
    Ok(())
}

/// Validate a password: at least 8 characters and at most 72 bytes, with an
/// uppercase letter, a lowercase letter and a digit.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(ValidationError::InvalidPassword(format!(
            "Password must be at least {PASSWORD_MIN} characters long"
        )));
    }
    if password.len() > PASSWORD_MAX_BYTES {
        return Err(ValidationError::InvalidPassword(format!(
            "Password must be at most {PASSWORD_MAX_BYTES} bytes long"
        )));
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(ValidationError::InvalidPassword(
            "Password must contain at least one uppercase letter".into(),
        ));
    }
    if !password.chars().any(char::is_lowercase) {
        return Err(ValidationError::InvalidPassword(
            "Password must contain at least one lowercase letter".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidPassword(
            "Password must contain at least one digit".into(),
        ));
    }
    Ok(())
}

/// Validate the shape of an email address.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if !email_regex().is_match(email) {
        return Err(ValidationError::InvalidEmail(
            "value is not a valid email address".into(),
        ));
    }
    Ok(())
}

/// Validate a registration request.
pub fn validate_new_user(input: &UserCreate) -> Result<(), ValidationError> {
    validate_username(&input.username)?;
    validate_email(&input.email)?;
    validate_password(&input.password)?;
    Ok(())
}

/// Validate a login request. Only presence is checked; the password
/// policy applies at registration.
pub fn validate_login(input: &LoginInput) -> Result<(), ValidationError> {
    if input.username.is_empty() {
        return Err(ValidationError::MissingField("username"));
    }
    if input.password.is_empty() {
        return Err(ValidationError::MissingField("password"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CalculationId;
    use serde_json::json;

    fn create(a: Value, b: Value, kind: &str) -> CalculationCreate {
        CalculationCreate {
            a,
            b,
            kind: kind.to_string(),
        }
    }

    fn stored(b: f64, kind: OperationKind) -> Calculation {
        Calculation {
            id: CalculationId(1),
            a: 10.0,
            b,
            kind,
            result: None,
            user_id: None,
            created_at: 0,
            updated_at: None,
        }
    }

    #[test]
    fn test_valid_create() {
        let valid = validate_calculation_create(&create(json!(10), json!(5.5), "Add")).unwrap();
        assert_eq!(
            valid,
            ValidCalculation {
                a: 10.0,
                b: 5.5,
                kind: OperationKind::Add
            }
        );
    }

    #[test]
    fn test_create_string_numbers() {
        let valid =
            validate_calculation_create(&create(json!("10.5"), json!(" -2 "), "Multiply"))
                .unwrap();
        assert_eq!(valid.a, 10.5);
        assert_eq!(valid.b, -2.0);
    }

    #[test]
    fn test_create_division_by_zero() {
        let result = validate_calculation_create(&create(json!(10), json!(0), "Divide"));
        assert_eq!(result, Err(ValidationError::DivisionByZero));
        let result = validate_calculation_create(&create(json!(10), json!("0.0"), "Divide"));
        assert_eq!(result, Err(ValidationError::DivisionByZero));
    }

    #[test]
    fn test_create_zero_operands_allowed_outside_divide() {
        let valid = validate_calculation_create(&create(json!(0), json!(0), "Add")).unwrap();
        assert_eq!((valid.a, valid.b), (0.0, 0.0));
        let valid = validate_calculation_create(&create(json!(0), json!(3), "Divide")).unwrap();
        assert_eq!(valid.a, 0.0);
    }

    #[test]
    fn test_create_invalid_type() {
        let result = validate_calculation_create(&create(json!(1), json!(2), "Modulo"));
        assert_eq!(
            result,
            Err(ValidationError::UnsupportedOperation("Modulo".into()))
        );
    }

    #[test]
    fn test_invalid_operands() {
        for bad in [
            json!("abc"),
            json!(""),
            json!(true),
            json!(null),
            json!([1]),
            json!({"v": 1}),
            json!("NaN"),
            json!("inf"),
        ] {
            let result = validate_calculation_create(&create(bad.clone(), json!(1), "Add"));
            assert_eq!(
                result,
                Err(ValidationError::InvalidOperand("a must be numeric".into())),
                "expected rejection for {bad}"
            );
        }
        let result = validate_calculation_create(&create(json!(1), json!("x"), "Add"));
        assert_eq!(
            result,
            Err(ValidationError::InvalidOperand("b must be numeric".into()))
        );
    }

    #[test]
    fn test_update_valid_partial() {
        let update = CalculationUpdate {
            a: Some(json!(2)),
            ..Default::default()
        };
        let changes = validate_calculation_update(&update).unwrap();
        assert_eq!(changes.a, Some(2.0));
        assert!(changes.b.is_none());
        assert!(changes.kind.is_none());
    }

    #[test]
    fn test_update_division_by_zero_in_payload() {
        let update = CalculationUpdate {
            b: Some(json!(0)),
            kind: Some("Divide".into()),
            ..Default::default()
        };
        assert_eq!(
            validate_calculation_update(&update),
            Err(ValidationError::DivisionByZero)
        );
    }

    #[test]
    fn test_update_zero_b_alone_passes_payload_check() {
        // Without a type in the payload only the merged check can catch it.
        let update = CalculationUpdate {
            b: Some(json!(0)),
            ..Default::default()
        };
        let changes = validate_calculation_update(&update).unwrap();
        let mut calc = stored(5.0, OperationKind::Divide);
        assert_eq!(changes.apply_to(&mut calc), Err(ValidationError::DivisionByZero));
        assert_eq!(calc.b, 5.0);
    }

    #[test]
    fn test_apply_switching_to_divide_over_stored_zero() {
        let changes = CalculationChanges {
            kind: Some(OperationKind::Divide),
            ..Default::default()
        };
        let mut calc = stored(0.0, OperationKind::Add);
        assert_eq!(changes.apply_to(&mut calc), Err(ValidationError::DivisionByZero));
        assert_eq!(calc.kind, OperationKind::Add);
    }

    #[test]
    fn test_apply_merges_fields() {
        let changes = CalculationChanges {
            a: Some(2.0),
            ..Default::default()
        };
        let mut calc = stored(5.0, OperationKind::Add);
        assert_eq!(changes.apply_to(&mut calc), Ok(true));
        assert_eq!(calc.a, 2.0);
        assert_eq!(calc.b, 5.0);

        let same = CalculationChanges {
            b: Some(5.0),
            ..Default::default()
        };
        assert_eq!(same.apply_to(&mut calc), Ok(false));
        assert!(CalculationChanges::default().is_empty());
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("testuser").is_ok());
        assert!(validate_username("a_b_9").is_ok());
        assert!(validate_username(&"a".repeat(50)).is_ok());

        assert_eq!(
            validate_username("ab"),
            Err(ValidationError::InvalidUsername(
                "Username must be at least 3 characters long".into()
            ))
        );
        assert_eq!(
            validate_username(&"a".repeat(51)),
            Err(ValidationError::InvalidUsername(
                "Username must be less than 50 characters long".into()
            ))
        );
        assert_eq!(
            validate_username("test@user"),
            Err(ValidationError::InvalidUsername(
                "Username can only contain letters, numbers, and underscores".into()
            ))
        );
        assert!(validate_username("tést_user").is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("Password123!").is_ok());

        let cases = [
            ("Pass1!", "Password must be at least 8 characters long"),
            ("password123!", "Password must contain at least one uppercase letter"),
            ("PASSWORD123!", "Password must contain at least one lowercase letter"),
            ("Password!", "Password must contain at least one digit"),
        ];
        for (password, message) in cases {
            assert_eq!(
                validate_password(password),
                Err(ValidationError::InvalidPassword(message.into())),
                "password {password:?}"
            );
        }
    }

    #[test]
    fn test_password_byte_ceiling() {
        let at_limit = format!("Aa1{}", "x".repeat(PASSWORD_MAX_BYTES - 3));
        assert!(validate_password(&at_limit).is_ok());

        let over = format!("{at_limit}RealSecretTail");
        assert_eq!(
            validate_password(&over),
            Err(ValidationError::InvalidPassword(
                "Password must be at most 72 bytes long".into()
            ))
        );

        // 48 chars, 93 bytes
        let wide = format!("Aa1{}", "é".repeat(45));
        assert!(wide.chars().count() < PASSWORD_MAX_BYTES);
        assert!(validate_password(&wide).is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.co").is_ok());
        for bad in ["invalid-email", "a@b", "@example.com", "a b@example.com", "a@.com", ""] {
            assert!(
                matches!(validate_email(bad), Err(ValidationError::InvalidEmail(_))),
                "expected rejection for {bad:?}"
            );
        }
    }

    #[test]
    fn test_new_user_checks_every_field() {
        let valid = UserCreate::new("testuser", "test@example.com", "Password123!");
        assert!(validate_new_user(&valid).is_ok());
        assert!(matches!(
            validate_new_user(&UserCreate::new("testuser", "invalid-email", "Password123!")),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_new_user(&UserCreate::new("testuser", "test@example.com", "short")),
            Err(ValidationError::InvalidPassword(_))
        ));
    }

    #[test]
    fn test_login_presence() {
        assert!(validate_login(&LoginInput::new("testuser", "Password123!")).is_ok());
        assert_eq!(
            validate_login(&LoginInput::new("", "x")),
            Err(ValidationError::MissingField("username"))
        );
        assert_eq!(
            validate_login(&LoginInput::new("u", "")),
            Err(ValidationError::MissingField("password"))
        );
    }
}
