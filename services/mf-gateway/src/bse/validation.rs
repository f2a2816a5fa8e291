//! Field-level rule helpers shared by every order type
//!
//! Each helper checks one rule and returns the violation as a
//! [`ValidationError`]. Order-type validators chain them with `?` so the
//! first failure wins.

use crate::error::{Rule, ValidationError};

/// Field must be non-blank after trimming
pub fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    required_with(field, value, format!("{field} is required"))
}

/// [`required`] reporting `message` instead of the default text
pub fn required_with(
    field: &'static str,
    value: &str,
    message: impl Into<String>,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, Rule::Required, message));
    }
    Ok(())
}

/// Field must equal one of `allowed`
pub fn one_of(field: &'static str, value: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if !allowed.contains(&value) {
        return Err(ValidationError::new(
            field,
            Rule::OneOf,
            format!("{field} must be one of {}", allowed.join(", ")),
        ));
    }
    Ok(())
}

/// Field must not exceed `max` characters
pub fn max_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    max_len_labeled(field, value, max, field)
}

/// [`max_len`] naming the field as `label` in the message
pub fn max_len_labeled(
    field: &'static str,
    value: &str,
    max: usize,
    label: &str,
) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::new(
            field,
            Rule::MaxLength,
            format!("{label} must not exceed {max} characters"),
        ));
    }
    Ok(())
}

/// `field` is mandatory while `trigger` holds `sentinel`
pub fn required_when(
    field: &'static str,
    value: &str,
    trigger: &'static str,
    trigger_value: &str,
    sentinel: &str,
) -> Result<(), ValidationError> {
    if trigger_value == sentinel && value.trim().is_empty() {
        return Err(ValidationError::new(
            field,
            Rule::RequiredWhen,
            format!("{field} is required when {trigger} is {sentinel}"),
        ));
    }
    Ok(())
}

/// Optional numeric field must be present and strictly positive
pub fn positive<T>(field: &'static str, value: Option<T>) -> Result<(), ValidationError>
where
    T: PartialOrd + Default,
{
    match value {
        Some(v) if v > T::default() => Ok(()),
        _ => Err(ValidationError::new(
            field,
            Rule::Positive,
            format!("{field} must be greater than zero"),
        )),
    }
}

/// Apply [`max_len`] to a batch of `(field, value, max)` triples in order
pub fn max_lens(checks: &[(&'static str, &str, usize)]) -> Result<(), ValidationError> {
    for (field, value, max) in checks {
        max_len(field, value, *max)?;
    }
    Ok(())
}

/// Apply [`required`] to a batch of `(field, value)` pairs in order
pub fn all_required(checks: &[(&'static str, &str)]) -> Result<(), ValidationError> {
    for (field, value) in checks {
        required(field, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", true)]
    #[case("   ", true)]
    #[case("X", false)]
    fn required_rejects_blank(#[case] value: &str, #[case] fails: bool) {
        assert_eq!(required("ClientCode", value).is_err(), fails);
    }

    #[test]
    fn required_names_the_field() {
        let err = required("SchemeCd", "").unwrap_err();
        assert_eq!(err.field, "SchemeCd");
        assert_eq!(err.rule, Rule::Required);
    }

    #[test]
    fn message_variants_keep_field_and_rule() {
        let err = required_with("user_id", " ", "USER ID SHOULD NOT BE BLANK").unwrap_err();
        assert_eq!(err.field, "user_id");
        assert_eq!(err.rule, Rule::Required);
        assert_eq!(err.message, "USER ID SHOULD NOT BE BLANK");

        let err = max_len_labeled("user_id", "123456", 5, "User ID").unwrap_err();
        assert_eq!(err.rule, Rule::MaxLength);
        assert_eq!(err.message, "User ID must not exceed 5 characters");
        assert!(max_len_labeled("user_id", "12345", 5, "User ID").is_ok());
    }

    #[test]
    fn one_of_is_case_sensitive() {
        assert!(one_of("BuySell", "P", &["P", "R"]).is_ok());
        assert!(one_of("BuySell", "p", &["P", "R"]).is_err());
    }

    #[test]
    fn max_len_counts_characters() {
        assert!(max_len("PassKey", "abcdefghij", 10).is_ok());
        assert!(max_len("PassKey", "abcdefghijk", 10).is_err());
        assert!(max_len("Remarks", "ééé", 3).is_ok());
    }

    #[rstest]
    #[case("13", "", true)]
    #[case("13", "changed plan", false)]
    #[case("07", "", false)]
    fn remarks_required_only_for_sentinel(
        #[case] code: &str,
        #[case] remarks: &str,
        #[case] fails: bool,
    ) {
        let result = required_when("remarks", remarks, "cease_bse_code", code, "13");
        assert_eq!(result.is_err(), fails);
    }

    #[test]
    fn positive_rejects_absent_and_zero() {
        assert!(positive::<f64>("installment_amount", None).is_err());
        assert!(positive("installment_amount", Some(0.0)).is_err());
        assert!(positive("no_of_installments", Some(12)).is_ok());
    }
}
