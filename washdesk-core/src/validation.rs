//! Required-field and format checks run before any network call.

use crate::error::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

static MOBILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("Invalid mobile regex"));

/// Return an error naming the first blank field. `fields` is in form order.
pub fn first_missing(fields: &[(&str, &str)]) -> Result<(), ValidationError> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((label, _)) => Err(ValidationError::required(*label)),
        None => Ok(()),
    }
}

/// Mobile numbers: optional leading `+`, then 7 to 15 digits. Spaces and
/// dashes are ignored.
pub fn validate_mobile(label: &str, value: &str) -> Result<(), ValidationError> {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    if compact.is_empty() {
        return Err(ValidationError::required(label));
    }
    if MOBILE_RE.is_match(&compact) {
        Ok(())
    } else {
        Err(ValidationError::invalid(label, "must be 7 to 15 digits"))
    }
}

/// Parse an optional decimal amount. Blank is `None`.
pub fn parse_amount(label: &str, value: &str) -> Result<Option<f64>, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(Some(amount)),
        _ => Err(ValidationError::invalid(label, "must be a non-negative number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_missing_names_topmost_blank_field() {
        let result = first_missing(&[("Name", "Tower"), ("Location", ""), ("Amount", "")]);
        let err = result.unwrap_err();
        assert_eq!(err.field(), "Location");
        assert_eq!(err.to_string(), "Location is required");
    }

    #[test]
    fn test_first_missing_passes_complete_form() {
        assert!(first_missing(&[("Name", "Tower"), ("Location", "loc-1")]).is_ok());
    }

    #[test]
    fn test_mobile_accepts_common_formats() {
        assert!(validate_mobile("Mobile", "+971 50-123-4567").is_ok());
        assert!(validate_mobile("Mobile", "0501234567").is_ok());
    }

    #[test]
    fn test_mobile_rejects_letters_and_short_numbers() {
        assert!(validate_mobile("Mobile", "05O1234567").is_err());
        assert!(validate_mobile("Mobile", "12345").is_err());
        assert_eq!(
            validate_mobile("Mobile", " ").unwrap_err(),
            ValidationError::required("Mobile")
        );
    }

    #[test]
    fn test_amount_parsing() {
        assert_eq!(parse_amount("Amount", ""), Ok(None));
        assert_eq!(parse_amount("Amount", "12.5"), Ok(Some(12.5)));
        assert!(parse_amount("Amount", "-1").is_err());
        assert!(parse_amount("Amount", "abc").is_err());
    }
}
