//! Order validation
//!
//! Validators collect every `(path, reason)` pair they find instead of
//! stopping at the first one.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::orders::payload::OrderPayload;

/// `None` only if the pattern fails to compile, which rejects every address.
static EMAIL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$").ok()
});

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Dotted path of the offending field, e.g. `items.0.quantity`.
    pub path: String,

    /// What is wrong with it.
    pub reason: String,
}

/// Every constraint a value violated, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed: {}", join_issues(.issues))]
pub struct ValidationError {
    issues: Vec<ValidationIssue>,
}

impl ValidationError {
    /// The individual issues.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Whether any issue refers to `path`.
    pub fn mentions(&self, path: &str) -> bool {
        self.issues.iter().any(|issue| issue.path == path)
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.path, issue.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Whether `email` looks like an email address.
pub fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.')
        && !email.contains("..")
        && EMAIL.as_ref().is_some_and(|pattern| pattern.is_match(email))
}

/// Accumulates issues while a value is checked.
#[derive(Debug, Default)]
pub(crate) struct Issues {
    issues: Vec<ValidationIssue>,
}

impl Issues {
    pub(crate) fn push(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.issues.push(ValidationIssue {
            path: path.into(),
            reason: reason.into(),
        });
    }

    pub(crate) fn required(&mut self, path: &str, value: &str, reason: &str) {
        if value.trim().is_empty() {
            self.push(path, reason);
        }
    }

    pub(crate) fn email(&mut self, path: &str, value: &str, reason: &str) {
        if !is_valid_email(value) {
            self.push(path, reason);
        }
    }

    pub(crate) fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.issues.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError {
                issues: self.issues,
            })
        }
    }
}

/// Check a built payload as a whole, defaulted fields included.
///
/// # Errors
///
/// Returns a [`ValidationError`] listing every violated field.
pub fn validate_payload(payload: OrderPayload) -> Result<OrderPayload, ValidationError> {
    const REQUIRED: &str = "Required";

    let mut issues = Issues::default();

    issues.required("firstName", &payload.first_name, REQUIRED);
    issues.required("lastName", &payload.last_name, REQUIRED);
    issues.email("email", &payload.email, "Invalid email address");
    issues.required("phone", &payload.phone, REQUIRED);
    issues.required("nid", &payload.nid, REQUIRED);
    issues.required("street", &payload.street, REQUIRED);
    issues.required("city", &payload.city, REQUIRED);
    issues.required("country", &payload.country, REQUIRED);
    issues.required("postCode", &payload.post_code, REQUIRED);

    if payload.items.is_empty() {
        issues.push("items", "Cart must have at least one item");
    }

    for (index, line) in payload.items.iter().enumerate() {
        issues.required(&format!("items.{index}.documentId"), &line.product_id, REQUIRED);

        if line.quantity == 0 {
            issues.push(
                format!("items.{index}.quantity"),
                "Quantity must be greater than 0",
            );
        }

        issues.required(&format!("items.{index}.color"), &line.color, REQUIRED);
    }

    issues.finish(payload)
}

#[cfg(test)]
mod tests {
    use crate::orders::payload::{Delivery, OrderLine};

    use super::*;

    #[test]
    fn email_pattern_compiles() {
        assert!(EMAIL.is_some(), "email pattern should compile");
    }

    fn payload() -> OrderPayload {
        OrderPayload {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "0000000000".to_string(),
            nid: "N/A".to_string(),
            street: "12 Elm St".to_string(),
            city: "Port Louis".to_string(),
            country: "Mauritius".to_string(),
            state: None,
            post_code: "90210".to_string(),
            delivery: Delivery::Free,
            items: vec![OrderLine {
                product_id: "prod-001".to_string(),
                quantity: 1,
                color: "default".to_string(),
            }],
        }
    }

    #[test]
    fn valid_payload_passes_through() {
        let valid = payload();

        assert_eq!(validate_payload(valid.clone()), Ok(valid));
    }

    #[test]
    fn zero_quantity_names_the_line() {
        let mut invalid = payload();
        invalid.items.push(OrderLine {
            product_id: "prod-002".to_string(),
            quantity: 0,
            color: "Honey".to_string(),
        });

        let Err(error) = validate_payload(invalid) else {
            panic!("zero quantity should fail validation");
        };

        assert!(error.mentions("items.1.quantity"), "{error}");
        assert!(!error.mentions("items.0.quantity"), "{error}");
    }

    #[test]
    fn empty_items_fail_with_cart_message() {
        let mut invalid = payload();
        invalid.items.clear();

        let Err(error) = validate_payload(invalid) else {
            panic!("empty items should fail validation");
        };

        assert_eq!(
            error.to_string(),
            "Validation failed: items: Cart must have at least one item"
        );
    }

    #[test]
    fn every_violation_is_reported_in_one_message() {
        let mut invalid = payload();
        invalid.email = "not-an-email".to_string();
        invalid.phone = String::new();
        invalid.items.clear();

        let Err(error) = validate_payload(invalid) else {
            panic!("payload should fail validation");
        };

        assert_eq!(error.issues().len(), 3);
        assert_eq!(
            error.to_string(),
            "Validation failed: email: Invalid email address; phone: Required; items: Cart must have at least one item"
        );
    }

    #[test]
    fn whitespace_only_is_missing() {
        let mut invalid = payload();
        invalid.city = "   ".to_string();

        assert!(validate_payload(invalid).is_err_and(|error| error.mentions("city")));
    }

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("first.last+tag@shop.example.mu"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada.example.com"));
        assert!(!is_valid_email(".ada@example.com"));
        assert!(!is_valid_email("ada..lovelace@example.com"));
        assert!(!is_valid_email(""));
    }
}
