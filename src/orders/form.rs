//! Checkout form

use serde::{Deserialize, Serialize};

use crate::orders::validation::{Issues, ValidationError};

const DEFAULT_COUNTRY: &str = "United States";
const MIN_ZIP_CODE_LEN: usize = 5;

/// Contact and shipping details entered at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    /// Contact email.
    pub email: String,

    /// First name.
    pub first_name: String,

    /// Last name.
    pub last_name: String,

    /// Street address.
    pub address: String,

    /// Apartment, suite, etc.
    #[serde(default)]
    pub apartment: Option<String>,

    /// City.
    pub city: String,

    /// State or region.
    pub state: String,

    /// ZIP/postal code.
    pub zip_code: String,

    /// Country.
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

impl Default for CheckoutForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            address: String::new(),
            apartment: None,
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: default_country(),
        }
    }
}

impl CheckoutForm {
    /// Field checks run before the form is accepted.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] with one issue per invalid field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Issues::default();

        issues.email("email", &self.email, "Invalid email address");
        issues.required("firstName", &self.first_name, "First name is required");
        issues.required("lastName", &self.last_name, "Last name is required");
        issues.required("address", &self.address, "Address is required");
        issues.required("city", &self.city, "City is required");
        issues.required("state", &self.state, "State is required");

        if self.zip_code.trim().chars().count() < MIN_ZIP_CODE_LEN {
            issues.push("zipCode", "Invalid ZIP code");
        }

        issues.finish(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn filled() -> CheckoutForm {
        CheckoutForm {
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            address: "12 Elm St".to_string(),
            city: "Beverly Hills".to_string(),
            state: "CA".to_string(),
            zip_code: "90210".to_string(),
            ..CheckoutForm::default()
        }
    }

    #[test]
    fn default_country_is_united_states() {
        assert_eq!(CheckoutForm::default().country, "United States");
    }

    #[test]
    fn filled_form_is_valid() {
        assert_eq!(filled().validate(), Ok(()));
    }

    #[test]
    fn empty_form_reports_every_field() {
        let Err(error) = CheckoutForm::default().validate() else {
            panic!("empty form should not validate");
        };

        let paths: Vec<&str> = error.issues().iter().map(|issue| issue.path.as_str()).collect();

        assert_eq!(
            paths,
            ["email", "firstName", "lastName", "address", "city", "state", "zipCode"]
        );
    }

    #[test]
    fn short_zip_code_is_invalid() {
        let mut form = filled();
        form.zip_code = "9021".to_string();

        assert!(form.validate().is_err_and(|error| error.mentions("zipCode")));
    }

    #[test]
    fn deserialises_camel_case_with_default_country() -> TestResult {
        let form: CheckoutForm = serde_json::from_str(
            r#"{"email":"ada@example.com","firstName":"Ada","lastName":"Lovelace",
                "address":"12 Elm St","city":"Beverly Hills","state":"CA","zipCode":"90210"}"#,
        )?;

        assert_eq!(form, filled());

        Ok(())
    }
}
