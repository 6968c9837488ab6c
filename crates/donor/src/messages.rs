//! English wording for form errors.
//!
//! The core reports errors as label keys. Here they become the sentences
//! shown in the error summary and next to each field.

use make_lpa_core::{FieldError, ValidationErrors};

/// One error as shown on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView {
    pub field: String,
    pub message: String,
}

/// The words a label key stands for.
fn label_text(label: &str) -> &str {
    match label {
        "aPostcode" => "a postcode",
        "yourPostcode" => "your postcode",
        "invalidPostcode" => "a valid postcode",
        "anAddressFromTheList" => "an address from the list",
        "yourAddressFromTheList" => "your address from the list",
        "addressLine1" => "address line 1",
        "addressLine1OfYourAddress" => "address line 1 of your address",
        "addressLine2Label" => "address line 2",
        "addressLine2OfYourAddress" => "address line 2 of your address",
        "addressLine3Label" => "address line 3",
        "addressLine3OfYourAddress" => "address line 3 of your address",
        "townOrCity" => "town or city",
        "yourTownOrCity" => "your town or city",
        "ifUsePreviousAddressOrEnterNew" => {
            "if you want to use an address already on the LPA or enter a new one"
        }
        "witnessCode" => "the code we sent",
        "enterUkPostcode" => "Enter a real postcode",
        "noAddressesFound" => {
            "We could not find any addresses for that postcode. Check the postcode is correct, or enter the address manually"
        }
        "noYourAddressesFound" => {
            "We could not find any addresses for your postcode. Check your postcode is correct, or enter your address manually"
        }
        "couldNotLookupPostcode" => {
            "We could not look up that postcode at the moment. Try again, or enter the address manually"
        }
        "witnessCodeDoesNotMatch" => "The code you entered is not correct",
        "witnessCodeExpired" => "The code you entered has expired. Request a new code",
        "tooManyWitnessCodeAttempts" => {
            "You have entered the code incorrectly too many times. You cannot try again at the moment"
        }
        other => other,
    }
}

fn upper_first(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// The sentence shown for `error`.
#[must_use]
pub fn field_error(error: &FieldError) -> String {
    match error {
        FieldError::Enter { label } => format!("Enter {}", label_text(label)),
        FieldError::Select { label } => format!("Select {}", label_text(label)),
        FieldError::Custom { label } => label_text(label).to_string(),
        FieldError::StringTooLong { label, length } => format!(
            "{} must be {length} characters or less",
            upper_first(label_text(label))
        ),
    }
}

/// Every error in page order.
#[must_use]
pub fn error_views(errors: &ValidationErrors) -> Vec<ErrorView> {
    errors
        .iter()
        .map(|(field, error)| ErrorView {
            field: field.to_string(),
            message: field_error(error),
        })
        .collect()
}
