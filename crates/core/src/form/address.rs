//! The address form shared by every "what is their address" page.
//!
//! One page collects an address in several steps, and the submitted `action`
//! says which step the user is on:
//!
//! ```text
//! (initial) ─┬─ postcode ─ postcode-lookup ─ postcode-select ─ manual ─▶ saved
//!            ├─ manual ────────────────────────────────────────────────▶ saved
//!            └─ reuse ─ reuse-select ──────────────────────────────────▶ saved
//! ```

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Address, DEFAULT_COUNTRY, PostcodeProblem, PostcodeRule, normalise_postcode};
use crate::validation::{FieldError, ValidationErrors};

/// Maximum length of each of the three address lines.
pub const ADDRESS_LINE_MAX_LENGTH: usize = 50;

/// The step of the address page a submission belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressAction {
    /// Nothing chosen yet.
    #[default]
    Initial,
    /// Editable address fields.
    Manual,
    /// Asking for a postcode to look up.
    Postcode,
    /// Postcode submitted; a list of matching addresses is shown.
    PostcodeLookup,
    /// An address chosen from the lookup results.
    PostcodeSelect,
    /// A list of addresses already on the LPA is shown.
    Reuse,
    /// An address chosen from those already on the LPA.
    ReuseSelect,
}

impl AddressAction {
    /// The tag used in the `action` form field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "",
            Self::Manual => "manual",
            Self::Postcode => "postcode",
            Self::PostcodeLookup => "postcode-lookup",
            Self::PostcodeSelect => "postcode-select",
            Self::Reuse => "reuse",
            Self::ReuseSelect => "reuse-select",
        }
    }
}

impl fmt::Display for AddressAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An `action` value that is not one of the address page's steps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown address action: {0:?}")]
pub struct UnknownAction(pub String);

impl FromStr for AddressAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(Self::Initial),
            "manual" => Ok(Self::Manual),
            "postcode" => Ok(Self::Postcode),
            "postcode-lookup" => Ok(Self::PostcodeLookup),
            "postcode-select" => Ok(Self::PostcodeSelect),
            "reuse" => Ok(Self::Reuse),
            "reuse-select" => Ok(Self::ReuseSelect),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// HTML field names used by the address form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddressFieldNames {
    pub action: &'static str,
    pub line1: &'static str,
    pub line2: &'static str,
    pub line3: &'static str,
    pub town_or_city: &'static str,
    pub postcode: &'static str,
    pub lookup_postcode: &'static str,
    pub select_address: &'static str,
}

/// The address form's field names.
pub const FIELD_NAMES: AddressFieldNames = AddressFieldNames {
    action: "action",
    line1: "address-line-1",
    line2: "address-line-2",
    line3: "address-line-3",
    town_or_city: "address-town",
    postcode: "address-postcode",
    lookup_postcode: "lookup-postcode",
    select_address: "select-address",
};

/// The raw body of an address form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AddressFormInput {
    pub action: String,
    #[serde(rename = "address-line-1")]
    pub line1: String,
    #[serde(rename = "address-line-2")]
    pub line2: String,
    #[serde(rename = "address-line-3")]
    pub line3: String,
    #[serde(rename = "address-town")]
    pub town_or_city: String,
    #[serde(rename = "address-postcode")]
    pub postcode: String,
    #[serde(rename = "lookup-postcode")]
    pub lookup_postcode: String,
    #[serde(rename = "select-address")]
    pub select_address: String,
}

/// Which wording the form's error messages use.
///
/// Pages asking for the donor's own address say "your postcode"; pages about
/// someone else say "a postcode".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressLabels {
    #[default]
    Theirs,
    Yours,
}

impl AddressLabels {
    const fn pick(self, theirs: &'static str, yours: &'static str) -> &'static str {
        match self {
            Self::Theirs => theirs,
            Self::Yours => yours,
        }
    }

    #[must_use]
    pub const fn postcode(self) -> &'static str {
        self.pick("aPostcode", "yourPostcode")
    }

    #[must_use]
    pub const fn address_from_list(self) -> &'static str {
        self.pick("anAddressFromTheList", "yourAddressFromTheList")
    }

    #[must_use]
    pub const fn no_addresses_found(self) -> &'static str {
        self.pick("noAddressesFound", "noYourAddressesFound")
    }

    const fn line1(self) -> &'static str {
        self.pick("addressLine1", "addressLine1OfYourAddress")
    }

    const fn line2(self) -> &'static str {
        self.pick("addressLine2Label", "addressLine2OfYourAddress")
    }

    const fn line3(self) -> &'static str {
        self.pick("addressLine3Label", "addressLine3OfYourAddress")
    }

    const fn town_or_city(self) -> &'static str {
        self.pick("townOrCity", "yourTownOrCity")
    }
}

/// View model of the address form for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressForm {
    pub action: AddressAction,
    pub lookup_postcode: String,
    /// The address being edited or the one selected from a list.
    pub address: Option<Address>,
    pub field_names: AddressFieldNames,
}

impl Default for AddressForm {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressForm {
    /// An empty form offering postcode lookup or manual entry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            action: AddressAction::Initial,
            lookup_postcode: String::new(),
            address: None,
            field_names: FIELD_NAMES,
        }
    }

    /// A manual-entry form pre-filled with `address`.
    #[must_use]
    pub const fn manual(address: Address) -> Self {
        Self {
            action: AddressAction::Manual,
            lookup_postcode: String::new(),
            address: Some(address),
            field_names: FIELD_NAMES,
        }
    }

    /// Read a submitted form.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownAction`] when the `action` field is not a known step.
    pub fn read(input: &AddressFormInput) -> Result<Self, UnknownAction> {
        let action: AddressAction = input.action.parse()?;
        let mut form = Self {
            action,
            ..Self::new()
        };

        match action {
            AddressAction::Manual => {
                form.address = Some(Address {
                    line1: input.line1.trim().to_string(),
                    line2: input.line2.trim().to_string(),
                    line3: input.line3.trim().to_string(),
                    town_or_city: input.town_or_city.trim().to_string(),
                    postcode: normalise_postcode(&input.postcode),
                    country: DEFAULT_COUNTRY.to_string(),
                });
            }
            AddressAction::PostcodeLookup => {
                form.lookup_postcode = input.lookup_postcode.trim().to_string();
            }
            AddressAction::PostcodeSelect => {
                form.lookup_postcode = input.lookup_postcode.trim().to_string();
                form.address = decode_selection(&input.select_address);
            }
            AddressAction::ReuseSelect => {
                form.address = decode_selection(&input.select_address);
            }
            AddressAction::Initial | AddressAction::Postcode | AddressAction::Reuse => {}
        }

        Ok(form)
    }

    /// Validate the form for its current action.
    #[must_use]
    pub fn validate(&self, labels: AddressLabels, rule: &PostcodeRule) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        match self.action {
            AddressAction::PostcodeLookup => {
                errors.check_entered(
                    self.field_names.lookup_postcode,
                    labels.postcode(),
                    &self.lookup_postcode,
                );
            }
            AddressAction::PostcodeSelect | AddressAction::ReuseSelect => {
                // A selection missing line 1 or the town cannot be saved.
                if !self
                    .address
                    .as_ref()
                    .is_some_and(|address| address.is_complete(rule))
                {
                    errors.add(
                        self.field_names.select_address,
                        FieldError::select(labels.address_from_list()),
                    );
                }
            }
            AddressAction::Manual => {
                let address = self.address.clone().unwrap_or_default();
                self.validate_manual(&mut errors, &address, labels, rule);
            }
            AddressAction::Initial | AddressAction::Postcode | AddressAction::Reuse => {}
        }

        errors
    }

    fn validate_manual(
        &self,
        errors: &mut ValidationErrors,
        address: &Address,
        labels: AddressLabels,
        rule: &PostcodeRule,
    ) {
        let names = &self.field_names;

        errors.check_entered(names.line1, labels.line1(), &address.line1);
        errors.check_max_length(
            names.line1,
            labels.line1(),
            &address.line1,
            ADDRESS_LINE_MAX_LENGTH,
        );
        errors.check_max_length(
            names.line2,
            labels.line2(),
            &address.line2,
            ADDRESS_LINE_MAX_LENGTH,
        );
        errors.check_max_length(
            names.line3,
            labels.line3(),
            &address.line3,
            ADDRESS_LINE_MAX_LENGTH,
        );
        errors.check_entered(
            names.town_or_city,
            labels.town_or_city(),
            &address.town_or_city,
        );

        match rule.check(&address.country, &address.postcode) {
            Ok(()) => {}
            Err(PostcodeProblem::Missing) => {
                errors.add(names.postcode, FieldError::enter(labels.postcode()));
            }
            Err(PostcodeProblem::Malformed) => {
                errors.add(names.postcode, FieldError::custom("enterUkPostcode"));
            }
        }
    }
}

fn decode_selection(token: &str) -> Option<Address> {
    Address::decode(token).filter(|address| !address.is_zero())
}
