//! Postal address type.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::postcode::PostcodeRule;

/// Country code given to addresses entered manually or found by postcode lookup.
pub const DEFAULT_COUNTRY: &str = "GB";

/// A postal address belonging to one of the actors on an LPA.
///
/// Every field is free text and may be empty. `country` is an ISO-3166
/// alpha-2 code; addresses entered through the address pages are always `GB`.
///
/// ## Selection tokens
///
/// Addresses offered in a list (postcode results, reusable addresses) are
/// submitted back as an opaque token produced by [`Address::encode`]. The
/// token is JSON with a fixed field order, so an address always encodes to
/// the same token and [`Address::decode`] gives back an identical value.
///
/// ```
/// use make_lpa_core::Address;
///
/// let address = Address {
///     line1: "3 Elm St".to_string(),
///     town_or_city: "Springfield".to_string(),
///     postcode: "SP1 2AB".to_string(),
///     country: "GB".to_string(),
///     ..Address::default()
/// };
///
/// assert_eq!(Address::decode(&address.encode()), Some(address));
/// assert_eq!(Address::decode("not a token"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub line1: String,
    pub line2: String,
    pub line3: String,
    pub town_or_city: String,
    pub postcode: String,
    pub country: String,
}

impl Address {
    /// True when no field has been filled in.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.line1.is_empty()
            && self.line2.is_empty()
            && self.line3.is_empty()
            && self.town_or_city.is_empty()
            && self.postcode.is_empty()
            && self.country.is_empty()
    }

    /// True when the address has enough detail to be saved.
    ///
    /// Line 1 and the town are always required; the postcode is required when
    /// `rule` demands one for this address's country.
    #[must_use]
    pub fn is_complete(&self, rule: &PostcodeRule) -> bool {
        !self.line1.is_empty()
            && !self.town_or_city.is_empty()
            && !(self.postcode.is_empty() && rule.requires_postcode(&self.country))
    }

    /// The non-empty lines of the address, in display order.
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        [
            self.line1.as_str(),
            self.line2.as_str(),
            self.line3.as_str(),
            self.town_or_city.as_str(),
            self.postcode.as_str(),
        ]
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect()
    }

    /// Encode the address as a selection token.
    #[must_use]
    pub fn encode(&self) -> String {
        // Serializing a struct of strings cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decode a selection token produced by [`Address::encode`].
    ///
    /// Returns `None` for anything that is not a well-formed token. An empty
    /// address is a well-formed token; callers that need a real selection
    /// should reject it with [`Address::is_zero`].
    #[must_use]
    pub fn decode(token: &str) -> Option<Self> {
        if token.is_empty() {
            return None;
        }

        serde_json::from_str(token).ok()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join(", "))
    }
}
