//! Postcode normalisation and the rule deciding when a postcode is valid.

use std::sync::LazyLock;

use regex::Regex;

use super::address::DEFAULT_COUNTRY;

/// Standard UK postcode pattern, applied to upper-cased input.
const UK_POSTCODE_PATTERN: &str = r"^(GIR ?0AA|[A-PR-UWYZ]([0-9]{1,2}|[A-HK-Y][0-9][0-9ABEHMNPRV-Y]?|[0-9][A-HJKPS-UW]) ?[0-9][ABD-HJLNP-UW-Z]{2})$";

static UK_POSTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(UK_POSTCODE_PATTERN).expect("UK postcode pattern is a valid regex")
});

/// Normalise a postcode for storage: trimmed and upper-cased.
///
/// ```
/// use make_lpa_core::normalise_postcode;
///
/// assert_eq!(normalise_postcode("  sp1 2ab "), "SP1 2AB");
/// ```
#[must_use]
pub fn normalise_postcode(postcode: &str) -> String {
    postcode.trim().to_uppercase()
}

/// Normalise a postcode for a lookup query: whitespace removed and upper-cased.
///
/// ```
/// use make_lpa_core::lookup_postcode_query;
///
/// assert_eq!(lookup_postcode_query("  X XX XX X "), "XXXXXX");
/// ```
#[must_use]
pub fn lookup_postcode_query(postcode: &str) -> String {
    postcode
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Why a postcode failed [`PostcodeRule::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostcodeProblem {
    /// No postcode given where one is required.
    Missing,
    /// A postcode was given but does not look like one.
    Malformed,
}

/// When a postcode is required and what it must look like.
///
/// The default rule requires a postcode for `GB` addresses and checks its
/// format against the UK pattern. Addresses in other countries are never
/// checked.
#[derive(Debug, Clone)]
pub struct PostcodeRule {
    required_for_gb: bool,
    format: Option<Regex>,
}

impl Default for PostcodeRule {
    fn default() -> Self {
        Self {
            required_for_gb: true,
            format: Some(UK_POSTCODE.clone()),
        }
    }
}

impl PostcodeRule {
    /// A rule that only requires a postcode to be present for `GB` addresses.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            required_for_gb: true,
            format: None,
        }
    }

    /// A rule using a custom format for `GB` postcodes.
    #[must_use]
    pub fn with_format(format: Regex) -> Self {
        Self {
            required_for_gb: true,
            format: Some(format),
        }
    }

    /// Set whether `GB` addresses must have a postcode.
    #[must_use]
    pub fn required_for_gb(mut self, required: bool) -> Self {
        self.required_for_gb = required;
        self
    }

    /// True when an address in `country` must have a postcode.
    #[must_use]
    pub fn requires_postcode(&self, country: &str) -> bool {
        self.required_for_gb && is_gb(country)
    }

    /// Check a (normalised) postcode for an address in `country`.
    ///
    /// # Errors
    ///
    /// Returns [`PostcodeProblem::Missing`] when a required postcode is empty,
    /// and [`PostcodeProblem::Malformed`] when a `GB` postcode does not match
    /// the configured format.
    pub fn check(&self, country: &str, postcode: &str) -> Result<(), PostcodeProblem> {
        if postcode.is_empty() {
            return if self.requires_postcode(country) {
                Err(PostcodeProblem::Missing)
            } else {
                Ok(())
            };
        }

        match &self.format {
            Some(format) if is_gb(country) && !format.is_match(&normalise_postcode(postcode)) => {
                Err(PostcodeProblem::Malformed)
            }
            _ => Ok(()),
        }
    }
}

fn is_gb(country: &str) -> bool {
    country.is_empty() || country == DEFAULT_COUNTRY
}
