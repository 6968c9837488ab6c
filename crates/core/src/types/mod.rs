//! Value types shared by the donor pages.

pub mod address;
pub mod id;
pub mod postcode;

pub use address::{Address, DEFAULT_COUNTRY};
pub use id::*;
pub use postcode::{PostcodeProblem, PostcodeRule, lookup_postcode_query, normalise_postcode};
