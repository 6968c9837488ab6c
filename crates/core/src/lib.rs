//! Make an LPA Core - Domain library for the donor journey.
//!
//! This crate holds the parts of the donor pages that do not depend on HTTP
//! or storage:
//! - the address entry workflow (manual entry, postcode lookup, reuse of
//!   addresses already on the LPA)
//! - the witness code checks and the attempt limiter guarding them
//! - the `Provided` aggregate the donor pages read and write
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure logic. Collaborators
//! such as the postcode lookup service are reached through traits, and the
//! current time is always passed in by the caller.
//!
//! # Modules
//!
//! - [`types`] - Addresses, postcodes and identifiers
//! - [`validation`] - Ordered field errors
//! - [`form`] - The address form
//! - [`workflow`] - The address entry state machine
//! - [`limiter`] - Attempt limiter for witness codes
//! - [`witness`] - Witness codes and their checks
//! - [`donor`] - The donor's provided details

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod donor;
pub mod form;
pub mod limiter;
pub mod types;
pub mod validation;
pub mod witness;
pub mod workflow;

pub use donor::{Actor, AddressActor, Provided};
pub use form::{AddressAction, AddressForm, AddressFormInput, AddressLabels, UnknownAction};
pub use limiter::Limiter;
pub use types::*;
pub use validation::{FieldError, ValidationErrors};
pub use witness::{
    WitnessCode, WitnessCodes, WitnessingActor, check_witness_code, check_witness_code_with,
};
pub use workflow::{
    AddressPage, AddressWorkflow, LookupError, PostcodeLookup, Resolution, reusable_addresses,
};
