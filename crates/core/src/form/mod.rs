//! HTML form view models.

pub mod address;

pub use address::{
    ADDRESS_LINE_MAX_LENGTH, AddressAction, AddressFieldNames, AddressForm, AddressFormInput,
    AddressLabels, FIELD_NAMES, UnknownAction,
};
