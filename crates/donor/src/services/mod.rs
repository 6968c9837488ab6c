//! Clients for services outside the donor pages.
//!
//! # Services
//!
//! - `place` - Ordnance Survey Places API, used for postcode lookup

pub mod place;

pub use place::{PlaceClient, PlaceError};
