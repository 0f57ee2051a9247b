//! Core application logic for the car rental client
//!
//! This crate contains the pure domain rules shared by every screen:
//! field validation, form state, pricing, the car catalog, and the
//! contracts of the reservation and authentication backends.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod catalog;
pub mod config;
pub mod forms;
pub mod money;
pub mod pricing;
pub mod reservation;
pub mod validation;

pub use money::Money;
pub use pricing::{compute_booking, BookingQuote};
pub use validation::{validate, Field, FieldValue, ValidationError, Wilaya};
