//! Application state management for the car rental client
//!
//! This crate provides the state holders that sit between the screens and
//! the backend collaborators: the reservation state machine, one-shot effect
//! observation, the shared booking flow, and the signed-in session.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod booking_flow;
pub mod effects;
pub mod reservation;
pub mod session;

pub use booking_flow::{BookingDraft, BookingFlow, BookingFlowError, BookingFlowScope, PaymentMethod};
pub use effects::{EffectObserver, ReservationEffect};
pub use reservation::{ReservationSnapshot, ReservationStateHolder, ReservationUiState};
pub use session::SessionState;
