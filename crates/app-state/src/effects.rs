//! One-shot side effects
//!
//! Screens re-render many times while a state is held. An
//! [`EffectObserver`] turns reservation snapshots into navigation / toast
//! effects that fire once per distinct state value.

use app_core::reservation::Reservation;

use crate::reservation::{ReservationSnapshot, ReservationUiState, RESERVATION_CREATED_MESSAGE};

/// Effect requested by a reservation state change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationEffect {
    /// Show a confirmation toast and move to the next screen
    Continue {
        /// The created reservation
        reservation: Reservation,
        /// Toast text
        message: String,
    },
    /// Show the failure as a transient notification
    ShowError(String),
}

/// Tracks which snapshot revision has already been acted on
#[derive(Debug, Clone, Default)]
pub struct EffectObserver {
    last_seen: Option<u64>,
}

impl EffectObserver {
    /// Create an observer that has seen nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe a snapshot, returning an effect only for a new value
    pub fn observe(&mut self, snapshot: &ReservationSnapshot) -> Option<ReservationEffect> {
        if self.last_seen == Some(snapshot.revision) {
            return None;
        }
        self.last_seen = Some(snapshot.revision);

        match &snapshot.state {
            ReservationUiState::Success(reservation) => Some(ReservationEffect::Continue {
                reservation: reservation.clone(),
                message: RESERVATION_CREATED_MESSAGE.to_string(),
            }),
            ReservationUiState::Error(message) => Some(ReservationEffect::ShowError(message.clone())),
            ReservationUiState::Idle | ReservationUiState::Loading => None,
        }
    }
}
