//! Shared booking flow state
//!
//! Car selection, the renter form and payment all read and write the same
//! [`BookingFlow`]. The [`BookingFlowScope`] owns it for the duration of the
//! flow and drops it when the flow finishes or is abandoned; screens only
//! borrow it through the scope.

use app_core::catalog::Car;
use app_core::forms::RenterInfo;
use app_core::pricing::{compute_booking, default_window, BookingQuote};
use app_core::reservation::{ReservationError, ReservationRepository, ReservationRequest};
use chrono::NaiveDate;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::effects::{EffectObserver, ReservationEffect};
use crate::reservation::ReservationStateHolder;

/// Booking flow errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingFlowError {
    /// The flow has no car loaded yet
    #[error("No car selected")]
    NoCar,

    /// Request could not be built
    #[error(transparent)]
    Reservation(#[from] ReservationError),
}

/// Result type for booking flow operations
pub type Result<T> = std::result::Result<T, BookingFlowError>;

/// How the renter pays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Edahabia card
    Edahabia,
    /// Cash on pickup
    Cash,
}

/// Everything collected so far in the flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    /// Car being booked, once loaded from the catalog
    pub car: Option<Car>,
    /// Pickup date
    pub pickup: NaiveDate,
    /// Drop-off date
    pub dropoff: NaiveDate,
    /// Renter details from the renter form
    pub renter: Option<RenterInfo>,
    /// Chosen payment method
    pub payment_method: Option<PaymentMethod>,
}

/// State shared by the screens of one booking flow
#[derive(Debug)]
pub struct BookingFlow {
    car_id: Option<String>,
    draft: RwLock<BookingDraft>,
    reservation: ReservationStateHolder,
    effects: Mutex<EffectObserver>,
}

impl BookingFlow {
    /// Start a flow for `car_id` with the default date window
    pub fn new(
        car_id: Option<String>,
        today: NaiveDate,
        rental_days: u32,
        repository: Arc<dyn ReservationRepository>,
    ) -> Self {
        let (pickup, dropoff) = default_window(today, rental_days);
        Self {
            car_id,
            draft: RwLock::new(BookingDraft {
                car: None,
                pickup,
                dropoff,
                renter: None,
                payment_method: None,
            }),
            reservation: ReservationStateHolder::new(repository),
            effects: Mutex::new(EffectObserver::new()),
        }
    }

    /// Car ID the flow was started for
    pub fn car_id(&self) -> Option<&str> {
        self.car_id.as_deref()
    }

    /// Copy of the collected data
    pub fn draft(&self) -> BookingDraft {
        self.draft.read().clone()
    }

    /// Store the car loaded from the catalog
    pub fn set_car(&self, car: Car) {
        self.draft.write().car = Some(car);
    }

    /// Change the rental dates; drop-off must be after pickup
    pub fn set_dates(&self, pickup: NaiveDate, dropoff: NaiveDate) -> Result<()> {
        if dropoff <= pickup {
            return Err(ReservationError::InvalidDates.into());
        }
        let mut draft = self.draft.write();
        draft.pickup = pickup;
        draft.dropoff = dropoff;
        Ok(())
    }

    /// Duration and price for the current dates
    pub fn quote(&self) -> Option<BookingQuote> {
        let draft = self.draft.read();
        draft
            .car
            .as_ref()
            .map(|car| compute_booking(car.daily_rate, draft.pickup, draft.dropoff))
    }

    /// Store the renter details
    pub fn set_renter(&self, renter: RenterInfo) {
        self.draft.write().renter = Some(renter);
    }

    /// Store the payment method
    pub fn set_payment_method(&self, method: PaymentMethod) {
        self.draft.write().payment_method = Some(method);
    }

    /// Reservation request for the current car and dates
    pub fn request(&self) -> Result<ReservationRequest> {
        let draft = self.draft.read();
        let car = draft.car.as_ref().ok_or(BookingFlowError::NoCar)?;
        Ok(ReservationRequest::priced(car, draft.pickup, draft.dropoff)?)
    }

    /// Reservation state holder for this flow
    pub fn reservation(&self) -> &ReservationStateHolder {
        &self.reservation
    }

    /// Pending one-shot effect for the current reservation state
    ///
    /// Shared by every screen attached to the flow, so a revision is acted
    /// on once even when the screen is rebuilt.
    pub fn take_effect(&self) -> Option<ReservationEffect> {
        let snapshot = self.reservation.snapshot();
        self.effects.lock().observe(&snapshot)
    }
}

/// Owner of the active booking flow
pub struct BookingFlowScope {
    repository: Arc<dyn ReservationRepository>,
    rental_days: u32,
    current: Option<Arc<BookingFlow>>,
}

impl BookingFlowScope {
    /// Create an empty scope
    pub fn new(repository: Arc<dyn ReservationRepository>, rental_days: u32) -> Self {
        Self {
            repository,
            rental_days,
            current: None,
        }
    }

    /// Enter the flow for a car
    ///
    /// Re-entering with the same car resumes the existing flow; a different
    /// car abandons it and starts fresh.
    pub fn begin(&mut self, car_id: Option<String>, today: NaiveDate) -> Arc<BookingFlow> {
        if let Some(flow) = &self.current {
            if flow.car_id.as_deref() == car_id.as_deref() {
                return Arc::clone(flow);
            }
            self.abandon();
        }

        tracing::debug!(car_id = ?car_id, "Booking flow started");
        let flow = Arc::new(BookingFlow::new(
            car_id,
            today,
            self.rental_days,
            Arc::clone(&self.repository),
        ));
        self.current = Some(Arc::clone(&flow));
        flow
    }

    /// Active flow, if any
    pub fn current(&self) -> Option<Arc<BookingFlow>> {
        self.current.clone()
    }

    /// Whether a flow is active
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Complete the flow, handing back its final state
    pub fn finish(&mut self) -> Option<BookingDraft> {
        let flow = self.current.take()?;
        tracing::debug!(car_id = ?flow.car_id, "Booking flow finished");
        Some(flow.draft())
    }

    /// Drop the flow, cancelling any in-flight reservation
    pub fn abandon(&mut self) -> bool {
        match self.current.take() {
            Some(flow) => {
                flow.reservation.cancel();
                tracing::debug!(car_id = ?flow.car_id, "Booking flow abandoned");
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservation::test_support::{date, reservation_for, MockRepository};
    use crate::reservation::ReservationUiState;
    use app_core::catalog::CarType;
    use app_core::money::Money;

    fn car() -> Car {
        Car {
            id: "7".to_string(),
            brand: "Nissan".to_string(),
            model: "Qashqai".to_string(),
            year: 2023,
            daily_rate: Money::from_units(50),
            transmission: "Automatic".to_string(),
            rating: 4.4,
            car_type: CarType::Suv,
        }
    }

    fn scope() -> BookingFlowScope {
        let mut repo = MockRepository::new();
        repo.expect_create_reservation()
            .returning(|request| Ok(reservation_for(&request, 1)));
        BookingFlowScope::new(Arc::new(repo), 3)
    }

    #[test]
    fn test_default_window_and_quote() {
        let mut scope = scope();
        let flow = scope.begin(Some("7".to_string()), date(2024, 1, 1));
        assert_eq!(flow.quote(), None);

        flow.set_car(car());
        let draft = flow.draft();
        assert_eq!(draft.pickup, date(2024, 1, 1));
        assert_eq!(draft.dropoff, date(2024, 1, 4));
        assert_eq!(
            flow.quote(),
            Some(BookingQuote {
                days: 3,
                total: Money::from_units(150)
            })
        );
    }

    #[test]
    fn test_quote_follows_dates() {
        let mut scope = scope();
        let flow = scope.begin(Some("7".to_string()), date(2024, 1, 1));
        flow.set_car(car());
        flow.set_dates(date(2024, 1, 10), date(2024, 1, 11)).unwrap();
        assert_eq!(flow.quote().map(|q| q.days), Some(1));

        assert_eq!(
            flow.set_dates(date(2024, 1, 11), date(2024, 1, 11)),
            Err(BookingFlowError::Reservation(ReservationError::InvalidDates))
        );
    }

    #[test]
    fn test_request_requires_car() {
        let mut scope = scope();
        let flow = scope.begin(None, date(2024, 1, 1));
        assert_eq!(flow.request().unwrap_err(), BookingFlowError::NoCar);
    }

    #[test]
    fn test_scope_shares_one_flow() {
        let mut scope = scope();
        let first = scope.begin(Some("7".to_string()), date(2024, 1, 1));
        first.set_payment_method(PaymentMethod::Cash);

        let resumed = scope.begin(Some("7".to_string()), date(2024, 1, 2));
        assert!(Arc::ptr_eq(&first, &resumed));
        assert_eq!(resumed.draft().payment_method, Some(PaymentMethod::Cash));

        let other = scope.begin(Some("8".to_string()), date(2024, 1, 2));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(other.draft().payment_method, None);
    }

    #[tokio::test]
    async fn test_finish_releases_flow() {
        let mut scope = scope();
        let flow = scope.begin(Some("7".to_string()), date(2024, 1, 1));
        flow.set_car(car());

        let request = flow.request().unwrap();
        let state = flow.reservation().create_reservation(request).await;
        assert!(matches!(state, ReservationUiState::Success(_)));

        drop(flow);
        let draft = scope.finish().unwrap();
        assert_eq!(draft.car.map(|c| c.id), Some("7".to_string()));
        assert!(!scope.is_active());
        assert!(scope.finish().is_none());
        assert!(!scope.abandon());
    }

    #[tokio::test]
    async fn test_effect_taken_once_per_flow() {
        let mut scope = scope();
        let flow = scope.begin(Some("7".to_string()), date(2024, 1, 1));
        flow.set_car(car());
        assert_eq!(flow.take_effect(), None);

        let request = flow.request().unwrap();
        flow.reservation().create_reservation(request).await;
        assert!(matches!(
            flow.take_effect(),
            Some(ReservationEffect::Continue { .. })
        ));

        let resumed = scope.begin(Some("7".to_string()), date(2024, 1, 1));
        assert_eq!(resumed.take_effect(), None);
    }
}
