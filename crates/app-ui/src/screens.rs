//! Screen controllers
//!
//! Each controller owns the state of one screen and turns user actions into
//! validation, state holder calls and navigation. The navigator is passed in
//! per event; controllers never hold it.

use app_core::catalog::{Car, CarCatalog, CarFilter, CatalogError, FilterSelection};
use app_core::forms::{RenterInfoForm, SignInForm};
use app_core::pricing::BookingSummary;
use app_core::validation::Wilaya;
use app_state::booking_flow::{BookingFlow, BookingFlowError, PaymentMethod};
use app_state::effects::ReservationEffect;
use app_state::reservation::ReservationUiState;
use app_state::session::SessionState;
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

use crate::graph::{dispatch, ScreenEvent};
use crate::navigation::{NavigationError, Navigator};

/// Screen controller errors
#[derive(Debug, Error, PartialEq)]
pub enum ScreenError {
    /// Navigation failed
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    /// Booking flow rejected the action
    #[error(transparent)]
    Booking(#[from] BookingFlowError),
}

/// Result type for screen actions
pub type Result<T> = std::result::Result<T, ScreenError>;

/// How long a toast stays up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastDuration {
    /// Confirmations
    Short,
    /// Errors
    Long,
}

/// Transient notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Text
    pub message: String,
    /// Display duration
    pub duration: ToastDuration,
}

impl Toast {
    fn short(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            duration: ToastDuration::Short,
        }
    }

    fn long(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            duration: ToastDuration::Long,
        }
    }
}

// =============================================================================
// Sign In
// =============================================================================

/// Sign-in screen
#[derive(Debug, Default)]
pub struct SignInScreen {
    form: SignInForm,
    auth_error: Option<String>,
}

impl SignInScreen {
    /// Create an empty sign-in screen
    pub fn new() -> Self {
        Self::default()
    }

    /// Form state
    pub fn form(&self) -> &SignInForm {
        &self.form
    }

    /// Mutable form state for keystrokes and toggles
    pub fn form_mut(&mut self) -> &mut SignInForm {
        &mut self.form
    }

    /// Last rejection from the auth manager
    pub fn auth_error(&self) -> Option<&str> {
        self.auth_error.as_deref()
    }

    /// "Sign in" pressed
    ///
    /// Returns true once signed in and moved to the main area. Invalid fields
    /// and rejected credentials leave the screen in place.
    pub async fn submit(&mut self, session: &SessionState, nav: &mut dyn Navigator) -> Result<bool> {
        let Some(credentials) = self.form.submit() else {
            return Ok(false);
        };

        match session.sign_in(credentials).await {
            Ok(_) => {
                self.auth_error = None;
                dispatch(nav, ScreenEvent::SignedIn)?;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!("Sign in rejected: {}", e);
                self.auth_error = Some(e.to_string());
                Ok(false)
            }
        }
    }

    /// "Register" link
    pub fn register(&self, nav: &mut dyn Navigator) -> Result<()> {
        Ok(dispatch(nav, ScreenEvent::RegisterClicked)?)
    }

    /// "Forgot password" link
    pub fn forgot_password(&self, nav: &mut dyn Navigator) -> Result<()> {
        Ok(dispatch(nav, ScreenEvent::ForgotPasswordClicked)?)
    }
}

// =============================================================================
// Car Booking
// =============================================================================

/// Dates and price summary screen
pub struct CarBookingScreen {
    flow: Arc<BookingFlow>,
    currency: String,
}

impl CarBookingScreen {
    /// Attach to the active booking flow
    pub fn new(flow: Arc<BookingFlow>, currency: impl Into<String>) -> Self {
        Self {
            flow,
            currency: currency.into(),
        }
    }

    /// Summary card, once the car is loaded
    pub fn summary(&self) -> Option<BookingSummary> {
        let draft = self.flow.draft();
        draft
            .car
            .as_ref()
            .map(|car| BookingSummary::new(car, draft.pickup, draft.dropoff, &self.currency))
    }

    /// Load the car from the catalog into the flow
    pub async fn load_car(&self, catalog: &dyn CarCatalog) -> std::result::Result<Car, CatalogError> {
        let car_id = self.flow.car_id().unwrap_or_default();
        let car = catalog.get_car(car_id).await?;
        self.flow.set_car(car.clone());
        Ok(car)
    }

    /// Pick new dates
    pub fn set_dates(&self, pickup: NaiveDate, dropoff: NaiveDate) -> Result<()> {
        Ok(self.flow.set_dates(pickup, dropoff)?)
    }

    /// Whether "Continue" is enabled
    pub fn can_continue(&self) -> bool {
        !self.flow.reservation().is_loading() && self.flow.draft().car.is_some()
    }

    /// "Continue" pressed: create the reservation
    ///
    /// Ignored while a call is already in flight.
    pub async fn continue_clicked(&self) -> Result<ReservationUiState> {
        let reservation = self.flow.reservation();
        if reservation.is_loading() {
            return Ok(reservation.state());
        }
        let request = self.flow.request()?;
        Ok(reservation.create_reservation(request).await)
    }

    /// React to the current reservation state
    ///
    /// Called on every render. Success navigates on and error shows a toast,
    /// each once per state change of the flow, however many times the screen
    /// is rebuilt.
    pub fn render(&self, nav: &mut dyn Navigator) -> Result<Option<Toast>> {
        match self.flow.take_effect() {
            Some(ReservationEffect::Continue { message, .. }) => {
                dispatch(nav, ScreenEvent::Continue)?;
                Ok(Some(Toast::short(message)))
            }
            Some(ReservationEffect::ShowError(message)) => Ok(Some(Toast::long(message))),
            None => Ok(None),
        }
    }

    /// Back pressed; drops any in-flight reservation
    pub fn back(&self, nav: &mut dyn Navigator) -> Result<()> {
        self.flow.reservation().cancel();
        Ok(dispatch(nav, ScreenEvent::Back)?)
    }
}

// =============================================================================
// Complete Your Booking
// =============================================================================

/// Renter information screen
pub struct CompleteYourBookingScreen {
    form: RenterInfoForm,
    flow: Arc<BookingFlow>,
}

impl CompleteYourBookingScreen {
    /// Attach to the active booking flow, offering `wilayas` in the dropdown
    pub fn new(flow: Arc<BookingFlow>, wilayas: &[Wilaya]) -> Self {
        Self {
            form: RenterInfoForm::with_wilayas(wilayas),
            flow,
        }
    }

    /// Form state
    pub fn form(&self) -> &RenterInfoForm {
        &self.form
    }

    /// Mutable form state for keystrokes and selections
    pub fn form_mut(&mut self) -> &mut RenterInfoForm {
        &mut self.form
    }

    /// "Continue" pressed
    ///
    /// Returns true if the form was valid and the flow moved to payment.
    pub fn continue_clicked(&mut self, nav: &mut dyn Navigator) -> Result<bool> {
        let Some(renter) = self.form.submit() else {
            return Ok(false);
        };
        self.flow.set_renter(renter);
        if let Err(e) = dispatch(nav, ScreenEvent::Continue) {
            self.form.finish_submission();
            return Err(e.into());
        }
        Ok(true)
    }

    /// Back pressed
    pub fn back(&self, nav: &mut dyn Navigator) -> Result<()> {
        Ok(dispatch(nav, ScreenEvent::Back)?)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// Payment method screen
pub struct PaymentMethodScreen {
    flow: Arc<BookingFlow>,
}

impl PaymentMethodScreen {
    /// Attach to the active booking flow
    pub fn new(flow: Arc<BookingFlow>) -> Self {
        Self { flow }
    }

    /// A payment method was chosen
    pub fn choose(&self, method: PaymentMethod, nav: &mut dyn Navigator) -> Result<()> {
        self.flow.set_payment_method(method);
        let event = match method {
            PaymentMethod::Edahabia => ScreenEvent::PayWithEdahabia,
            PaymentMethod::Cash => ScreenEvent::PayWithCash,
        };
        Ok(dispatch(nav, event)?)
    }
}

// =============================================================================
// Filter
// =============================================================================

/// Catalog filter panel
///
/// Shown inside the home screen, so it has no route of its own.
pub struct FilterScreen {
    selection: FilterSelection,
    catalog: Arc<dyn CarCatalog>,
    currency: String,
    applied: Option<CarFilter>,
}

impl FilterScreen {
    /// Create a panel with the default selection
    pub fn new(
        catalog: Arc<dyn CarCatalog>,
        max_filter_price: i64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            selection: FilterSelection::new(max_filter_price),
            catalog,
            currency: currency.into(),
            applied: None,
        }
    }

    /// Current selection
    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Mutable selection for chips and sliders
    pub fn selection_mut(&mut self) -> &mut FilterSelection {
        &mut self.selection
    }

    /// Filter the home list currently uses, `None` for all cars
    pub fn applied(&self) -> Option<&CarFilter> {
        self.applied.as_ref()
    }

    /// "Apply" pressed: list matching cars
    ///
    /// On catalog failure the previous filter stays applied.
    pub async fn apply(&mut self) -> (Vec<Car>, Toast) {
        let filter = self.selection.to_filter();
        tracing::debug!(?filter, "Applying filters");
        match self.catalog.list_cars(&filter).await {
            Ok(cars) => {
                self.applied = Some(filter);
                let toast = Toast::short(format!("Filters applied: {}", self.selection.summary(&self.currency)));
                (cars, toast)
            }
            Err(e) => {
                tracing::error!("Error applying filters: {}", e);
                (Vec::new(), Toast::long(format!("Error applying filters: {e}")))
            }
        }
    }

    /// "Reset" pressed
    pub fn reset(&mut self) -> Toast {
        self.selection.reset();
        self.applied = None;
        Toast::short("Filters reset")
    }
}
