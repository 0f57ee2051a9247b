//! Car rental client
//!
//! Wires the core rules, state holders and navigation into one [`App`] and
//! installs logging. Backends (auth, catalog, reservations) are injected.

#![warn(missing_docs)]
#![warn(clippy::all)]

use anyhow::Context;
use app_core::auth::AuthManager;
use app_core::catalog::CarCatalog;
use app_core::config::AppConfig;
use app_core::reservation::ReservationRepository;
use app_state::booking_flow::{BookingDraft, BookingFlow, BookingFlowScope};
use app_state::session::SessionState;
use app_ui::navigation::{BackStackEffect, NavController, Navigator, RouteArgs, Screen};
use app_ui::screens::{CarBookingScreen, CompleteYourBookingScreen, FilterScreen, PaymentMethodScreen};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub use app_core;
pub use app_state;
pub use app_ui;

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` wins over `default_filter` when set.
pub fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .with_context(|| format!("invalid log filter: {default_filter}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

/// Install the global `tracing` subscriber with the configured filter
///
/// Call before [`App::new`] so startup is logged.
pub fn init_tracing_from(config: &AppConfig) -> anyhow::Result<()> {
    init_tracing(&config.log_filter)
}

/// The running application
pub struct App {
    config: AppConfig,
    session: SessionState,
    catalog: Arc<dyn CarCatalog>,
    bookings: BookingFlowScope,
    nav: NavController,
}

impl App {
    /// Build the application around its backends, starting at the splash
    pub fn new(
        config: AppConfig,
        auth: Arc<dyn AuthManager>,
        catalog: Arc<dyn CarCatalog>,
        reservations: Arc<dyn ReservationRepository>,
    ) -> anyhow::Result<Self> {
        config.validate().context("invalid configuration")?;
        let nav = NavController::standard().context("failed to build navigation")?;
        let bookings = BookingFlowScope::new(reservations, config.default_rental_days);
        tracing::info!(currency = %config.currency_symbol, "App started");
        Ok(Self {
            config,
            session: SessionState::new(auth),
            catalog,
            bookings,
            nav,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Signed-in user state
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Car catalog
    pub fn catalog(&self) -> &Arc<dyn CarCatalog> {
        &self.catalog
    }

    /// Navigator
    pub fn nav(&self) -> &NavController {
        &self.nav
    }

    /// Navigator for event handling
    pub fn nav_mut(&mut self) -> &mut NavController {
        &mut self.nav
    }

    /// Session and navigator together, for screens that need both
    pub fn session_and_nav(&mut self) -> (&SessionState, &mut NavController) {
        (&self.session, &mut self.nav)
    }

    /// Enter the booking flow for the car on the current `CarBooking` route
    pub fn begin_booking(&mut self, today: NaiveDate) -> Arc<BookingFlow> {
        let car_id = self
            .nav
            .current()
            .string_arg("carId")
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        self.bookings.begin(car_id, today)
    }

    /// Active booking flow
    pub fn booking(&self) -> Option<Arc<BookingFlow>> {
        self.bookings.current()
    }

    /// Car booking screen for the active flow
    pub fn car_booking_screen(&self) -> Option<CarBookingScreen> {
        self.booking()
            .map(|flow| CarBookingScreen::new(flow, self.config.currency_symbol.clone()))
    }

    /// Renter form screen for the active flow, offering the configured wilayas
    pub fn complete_your_booking_screen(&self) -> Option<CompleteYourBookingScreen> {
        self.booking()
            .map(|flow| CompleteYourBookingScreen::new(flow, &self.config.wilayas))
    }

    /// Payment method screen for the active flow
    pub fn payment_method_screen(&self) -> Option<PaymentMethodScreen> {
        self.booking().map(PaymentMethodScreen::new)
    }

    /// Complete the booking flow
    pub fn finish_booking(&mut self) -> Option<BookingDraft> {
        self.bookings.finish()
    }

    /// Leave the booking flow without completing it
    pub fn abandon_booking(&mut self) -> bool {
        self.bookings.abandon()
    }

    /// Filter panel with the configured slider range
    pub fn filter_screen(&self) -> FilterScreen {
        let mut screen = FilterScreen::new(
            Arc::clone(&self.catalog),
            self.config.max_filter_price,
            self.config.currency_symbol.clone(),
        );
        screen
            .selection_mut()
            .set_price_fraction(self.config.default_price_fraction);
        screen
    }

    /// Sign out from any screen
    ///
    /// Drops the booking flow and returns to a fresh sign-in screen.
    pub async fn sign_out(&mut self) -> anyhow::Result<()> {
        self.session.sign_out().await.context("sign out failed")?;
        self.bookings.abandon();
        self.nav
            .navigate(Screen::SignIn, RouteArgs::new(), BackStackEffect::ClearAndPush)
            .context("failed to navigate to sign in")?;
        Ok(())
    }
}
