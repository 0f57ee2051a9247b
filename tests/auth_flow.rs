//! Auth flow integration tests
//!
//! Onboarding, sign-in, registration and sign-out through the wired app.

use async_trait::async_trait;
use car_rental::app_core::auth::{AuthError, AuthManager, AuthUser, Credentials};
use car_rental::app_core::catalog::InMemoryCatalog;
use car_rental::app_core::config::AppConfig;
use car_rental::app_core::reservation::{
    Reservation, ReservationError, ReservationRepository, ReservationRequest,
};
use car_rental::app_ui::graph::{dispatch, ScreenEvent};
use car_rental::app_ui::navigation::{Navigator, Router, Screen};
use car_rental::app_ui::screens::SignInScreen;
use car_rental::{init_tracing_from, App};
use chrono::NaiveDate;
use std::sync::Arc;

struct PasswordAuth;

#[async_trait]
impl AuthManager for PasswordAuth {
    async fn sign_in(&self, credentials: Credentials) -> car_rental::app_core::auth::Result<AuthUser> {
        if credentials.password != "secret1" {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(AuthUser {
            id: "u1".to_string(),
            email: credentials.email,
            display_name: Some("Amina".to_string()),
        })
    }

    async fn sign_out(&self) -> car_rental::app_core::auth::Result<()> {
        Ok(())
    }
}

struct Offline;

#[async_trait]
impl ReservationRepository for Offline {
    async fn create_reservation(
        &self,
        _request: ReservationRequest,
    ) -> car_rental::app_core::reservation::Result<Reservation> {
        Err(ReservationError::Network("offline".to_string()))
    }
}

fn app() -> App {
    let config = AppConfig {
        log_filter: "debug".to_string(),
        ..AppConfig::default()
    };
    let _ = init_tracing_from(&config);
    App::new(
        config,
        Arc::new(PasswordAuth),
        Arc::new(InMemoryCatalog::default()),
        Arc::new(Offline),
    )
    .unwrap()
}

fn through_onboarding(app: &mut App) {
    for event in [
        ScreenEvent::SplashFinished,
        ScreenEvent::Next,
        ScreenEvent::Next,
        ScreenEvent::Next,
    ] {
        dispatch(app.nav_mut(), event).unwrap();
    }
    assert_eq!(
        app.nav().stack().paths(),
        vec!["SplashSequence", "Welcome", "Second", "SignIn"]
    );
}

#[tokio::test]
async fn test_sign_in_after_onboarding() {
    let mut app = app();
    through_onboarding(&mut app);

    let mut screen = SignInScreen::new();
    screen.form_mut().set_email("amina@example.com");
    screen.form_mut().set_password("secret1");

    let (session, nav) = app.session_and_nav();
    assert!(screen.submit(session, nav).await.unwrap());
    assert_eq!(app.nav().stack().paths(), vec!["Home"]);
    assert_eq!(
        app.session().current_user().and_then(|u| u.display_name),
        Some("Amina".to_string())
    );
}

#[tokio::test]
async fn test_wrong_password_keeps_sign_in() {
    let mut app = app();
    through_onboarding(&mut app);

    let mut screen = SignInScreen::new();
    screen.form_mut().set_email("amina@example.com");
    screen.form_mut().set_password("nope123");

    let (session, nav) = app.session_and_nav();
    assert!(!screen.submit(session, nav).await.unwrap());
    assert_eq!(screen.auth_error(), Some("Invalid credentials"));
    assert_eq!(app.nav().current().screen(), Screen::SignIn);
    assert!(!app.session().is_signed_in());
}

#[tokio::test]
async fn test_registration_then_profile() {
    let mut app = app();
    through_onboarding(&mut app);

    for event in [
        ScreenEvent::RegisterClicked,
        ScreenEvent::AccountCreated,
        ScreenEvent::OtpVerified,
        ScreenEvent::ProfileCompleted,
    ] {
        dispatch(app.nav_mut(), event).unwrap();
    }
    assert_eq!(app.nav().stack().paths(), vec!["Home"]);
}

#[tokio::test]
async fn test_sign_out_from_profile() {
    let mut app = app();
    through_onboarding(&mut app);
    let mut screen = SignInScreen::new();
    screen.form_mut().set_email("amina@example.com");
    screen.form_mut().set_password("secret1");
    let (session, nav) = app.session_and_nav();
    screen.submit(session, nav).await.unwrap();

    dispatch(app.nav_mut(), ScreenEvent::OpenProfile).unwrap();
    dispatch(app.nav_mut(), ScreenEvent::OpenFavorites).unwrap();
    app.begin_booking(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

    app.sign_out().await.unwrap();
    assert_eq!(app.nav().stack().paths(), vec!["SignIn"]);
    assert!(!app.session().is_signed_in());
    assert!(app.booking().is_none());
}

#[test]
fn test_deep_links_round_trip_through_router() {
    let router = Router::default();
    for path in [
        "CarDetails/42",
        "Gallery/42",
        "ResetPassword?email=amina%40example.com",
        "OTPVerification?fromForgotPassword=true",
        "Cancelation?reservationId=7",
        "Home",
    ] {
        assert_eq!(router.parse(path).unwrap().to_path(), path);
    }
}

#[test]
fn test_invalid_config_rejected() {
    let config = AppConfig {
        default_rental_days: 0,
        ..AppConfig::default()
    };
    let result = App::new(
        config,
        Arc::new(PasswordAuth),
        Arc::new(InMemoryCatalog::default()),
        Arc::new(Offline),
    );
    assert!(result.is_err());
}

#[test]
fn test_configured_log_filter_is_parsed() {
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }
    let config = AppConfig {
        log_filter: "app_core=loud".to_string(),
        ..AppConfig::default()
    };
    let err = init_tracing_from(&config).unwrap_err();
    assert!(err.to_string().contains("invalid log filter: app_core=loud"));
}
