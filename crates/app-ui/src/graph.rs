//! Screen transition graph
//!
//! Maps a user event on the visible screen to the navigation it triggers.
//! Screens emit [`ScreenEvent`]s; [`command_for`] decides the target and
//! back stack effect from the current destination alone, and [`dispatch`]
//! applies it through the injected [`Navigator`].

use crate::navigation::{
    BackStackEffect, Destination, NavigationError, Navigator, Result, RouteArgs, Screen,
};

/// User events that can trigger navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    /// Back arrow / system back
    Back,
    /// Splash animation finished
    SplashFinished,
    /// Onboarding "Next"
    Next,
    /// Onboarding "Skip"
    Skip,

    /// "Sign in" link
    SignInClicked,
    /// "Register" link
    RegisterClicked,
    /// "Forgot password" link
    ForgotPasswordClicked,
    /// Credentials accepted
    SignedIn,
    /// Account created
    AccountCreated,
    /// Reset email sent
    ResetLinkSent {
        /// Address the reset link went to
        email: String,
    },
    /// Password reset or changed from the auth flow
    PasswordReset,
    /// OTP code accepted
    OtpVerified,
    /// Profile completed after registration
    ProfileCompleted,
    /// Password changed from settings
    PasswordChanged,
    /// User signed out
    SignedOut,

    /// Bottom bar / "back to home"
    OpenHome,
    /// Profile tab
    OpenProfile,
    /// Favorites tab
    OpenFavorites,
    /// Bookings tab
    OpenBookings,
    /// Completed bookings tab
    OpenCompletedBookings,
    /// Notification bell
    OpenNotifications,
    /// Legacy favorites redirect
    Redirect,

    /// A car was tapped
    CarSelected {
        /// Car ID
        car_id: String,
    },
    /// "Gallery"
    OpenGallery,
    /// "About" tab in the gallery
    OpenAbout,
    /// "Book now"
    BookNow,
    /// "Book again" on a completed booking
    Rebook {
        /// Car ID
        car_id: String,
    },

    /// Primary "Continue" button
    Continue,
    /// Edahabia payment selected
    PayWithEdahabia,
    /// Cash payment selected
    PayWithCash,
    /// "Try again" after a failed payment
    TryAgain,
    /// "Cancel" after a failed payment
    Cancel,
}

/// What the navigator should do
#[derive(Debug, Clone, PartialEq)]
pub enum NavCommand {
    /// Navigate to a destination
    Navigate {
        /// Target
        destination: Destination,
        /// Back stack effect
        effect: BackStackEffect,
    },
    /// Go back one entry
    Pop,
}

impl NavCommand {
    fn push(screen: Screen) -> Result<Self> {
        Self::with(screen, RouteArgs::new(), BackStackEffect::Push)
    }

    fn clear_and_push(screen: Screen) -> Result<Self> {
        Self::with(screen, RouteArgs::new(), BackStackEffect::ClearAndPush)
    }

    fn replacing(from: Screen, screen: Screen, args: RouteArgs) -> Result<Self> {
        Self::with(
            screen,
            args,
            BackStackEffect::PopUpTo {
                screen: from,
                inclusive: true,
            },
        )
    }

    fn with(screen: Screen, args: RouteArgs, effect: BackStackEffect) -> Result<Self> {
        Ok(NavCommand::Navigate {
            destination: Destination::new(screen, args)?,
            effect,
        })
    }
}

fn car_args(car_id: &str) -> RouteArgs {
    RouteArgs::new().with("carId", car_id)
}

/// Decide the navigation for `event` on the `current` screen
pub fn command_for(current: &Destination, event: ScreenEvent) -> Result<NavCommand> {
    use NavCommand as C;
    use Screen as S;
    use ScreenEvent as E;

    let screen = current.screen();
    match (screen, event) {
        // Splash / onboarding
        (S::SplashSequence, E::SplashFinished) => C::push(S::Welcome),
        (S::Welcome, E::Next) => C::push(S::Second),
        (S::Second, E::Next) => C::push(S::Third),
        (S::Second, E::Skip) => C::push(S::SignIn),
        (S::Third, E::Next) => C::replacing(S::Third, S::SignIn, RouteArgs::new()),

        // Auth
        (S::SignIn, E::RegisterClicked) => C::push(S::CreateAccount),
        (S::SignIn, E::ForgotPasswordClicked) => C::push(S::ForgotPassword),
        (S::SignIn, E::SignedIn) => C::clear_and_push(S::Home),
        (S::CreateAccount, E::SignInClicked) => C::push(S::SignIn),
        (S::CreateAccount, E::AccountCreated) => C::replacing(
            S::CreateAccount,
            S::OtpVerification,
            RouteArgs::new().with("fromForgotPassword", false),
        ),
        (S::ForgotPassword, E::ResetLinkSent { email }) => C::replacing(
            S::ForgotPassword,
            S::ResetPassword,
            RouteArgs::new().with("email", email),
        ),
        (S::ResetPassword, E::PasswordReset) => {
            C::replacing(S::ResetPassword, S::SignIn, RouteArgs::new())
        }
        (S::NewPassword, E::PasswordReset) => C::push(S::SignIn),
        (S::OtpVerification, E::OtpVerified) => {
            if current.bool_arg("fromForgotPassword").unwrap_or(false) {
                C::push(S::NewPassword)
            } else {
                C::push(S::CompleteProfile)
            }
        }
        (S::CompleteProfile, E::ProfileCompleted) => C::clear_and_push(S::Home),
        (S::PasswordManager, E::PasswordChanged) => Ok(C::Pop),

        // Main
        (S::Home, E::CarSelected { car_id }) | (S::Favorites, E::CarSelected { car_id }) => {
            C::with(S::CarDetails, car_args(&car_id), BackStackEffect::Push)
        }
        (S::Home, E::SignedOut) => C::clear_and_push(S::SignIn),
        (S::CarDetails, E::OpenGallery) => C::with(
            S::Gallery,
            car_args(current.string_arg("carId").unwrap_or_default()),
            BackStackEffect::Push,
        ),
        (S::CarDetails, E::BookNow) => C::with(
            S::CarBooking,
            car_args(current.string_arg("carId").unwrap_or_default()),
            BackStackEffect::Push,
        ),
        (S::Gallery, E::OpenAbout) => match current.string_arg("carId") {
            Some(car_id) => C::replacing(S::Gallery, S::CarDetails, car_args(car_id)),
            None => Ok(C::Pop),
        },
        (S::Gallery, E::BookNow) => {
            let args = current
                .string_arg("carId")
                .map(car_args)
                .unwrap_or_default();
            C::with(S::CarBooking, args, BackStackEffect::Push)
        }
        (S::Favorite, E::Redirect) => C::replacing(S::Favorite, S::Favorites, RouteArgs::new()),

        // Bookings
        (S::MyBooking, E::OpenCompletedBookings) => C::push(S::CompletedBooking),
        (S::CompletedBooking, E::OpenBookings) => C::push(S::MyBooking),
        (S::CompletedBooking, E::Rebook { car_id }) => {
            C::with(S::CarBooking, car_args(&car_id), BackStackEffect::Push)
        }
        (S::CarBooking, E::Continue) => C::push(S::CompleteYourBooking),
        (S::CompleteYourBooking, E::Continue) => C::push(S::PaymentMethod),

        // Payment
        (S::PaymentMethod, E::PayWithEdahabia) => C::push(S::Edahabia),
        (S::PaymentMethod, E::PayWithCash) => C::push(S::PaymentPending),
        (S::Edahabia, E::Continue) => C::push(S::Bill),
        (S::Bill, E::Continue) => C::push(S::PaymentDone),
        (S::PaymentPending, E::OpenHome) => C::clear_and_push(S::Home),
        (S::PaymentDone, E::OpenHome) | (S::UnsuccessfulPayment, E::Cancel) => {
            C::replacing(S::Home, S::Home, RouteArgs::new())
        }
        (S::UnsuccessfulPayment, E::TryAgain) => Ok(C::Pop),

        // Bottom bar and shared tabs
        (S::Profile | S::MyBooking | S::CompletedBooking | S::Logout, E::OpenHome) => {
            C::clear_and_push(S::Home)
        }
        (S::Home | S::Profile | S::MyBooking | S::CompletedBooking | S::Logout, E::OpenFavorites) => {
            C::push(S::Favorites)
        }
        (S::Home | S::MyBooking | S::CompletedBooking, E::OpenProfile) => C::push(S::Profile),
        (S::Home | S::Profile | S::Logout, E::OpenBookings) => C::push(S::MyBooking),
        (S::Home, E::OpenNotifications) => C::push(S::Notification),

        // Back
        (
            S::Second
            | S::Third
            | S::ForgotPassword
            | S::ResetPassword
            | S::NewPassword
            | S::CompleteProfile
            | S::OtpVerification
            | S::CarDetails
            | S::Notification
            | S::Gallery
            | S::Profile
            | S::MyBooking
            | S::CompletedBooking
            | S::CompleteYourBooking
            | S::CarBooking
            | S::Settings
            | S::NotificationSettings
            | S::PasswordManager
            | S::PaymentMethod
            | S::Edahabia
            | S::Bill
            | S::Cancelation
            | S::HelpCenter
            | S::PrivacyPolicy
            | S::Logout
            | S::ProfileGeneral
            | S::ProfileLocation
            | S::Favorites,
            E::Back,
        ) => Ok(C::Pop),

        (screen, event) => Err(NavigationError::UnhandledEvent {
            screen,
            event: format!("{event:?}"),
        }),
    }
}

/// Execute a command on a navigator
pub fn apply(nav: &mut dyn Navigator, command: NavCommand) -> Result<()> {
    match command {
        NavCommand::Navigate {
            destination,
            effect,
        } => nav.navigate_to(destination, effect),
        NavCommand::Pop => {
            if !nav.pop() {
                tracing::debug!("Back pressed at root of {}", nav.current());
            }
            Ok(())
        }
    }
}

/// Handle `event` on the navigator's current screen
pub fn dispatch(nav: &mut dyn Navigator, event: ScreenEvent) -> Result<()> {
    let command = command_for(nav.current(), event)?;
    apply(nav, command)
}
