//! User interface layer for the car rental client
//!
//! This crate provides the navigation framework, the screen transition
//! graph, and the controllers of the screens that carry real logic.
//! Rendering itself is out of scope; a renderer reads controller state and
//! forwards user input as method calls.
//!
//! # Modules
//!
//! - [`navigation`] - Screens, routes, back stack and the navigator
//! - [`graph`] - Which event on which screen goes where
//! - [`screens`] - Screen controllers
//!
//! # Example
//!
//! ```rust
//! use app_ui::graph::{dispatch, ScreenEvent};
//! use app_ui::navigation::{NavController, Navigator, Screen};
//!
//! let mut nav = NavController::standard().unwrap();
//! dispatch(&mut nav, ScreenEvent::SplashFinished).unwrap();
//! assert_eq!(nav.current().screen(), Screen::Welcome);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod graph;
pub mod navigation;
pub mod screens;

pub use graph::{apply, command_for, dispatch, NavCommand, ScreenEvent};
pub use navigation::{
    ArgValue, BackStack, BackStackEffect, BackStackEntry, Destination, NavController,
    NavigationError, Navigator, ParamSpec, ParamType, RouteArgs, RouteDef, RouteTable, Router,
    Screen,
};
pub use screens::{
    CarBookingScreen, CompleteYourBookingScreen, FilterScreen, PaymentMethodScreen, ScreenError,
    SignInScreen, Toast, ToastDuration,
};
