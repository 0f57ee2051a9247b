//! Navigation system for the car rental client
//!
//! This module provides a type-safe navigation framework with:
//! - A closed set of screens with typed route parameters
//! - A route table of navigable destinations
//! - Back stack management with push / pop-up-to / clear effects
//! - Path rendering and deep-link parsing

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// Errors
// =============================================================================

/// Navigation errors
///
/// All of these are programming errors: the screen set is closed and every
/// call site passes arguments the route declares.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NavigationError {
    /// Screen has no route in the table
    #[error("Route not found: {0}")]
    RouteNotFound(Screen),

    /// Path does not name a known screen
    #[error("No route matches path: {0}")]
    Unmatched(String),

    /// Required argument missing and no default declared
    #[error("Missing required argument '{name}' for {screen}")]
    MissingArgument {
        /// Target screen
        screen: Screen,
        /// Argument name
        name: String,
    },

    /// Argument not declared by the route
    #[error("Unknown argument '{name}' for {screen}")]
    UnknownArgument {
        /// Target screen
        screen: Screen,
        /// Argument name
        name: String,
    },

    /// Argument value has the wrong type
    #[error("Argument '{name}' for {screen} must be {expected}")]
    ArgumentType {
        /// Target screen
        screen: Screen,
        /// Argument name
        name: String,
        /// Declared type
        expected: ParamType,
    },

    /// Screen does not handle this event
    #[error("{screen} does not handle {event}")]
    UnhandledEvent {
        /// Screen that received the event
        screen: Screen,
        /// Event description
        event: String,
    },
}

/// Result type for navigation operations
pub type Result<T> = std::result::Result<T, NavigationError>;

// =============================================================================
// Screens
// =============================================================================

/// All screens in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Screen {
    // Splash / onboarding
    /// Splash animation sequence
    SplashSequence,
    /// First onboarding page
    Welcome,
    /// Second onboarding page
    Second,
    /// Third onboarding page
    Third,

    // Auth
    /// Sign in
    SignIn,
    /// Registration
    CreateAccount,
    /// Request a password reset
    ForgotPassword,
    /// Enter the reset code / new password after a reset email
    ResetPassword,
    /// Choose a new password after OTP verification
    NewPassword,
    /// Complete profile after registration
    CompleteProfile,
    /// One-time password verification
    #[serde(rename = "OTPVerification")]
    OtpVerification,

    // Main
    /// Car listing
    Home,
    /// Car details
    CarDetails,
    /// Catalog filter
    Filter,
    /// Notifications
    Notification,
    /// Profile
    Profile,
    /// Car photo gallery
    Gallery,

    // Bookings
    /// Upcoming bookings
    MyBooking,
    /// Past bookings
    CompletedBooking,
    /// Renter information form
    CompleteYourBooking,
    /// Dates and price summary
    CarBooking,

    /// Legacy favorites route, redirects to [`Screen::Favorites`]
    Favorite,

    // Settings
    /// Settings
    Settings,
    /// Notification settings
    NotificationSettings,
    /// Change password
    PasswordManager,

    // Payment
    /// Payment method choice
    PaymentMethod,
    /// Edahabia card payment
    Edahabia,
    /// Payment confirmed
    PaymentDone,
    /// Cash payment pending
    PaymentPending,
    /// Payment failed
    UnsuccessfulPayment,
    /// Bill
    Bill,
    /// Reservation cancellation
    Cancelation,

    // Profile
    /// Help center
    HelpCenter,
    /// Privacy policy
    PrivacyPolicy,
    /// Logout confirmation
    Logout,
    /// Edit general profile info
    ProfileGeneral,
    /// Edit profile location
    ProfileLocation,
    /// Favorite cars
    Favorites,
}

impl Screen {
    /// Every screen, in declaration order
    pub const ALL: [Screen; 38] = [
        Screen::SplashSequence,
        Screen::Welcome,
        Screen::Second,
        Screen::Third,
        Screen::SignIn,
        Screen::CreateAccount,
        Screen::ForgotPassword,
        Screen::ResetPassword,
        Screen::NewPassword,
        Screen::CompleteProfile,
        Screen::OtpVerification,
        Screen::Home,
        Screen::CarDetails,
        Screen::Filter,
        Screen::Notification,
        Screen::Profile,
        Screen::Gallery,
        Screen::MyBooking,
        Screen::CompletedBooking,
        Screen::CompleteYourBooking,
        Screen::CarBooking,
        Screen::Favorite,
        Screen::Settings,
        Screen::NotificationSettings,
        Screen::PasswordManager,
        Screen::PaymentMethod,
        Screen::Edahabia,
        Screen::PaymentDone,
        Screen::PaymentPending,
        Screen::UnsuccessfulPayment,
        Screen::Bill,
        Screen::Cancelation,
        Screen::HelpCenter,
        Screen::PrivacyPolicy,
        Screen::Logout,
        Screen::ProfileGeneral,
        Screen::ProfileLocation,
        Screen::Favorites,
    ];

    /// Route name, the first path segment
    pub fn name(&self) -> &'static str {
        match self {
            Screen::SplashSequence => "SplashSequence",
            Screen::Welcome => "Welcome",
            Screen::Second => "Second",
            Screen::Third => "Third",
            Screen::SignIn => "SignIn",
            Screen::CreateAccount => "CreateAccount",
            Screen::ForgotPassword => "ForgotPassword",
            Screen::ResetPassword => "ResetPassword",
            Screen::NewPassword => "NewPassword",
            Screen::CompleteProfile => "CompleteProfile",
            Screen::OtpVerification => "OTPVerification",
            Screen::Home => "Home",
            Screen::CarDetails => "CarDetails",
            Screen::Filter => "Filter",
            Screen::Notification => "Notification",
            Screen::Profile => "Profile",
            Screen::Gallery => "Gallery",
            Screen::MyBooking => "MyBooking",
            Screen::CompletedBooking => "CompletedBooking",
            Screen::CompleteYourBooking => "CompleteYourBooking",
            Screen::CarBooking => "CarBooking",
            Screen::Favorite => "Favorite",
            Screen::Settings => "Settings",
            Screen::NotificationSettings => "NotificationSettings",
            Screen::PasswordManager => "PasswordManager",
            Screen::PaymentMethod => "PaymentMethod",
            Screen::Edahabia => "Edahabia",
            Screen::PaymentDone => "PaymentDone",
            Screen::PaymentPending => "PaymentPending",
            Screen::UnsuccessfulPayment => "UnsuccessfulPayment",
            Screen::Bill => "Bill",
            Screen::Cancelation => "Cancelation",
            Screen::HelpCenter => "HelpCenter",
            Screen::PrivacyPolicy => "PrivacyPolicy",
            Screen::Logout => "Logout",
            Screen::ProfileGeneral => "ProfileGeneral",
            Screen::ProfileLocation => "ProfileLocation",
            Screen::Favorites => "Favorites",
        }
    }

    /// Declared parameters, in path order
    pub fn params(&self) -> &'static [ParamSpec] {
        const EMAIL: [ParamSpec; 1] =
            [ParamSpec::query("email", ParamType::String).with_default(ArgDefault::Str(""))];
        const FROM_FORGOT_PASSWORD: [ParamSpec; 1] = [ParamSpec::query(
            "fromForgotPassword",
            ParamType::Bool,
        )
        .with_default(ArgDefault::Bool(false))];
        const CAR_ID: [ParamSpec; 1] = [ParamSpec::path("carId", ParamType::String)];
        const NULLABLE_CAR_ID: [ParamSpec; 1] =
            [ParamSpec::path("carId", ParamType::String).nullable()];
        const DEFAULTED_CAR_ID: [ParamSpec; 1] = [ParamSpec::path("carId", ParamType::String)
            .nullable()
            .with_default(ArgDefault::Str(""))];
        const RESERVATION_ID: [ParamSpec; 1] =
            [ParamSpec::query("reservationId", ParamType::Long).with_default(ArgDefault::Long(0))];

        match self {
            Screen::ResetPassword => &EMAIL,
            Screen::OtpVerification => &FROM_FORGOT_PASSWORD,
            Screen::CarDetails => &CAR_ID,
            Screen::Gallery => &NULLABLE_CAR_ID,
            Screen::CarBooking => &DEFAULTED_CAR_ID,
            Screen::Cancelation => &RESERVATION_ID,
            _ => &[],
        }
    }

    /// Route pattern, e.g. `CarDetails/{carId}` or `ResetPassword?email={email}`
    pub fn pattern(&self) -> String {
        let mut pattern = self.name().to_string();
        let params = self.params();
        for param in params.iter().filter(|p| p.placement == Placement::Path) {
            pattern.push_str(&format!("/{{{}}}", param.name));
        }
        let query: Vec<String> = params
            .iter()
            .filter(|p| p.placement == Placement::Query)
            .map(|p| format!("{0}={{{0}}}", p.name))
            .collect();
        if !query.is_empty() {
            pattern.push('?');
            pattern.push_str(&query.join("&"));
        }
        pattern
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Screen {
    type Err = NavigationError;

    fn from_str(s: &str) -> Result<Self> {
        Screen::ALL
            .into_iter()
            .find(|screen| screen.name() == s)
            .ok_or_else(|| NavigationError::Unmatched(s.to_string()))
    }
}

// =============================================================================
// Route Parameters
// =============================================================================

/// Parameter value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// UTF-8 string
    String,
    /// 32-bit integer
    Int,
    /// 64-bit integer
    Long,
    /// Boolean
    Bool,
    /// 32-bit float
    Float,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamType::String => "string",
            ParamType::Int => "integer",
            ParamType::Long => "long",
            ParamType::Bool => "boolean",
            ParamType::Float => "float",
        };
        f.write_str(name)
    }
}

/// A concrete argument value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArgValue {
    /// String value
    String(String),
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i32),
    /// Long value
    Long(i64),
    /// Float value
    Float(f32),
}

impl ArgValue {
    /// Type of this value
    pub fn param_type(&self) -> ParamType {
        match self {
            ArgValue::String(_) => ParamType::String,
            ArgValue::Bool(_) => ParamType::Bool,
            ArgValue::Int(_) => ParamType::Int,
            ArgValue::Long(_) => ParamType::Long,
            ArgValue::Float(_) => ParamType::Float,
        }
    }

    /// Parse a raw path/query value as `ty`
    pub fn parse(raw: &str, ty: ParamType) -> Option<ArgValue> {
        match ty {
            ParamType::String => Some(ArgValue::String(raw.to_string())),
            ParamType::Bool => raw.parse().ok().map(ArgValue::Bool),
            ParamType::Int => raw.parse().ok().map(ArgValue::Int),
            ParamType::Long => raw.parse().ok().map(ArgValue::Long),
            ParamType::Float => raw.parse().ok().map(ArgValue::Float),
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::String(s) => f.write_str(s),
            ArgValue::Bool(b) => write!(f, "{b}"),
            ArgValue::Int(i) => write!(f, "{i}"),
            ArgValue::Long(l) => write!(f, "{l}"),
            ArgValue::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::String(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::String(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        ArgValue::Int(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Long(value)
    }
}

impl From<f32> for ArgValue {
    fn from(value: f32) -> Self {
        ArgValue::Float(value)
    }
}

/// Compile-time default for a parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArgDefault {
    /// No default
    None,
    /// String default
    Str(&'static str),
    /// Boolean default
    Bool(bool),
    /// Integer default
    Int(i32),
    /// Long default
    Long(i64),
}

impl ArgDefault {
    fn value(&self) -> Option<ArgValue> {
        match *self {
            ArgDefault::None => None,
            ArgDefault::Str(s) => Some(ArgValue::String(s.to_string())),
            ArgDefault::Bool(b) => Some(ArgValue::Bool(b)),
            ArgDefault::Int(i) => Some(ArgValue::Int(i)),
            ArgDefault::Long(l) => Some(ArgValue::Long(l)),
        }
    }
}

/// Where a parameter appears in the route path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// `Screen/{name}`
    Path,
    /// `Screen?name={name}`
    Query,
}

/// A declared route parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Parameter name
    pub name: &'static str,
    /// Value type
    pub ty: ParamType,
    /// Path segment or query pair
    pub placement: Placement,
    /// May be absent
    pub nullable: bool,
    /// Value used when absent
    pub default: ArgDefault,
}

impl ParamSpec {
    /// Required path parameter
    pub const fn path(name: &'static str, ty: ParamType) -> Self {
        Self {
            name,
            ty,
            placement: Placement::Path,
            nullable: false,
            default: ArgDefault::None,
        }
    }

    /// Required query parameter
    pub const fn query(name: &'static str, ty: ParamType) -> Self {
        Self {
            name,
            ty,
            placement: Placement::Query,
            nullable: false,
            default: ArgDefault::None,
        }
    }

    /// Allow the parameter to be absent
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Fall back to `default` when absent
    pub const fn with_default(mut self, default: ArgDefault) -> Self {
        self.default = default;
        self
    }

    /// Whether omitting the parameter is a caller error
    pub fn is_required(&self) -> bool {
        !self.nullable && self.default == ArgDefault::None
    }
}

/// Arguments passed to a route
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteArgs(BTreeMap<String, ArgValue>);

impl RouteArgs {
    /// No arguments
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Look up an argument
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.0.get(name)
    }

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no arguments
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, name: String, value: ArgValue) {
        self.0.insert(name, value);
    }

    fn iter(&self) -> impl Iterator<Item = (&String, &ArgValue)> {
        self.0.iter()
    }
}

// =============================================================================
// Destinations
// =============================================================================

/// A screen bound to checked argument values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    screen: Screen,
    args: RouteArgs,
}

impl Destination {
    /// Bind arguments to a screen
    ///
    /// Checks names and types against the screen's declared parameters and
    /// fills in defaults for absent optional ones.
    pub fn new(screen: Screen, args: RouteArgs) -> Result<Self> {
        let params = screen.params();

        for (name, value) in args.iter() {
            let param = params
                .iter()
                .find(|p| p.name == name.as_str())
                .ok_or_else(|| NavigationError::UnknownArgument {
                    screen,
                    name: name.clone(),
                })?;
            if value.param_type() != param.ty {
                return Err(NavigationError::ArgumentType {
                    screen,
                    name: name.clone(),
                    expected: param.ty,
                });
            }
        }

        let mut resolved = args;
        for param in params {
            if resolved.get(param.name).is_some() {
                continue;
            }
            if let Some(default) = param.default.value() {
                resolved.insert(param.name.to_string(), default);
            } else if param.is_required() {
                return Err(NavigationError::MissingArgument {
                    screen,
                    name: param.name.to_string(),
                });
            }
        }

        Ok(Self {
            screen,
            args: resolved,
        })
    }

    /// Destination for a screen without arguments (or with all defaults)
    pub fn to(screen: Screen) -> Result<Self> {
        Self::new(screen, RouteArgs::new())
    }

    /// Target screen
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Resolved arguments
    pub fn args(&self) -> &RouteArgs {
        &self.args
    }

    /// String argument
    pub fn string_arg(&self, name: &str) -> Option<&str> {
        match self.args.get(name) {
            Some(ArgValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Boolean argument
    pub fn bool_arg(&self, name: &str) -> Option<bool> {
        match self.args.get(name) {
            Some(ArgValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Long argument
    pub fn long_arg(&self, name: &str) -> Option<i64> {
        match self.args.get(name) {
            Some(ArgValue::Long(l)) => Some(*l),
            _ => None,
        }
    }

    /// Render the route path
    ///
    /// Path parameters become segments (empty strings are omitted), query
    /// parameters become `name=value` pairs, all percent-encoded.
    pub fn to_path(&self) -> String {
        let mut path = self.screen.name().to_string();
        let mut query = Vec::new();

        for param in self.screen.params() {
            let Some(value) = self.args.get(param.name) else {
                continue;
            };
            let rendered = value.to_string();
            match param.placement {
                Placement::Path => {
                    if !rendered.is_empty() {
                        path.push('/');
                        path.push_str(&urlencoding::encode(&rendered));
                    }
                }
                Placement::Query => {
                    query.push(format!("{}={}", param.name, urlencoding::encode(&rendered)));
                }
            }
        }

        if !query.is_empty() {
            path.push('?');
            path.push_str(&query.join("&"));
        }
        path
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

// =============================================================================
// Route Table
// =============================================================================

/// Route definition for a navigable screen
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDef {
    /// The screen
    pub screen: Screen,
    /// Its parameters
    pub params: &'static [ParamSpec],
}

/// Registry of navigable screens
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: BTreeMap<Screen, RouteDef>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl RouteTable {
    /// The application's route table
    ///
    /// Every screen except [`Screen::Filter`], whose filtering now happens
    /// inside the home screen.
    pub fn standard() -> Self {
        Self::with_screens(Screen::ALL.into_iter().filter(|s| *s != Screen::Filter))
    }

    /// A table holding exactly the given screens
    pub fn with_screens(screens: impl IntoIterator<Item = Screen>) -> Self {
        let routes = screens
            .into_iter()
            .map(|screen| {
                (
                    screen,
                    RouteDef {
                        screen,
                        params: screen.params(),
                    },
                )
            })
            .collect();
        Self { routes }
    }

    /// Look up a route
    pub fn get(&self, screen: Screen) -> Result<&RouteDef> {
        self.routes
            .get(&screen)
            .ok_or(NavigationError::RouteNotFound(screen))
    }

    /// Whether a screen is navigable
    pub fn contains(&self, screen: Screen) -> bool {
        self.routes.contains_key(&screen)
    }

    /// Number of routes
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Build a destination for a registered screen
    pub fn resolve(&self, screen: Screen, args: RouteArgs) -> Result<Destination> {
        self.get(screen)?;
        Destination::new(screen, args)
    }
}

// =============================================================================
// Back Stack
// =============================================================================

/// A back stack entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackStackEntry {
    /// Unique key for this entry
    pub key: String,
    /// The destination
    pub destination: Destination,
}

impl BackStackEntry {
    /// Create a new entry
    pub fn new(destination: Destination) -> Self {
        Self {
            key: uuid::Uuid::new_v4().to_string(),
            destination,
        }
    }
}

/// How a navigation call changes the back stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackStackEffect {
    /// Push on top
    Push,
    /// Remove entries above the most recent `screen` entry (and that entry
    /// too when `inclusive`), then push
    PopUpTo {
        /// Screen to pop back to
        screen: Screen,
        /// Also remove the matched entry
        inclusive: bool,
    },
    /// Discard all history, then push
    ClearAndPush,
}

/// Ordered navigation history; never empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackStack {
    /// Entries below the top, bottom first
    below: Vec<BackStackEntry>,
    /// Visible entry
    top: BackStackEntry,
}

impl BackStack {
    /// Create a stack with a single root entry
    pub fn new(root: Destination) -> Self {
        Self {
            below: Vec::new(),
            top: BackStackEntry::new(root),
        }
    }

    /// Visible entry
    pub fn current(&self) -> &BackStackEntry {
        &self.top
    }

    /// Push an entry
    pub fn push(&mut self, destination: Destination) {
        let previous = std::mem::replace(&mut self.top, BackStackEntry::new(destination));
        self.below.push(previous);
    }

    /// Pop the top entry (returns false if it is the only one)
    pub fn pop(&mut self) -> bool {
        match self.below.pop() {
            Some(previous) => {
                self.top = previous;
                true
            }
            None => false,
        }
    }

    /// Pop back to the most recent `screen` entry, then push `destination`
    ///
    /// Returns false, and only pushes, if `screen` is not on the stack.
    pub fn pop_up_to_and_push(
        &mut self,
        screen: Screen,
        inclusive: bool,
        destination: Destination,
    ) -> bool {
        let mut entries: Vec<BackStackEntry> = self.entries().cloned().collect();
        let Some(index) = entries
            .iter()
            .rposition(|entry| entry.destination.screen == screen)
        else {
            self.push(destination);
            return false;
        };

        entries.truncate(if inclusive { index } else { index + 1 });
        self.below = entries;
        self.top = BackStackEntry::new(destination);
        true
    }

    /// Discard everything and make `destination` the only entry
    pub fn clear_and_push(&mut self, destination: Destination) {
        *self = Self::new(destination);
    }

    /// All entries, bottom first
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &BackStackEntry> {
        self.below.iter().chain(std::iter::once(&self.top))
    }

    /// Stack depth
    pub fn depth(&self) -> usize {
        self.below.len() + 1
    }

    /// Check if we can go back
    pub fn can_go_back(&self) -> bool {
        !self.below.is_empty()
    }

    /// Whether any entry shows `screen`
    pub fn contains(&self, screen: Screen) -> bool {
        self.entries().any(|e| e.destination.screen == screen)
    }

    /// Rendered paths, bottom first
    pub fn paths(&self) -> Vec<String> {
        self.entries().map(|e| e.destination.to_path()).collect()
    }
}

// =============================================================================
// Navigator
// =============================================================================

/// Navigation capability handed to screens
pub trait Navigator {
    /// Navigate to a prepared destination
    fn navigate_to(&mut self, destination: Destination, effect: BackStackEffect) -> Result<()>;

    /// Go back one entry (returns false at the root)
    fn pop(&mut self) -> bool;

    /// Visible destination
    fn current(&self) -> &Destination;

    /// Navigate to a screen with arguments
    fn navigate(&mut self, screen: Screen, args: RouteArgs, effect: BackStackEffect) -> Result<()> {
        let destination = Destination::new(screen, args)?;
        self.navigate_to(destination, effect)
    }
}

/// Route-table-backed navigator owning the back stack
#[derive(Debug, Clone)]
pub struct NavController {
    table: RouteTable,
    stack: BackStack,
}

impl NavController {
    /// Create a controller starting at `start`
    pub fn new(table: RouteTable, start: Destination) -> Result<Self> {
        table.get(start.screen)?;
        tracing::debug!("Navigation started at: {}", start);
        Ok(Self {
            table,
            stack: BackStack::new(start),
        })
    }

    /// Standard table, starting at the splash sequence
    pub fn standard() -> Result<Self> {
        Self::new(RouteTable::standard(), Destination::to(Screen::SplashSequence)?)
    }

    /// Route table
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Back stack
    pub fn stack(&self) -> &BackStack {
        &self.stack
    }
}

impl Navigator for NavController {
    fn navigate_to(&mut self, destination: Destination, effect: BackStackEffect) -> Result<()> {
        if let Err(e) = self.table.get(destination.screen) {
            tracing::error!("Navigation to unregistered route: {}", destination.screen);
            return Err(e);
        }

        let path = destination.to_path();
        match effect {
            BackStackEffect::Push => self.stack.push(destination),
            BackStackEffect::PopUpTo { screen, inclusive } => {
                if !self.stack.pop_up_to_and_push(screen, inclusive, destination) {
                    tracing::warn!("popUpTo target {} not on back stack, pushed only", screen);
                }
            }
            BackStackEffect::ClearAndPush => self.stack.clear_and_push(destination),
        }
        tracing::debug!("Navigated to: {}", path);
        Ok(())
    }

    fn pop(&mut self) -> bool {
        let popped = self.stack.pop();
        if popped {
            tracing::debug!("Navigated back to: {}", self.stack.current().destination);
        }
        popped
    }

    fn current(&self) -> &Destination {
        &self.stack.current().destination
    }
}

// =============================================================================
// Router
// =============================================================================

/// Parses route paths (deep links) into destinations
#[derive(Debug, Clone, Default)]
pub struct Router {
    table: RouteTable,
}

impl Router {
    /// Create a router over a route table
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    /// Parse a path such as `CarDetails/42` or `Cancelation?reservationId=7`
    pub fn parse(&self, path: &str) -> Result<Destination> {
        let (pathname, query) = match path.split_once('?') {
            Some((pathname, query)) => (pathname, Some(query)),
            None => (path, None),
        };

        let mut segments = pathname.split('/').filter(|s| !s.is_empty());
        let name = segments
            .next()
            .ok_or_else(|| NavigationError::Unmatched(path.to_string()))?;
        let screen: Screen = name
            .parse()
            .map_err(|_| NavigationError::Unmatched(path.to_string()))?;
        let def = self.table.get(screen)?;

        let mut args = RouteArgs::new();
        let mut path_params = def.params.iter().filter(|p| p.placement == Placement::Path);
        for segment in segments {
            let param = path_params
                .next()
                .ok_or_else(|| NavigationError::Unmatched(path.to_string()))?;
            args.insert(param.name.to_string(), Self::decode(screen, param, segment)?);
        }

        for pair in query.into_iter().flat_map(|q| q.split('&')) {
            let Some((key, raw)) = pair.split_once('=') else {
                continue;
            };
            let param = def
                .params
                .iter()
                .find(|p| p.name == key && p.placement == Placement::Query)
                .ok_or_else(|| NavigationError::UnknownArgument {
                    screen,
                    name: key.to_string(),
                })?;
            args.insert(param.name.to_string(), Self::decode(screen, param, raw)?);
        }

        Destination::new(screen, args)
    }

    fn decode(screen: Screen, param: &ParamSpec, raw: &str) -> Result<ArgValue> {
        let type_error = || NavigationError::ArgumentType {
            screen,
            name: param.name.to_string(),
            expected: param.ty,
        };
        let decoded = urlencoding::decode(raw).map_err(|_| type_error())?;
        ArgValue::parse(&decoded, param.ty).ok_or_else(type_error)
    }
}

// =============================================================================
// Tests
// =============================================================================
