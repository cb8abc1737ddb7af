// src/models/navigation.rs
// Route tree of the mobile client: `/(group)/screen`.
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RouteGroup {
    Onboarding,
    Auth,
    Dashboard,
    Driver,
    Passenger,
}

impl RouteGroup {
    pub fn segment(&self) -> Option<&'static str> {
        match self {
            RouteGroup::Onboarding => None,
            RouteGroup::Auth => Some("(auth)"),
            RouteGroup::Dashboard => Some("(dashboard)"),
            RouteGroup::Driver => Some("(driver)"),
            RouteGroup::Passenger => Some("(passenger)"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AppRoute {
    Onboarding,
    Login,
    Register,
    ForgotPassword,
    Dashboard,
    DriverHome,
    DriverStatus,
    DriverCheckIn,
    DriverEarnings,
    DriverProfile,
    PassengerHome,
    PassengerTrips,
    PassengerPayments,
    PassengerSafety,
    PassengerProfile,
}

impl AppRoute {
    pub const ALL: [AppRoute; 15] = [
        AppRoute::Onboarding,
        AppRoute::Login,
        AppRoute::Register,
        AppRoute::ForgotPassword,
        AppRoute::Dashboard,
        AppRoute::DriverHome,
        AppRoute::DriverStatus,
        AppRoute::DriverCheckIn,
        AppRoute::DriverEarnings,
        AppRoute::DriverProfile,
        AppRoute::PassengerHome,
        AppRoute::PassengerTrips,
        AppRoute::PassengerPayments,
        AppRoute::PassengerSafety,
        AppRoute::PassengerProfile,
    ];

    pub fn group(&self) -> RouteGroup {
        match self {
            AppRoute::Onboarding => RouteGroup::Onboarding,
            AppRoute::Login | AppRoute::Register | AppRoute::ForgotPassword => RouteGroup::Auth,
            AppRoute::Dashboard => RouteGroup::Dashboard,
            AppRoute::DriverHome
            | AppRoute::DriverStatus
            | AppRoute::DriverCheckIn
            | AppRoute::DriverEarnings
            | AppRoute::DriverProfile => RouteGroup::Driver,
            AppRoute::PassengerHome
            | AppRoute::PassengerTrips
            | AppRoute::PassengerPayments
            | AppRoute::PassengerSafety
            | AppRoute::PassengerProfile => RouteGroup::Passenger,
        }
    }

    /// Screen name inside its group; `None` for the group's index.
    fn screen(&self) -> Option<&'static str> {
        match self {
            AppRoute::Register => Some("Register"),
            AppRoute::ForgotPassword => Some("ForgotPassword"),
            AppRoute::DriverStatus => Some("status"),
            AppRoute::DriverCheckIn => Some("check-in"),
            AppRoute::DriverEarnings => Some("earnings"),
            AppRoute::DriverProfile | AppRoute::PassengerProfile => Some("profile"),
            AppRoute::PassengerTrips => Some("trips"),
            AppRoute::PassengerPayments => Some("payments"),
            AppRoute::PassengerSafety => Some("safety"),
            _ => None,
        }
    }

    /// Tab bar entries live in the driver and passenger groups.
    pub fn is_tab(&self) -> bool {
        matches!(self.group(), RouteGroup::Driver | RouteGroup::Passenger)
    }

    pub fn path(&self) -> String {
        match (self.group().segment(), self.screen()) {
            (None, _) => "/".to_string(),
            (Some(group), None) => format!("/{}", group),
            (Some(group), Some(screen)) => format!("/{}/{}", group, screen),
        }
    }

    /// Accepts `/(driver)/check-in`, `(driver)/check-in` and `/(driver)/index`.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim().trim_matches('/');
        let normalized = trimmed.strip_suffix("/index").unwrap_or(trimmed);
        let normalized = if normalized == "index" { "" } else { normalized };
        let wanted = format!("/{}", normalized);
        Self::ALL.into_iter().find(|route| route.path() == wanted)
    }
}

/// A route as the client's router sees it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub route: AppRoute,
    pub path: String,
    pub group: RouteGroup,
    pub is_tab: bool,
}

impl From<AppRoute> for RouteInfo {
    fn from(route: AppRoute) -> Self {
        Self {
            route,
            path: route.path(),
            group: route.group(),
            is_tab: route.is_tab(),
        }
    }
}
