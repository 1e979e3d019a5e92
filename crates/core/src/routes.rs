//! Route table and the guard in front of protected screens

use crate::identity::SessionUser;
use crate::session::Session;
use std::fmt;
use tracing::debug;

/// Every screen of the booking front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Root,
    Login,
    Signup,
    Home,
    UserProfile,
    BookingDetails,
    SearchResults,
    HotelInfo { hotel_id: u64 },
    ManagerDashboard,
    ManagerHotel { hotel_id: u64 },
    ManagerRoom { hotel_id: u64, room_id: u64 },
    NotFound,
}

impl Route {
    /// Match a path against the route table
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Root,
            ["login"] => Self::Login,
            ["signup"] => Self::Signup,
            ["home"] => Self::Home,
            ["user-profile"] => Self::UserProfile,
            ["booking-details"] => Self::BookingDetails,
            ["search-results"] => Self::SearchResults,
            ["hotels", hotel_id, "info"] => {
                hotel_id.parse().map_or(Self::NotFound, |hotel_id| Self::HotelInfo { hotel_id })
            }
            ["manager-dashboard"] => Self::ManagerDashboard,
            ["manager-dashboard", "hotels", hotel_id] => hotel_id
                .parse()
                .map_or(Self::NotFound, |hotel_id| Self::ManagerHotel { hotel_id }),
            ["manager-dashboard", "hotels", hotel_id, "rooms", room_id] => {
                match (hotel_id.parse(), room_id.parse()) {
                    (Ok(hotel_id), Ok(room_id)) => Self::ManagerRoom { hotel_id, room_id },
                    _ => Self::NotFound,
                }
            }
            _ => Self::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Root => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::Home => "/home".to_string(),
            Self::UserProfile => "/user-profile".to_string(),
            Self::BookingDetails => "/booking-details".to_string(),
            Self::SearchResults => "/search-results".to_string(),
            Self::HotelInfo { hotel_id } => format!("/hotels/{hotel_id}/info"),
            Self::ManagerDashboard => "/manager-dashboard".to_string(),
            Self::ManagerHotel { hotel_id } => format!("/manager-dashboard/hotels/{hotel_id}"),
            Self::ManagerRoom { hotel_id, room_id } => {
                format!("/manager-dashboard/hotels/{hotel_id}/rooms/{room_id}")
            }
            Self::NotFound => "/404".to_string(),
        }
    }

    /// Screens that need a logged-in user
    pub const fn is_protected(&self) -> bool {
        !matches!(
            self,
            Self::Root | Self::Login | Self::Signup | Self::NotFound
        )
    }

    /// Where a user lands right after logging in
    pub fn landing_for(user: &SessionUser) -> Self {
        if user.is_manager() {
            Self::ManagerDashboard
        } else {
            Self::Home
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of navigating to a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

/// Sends unauthenticated navigation to the login screen
pub struct RouteGuard<'a> {
    session: &'a Session,
}

impl<'a> RouteGuard<'a> {
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub fn navigate(&self, route: Route) -> Navigation {
        Self::resolve(route, self.session.is_authenticated())
    }

    /// Pure routing decision, given whether a user is logged in
    pub fn resolve(route: Route, authenticated: bool) -> Navigation {
        let navigation = match route {
            Route::Root => Navigation::Redirect(Route::Login),
            route if route.is_protected() && !authenticated => Navigation::Redirect(Route::Login),
            route => Navigation::Render(route),
        };
        debug!("Navigating to {route}: {navigation:?}");
        navigation
    }
}
