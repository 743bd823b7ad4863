// cafe-client/src/routes.rs
// 客户端路由

use std::fmt;
use std::str::FromStr;

/// Client-side routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Menu,
    Reservation,
    Contact,
    About,
    Login,
    Register,
    Logout,
    Dashboard,
    ContactManagement,
    ReservationManagement,
}

impl Route {
    pub const ALL: [Route; 11] = [
        Route::Home,
        Route::Menu,
        Route::Reservation,
        Route::Contact,
        Route::About,
        Route::Login,
        Route::Register,
        Route::Logout,
        Route::Dashboard,
        Route::ContactManagement,
        Route::ReservationManagement,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Menu => "/menu",
            Route::Reservation => "/reservation",
            Route::Contact => "/contact",
            Route::About => "/about",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Logout => "/logout",
            Route::Dashboard => "/dashboard",
            Route::ContactManagement => "/dashboard/contacts",
            Route::ReservationManagement => "/dashboard/reservations",
        }
    }

    /// Requires a signed-in admin
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::Dashboard | Route::ContactManagement | Route::ReservationManagement
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown route: {0}")]
pub struct UnknownRoute(pub String);

impl FromStr for Route {
    type Err = UnknownRoute;

    /// Query string and fragment are ignored, a trailing slash is tolerated
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Route::ALL
            .into_iter()
            .find(|r| r.path() == path)
            .ok_or_else(|| UnknownRoute(s.to_string()))
    }
}
