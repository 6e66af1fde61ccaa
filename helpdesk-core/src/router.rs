//! Access gate in front of the three views.
//!
//! Two states only: authenticated or not. Login and logout are the only
//! transitions between them.

use crate::session::SessionContext;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Tickets,
    CreateTicket,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Tickets => "/",
            Route::CreateTicket => "/create-ticket",
        }
    }

    /// Unknown paths land on the ticket list.
    pub fn from_path(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.trim_end_matches('/') {
            "/login" => Route::Login,
            "/create-ticket" => Route::CreateTicket,
            _ => Route::Tickets,
        }
    }

    pub fn requires_auth(self) -> bool {
        !matches!(self, Route::Login)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthState {
    Authenticated,
    Unauthenticated,
}

impl From<bool> for AuthState {
    fn from(authenticated: bool) -> Self {
        if authenticated {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Redirect(Route),
}

impl Resolution {
    /// The route that ends up on screen.
    pub fn route(self) -> Route {
        match self {
            Resolution::Render(route) | Resolution::Redirect(route) => route,
        }
    }
}

pub fn resolve(requested: Route, auth: AuthState) -> Resolution {
    match (auth, requested) {
        (AuthState::Unauthenticated, route) if route.requires_auth() => {
            Resolution::Redirect(Route::Login)
        }
        (AuthState::Authenticated, Route::Login) => Resolution::Redirect(Route::Tickets),
        (_, route) => Resolution::Render(route),
    }
}

/// A navigation scheduled for later, e.g. back to the list after creating a ticket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Redirect {
    pub to: Route,
    pub after: Duration,
}

#[derive(Clone, Debug)]
pub struct AccessGate {
    session: SessionContext,
}

impl AccessGate {
    pub fn new(session: SessionContext) -> Self {
        Self { session }
    }

    pub fn auth_state(&self) -> AuthState {
        self.session.is_authenticated().into()
    }

    pub fn resolve(&self, requested: Route) -> Resolution {
        resolve(requested, self.auth_state())
    }

    pub fn resolve_path(&self, path: &str) -> Resolution {
        self.resolve(Route::from_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::from_path("/login"), Route::Login);
        assert_eq!(Route::from_path("/create-ticket/"), Route::CreateTicket);
        assert_eq!(Route::from_path("/create-ticket?x=1"), Route::CreateTicket);
        assert_eq!(Route::from_path("/"), Route::Tickets);
        assert_eq!(Route::from_path("/nowhere"), Route::Tickets);
    }

    #[test]
    fn unauthenticated_create_redirects_to_login() {
        assert_eq!(
            resolve(Route::from_path("/create-ticket"), AuthState::Unauthenticated),
            Resolution::Redirect(Route::Login)
        );
        assert_eq!(
            resolve(Route::Tickets, AuthState::Unauthenticated),
            Resolution::Redirect(Route::Login)
        );
        assert_eq!(
            resolve(Route::Login, AuthState::Unauthenticated),
            Resolution::Render(Route::Login)
        );
    }

    #[test]
    fn authenticated_login_redirects_to_list() {
        assert_eq!(
            resolve(Route::Login, AuthState::Authenticated),
            Resolution::Redirect(Route::Tickets)
        );
        assert_eq!(
            resolve(Route::CreateTicket, AuthState::Authenticated),
            Resolution::Render(Route::CreateTicket)
        );
    }

    #[test]
    fn gate_follows_session_context() {
        let gate = AccessGate::new(SessionContext::new());
        assert_eq!(gate.auth_state(), AuthState::Unauthenticated);
        assert_eq!(gate.resolve_path("/").route(), Route::Login);
    }
}
