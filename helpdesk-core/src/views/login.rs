use crate::api::TicketApi;
use crate::error::ClientError;
use crate::router::Route;
use crate::session::{Session, SessionManager};
use crate::storage::KeyValueStore;
use ticket_schema::{Credentials, validate_credentials};

pub const LOGIN_FAILED: &str = "Login failed";

/// Shown under the form: (label, email, password).
pub const DEMO_ACCOUNTS: [(&str, &str, &str); 2] = [
    ("Admin", "admin@example.com", "admin123"),
    ("User", "user@example.com", "user123"),
];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    in_flight: bool,
    error: Option<String>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Start a submit. Returns the credentials to send, or `None` when a
    /// request is already outstanding or a required field is empty.
    pub fn begin_submit(&mut self) -> Option<Credentials> {
        if self.in_flight {
            return None;
        }
        self.error = None;
        let credentials = Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        };
        if let Err(err) = validate_credentials(&credentials) {
            self.error = Some(err.to_string());
            return None;
        }
        self.in_flight = true;
        Some(credentials)
    }

    /// Settle a submit; on success the caller navigates to the returned route.
    pub fn finish_submit(&mut self, result: &Result<Session, ClientError>) -> Option<Route> {
        self.in_flight = false;
        match result {
            Ok(_) => Some(Route::Tickets),
            Err(err) => {
                tracing::info!(error = %err, "login rejected");
                self.error = Some(err.user_message(LOGIN_FAILED));
                None
            }
        }
    }

    pub async fn submit<S, A>(&mut self, sessions: &SessionManager<S>, api: &A) -> Option<Route>
    where
        S: KeyValueStore,
        A: TicketApi,
    {
        let credentials = self.begin_submit()?;
        let result = sessions.login(api, &credentials).await;
        self.finish_submit(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeApi;
    use crate::session::{SessionContext, TOKEN_KEY};
    use crate::storage::MemoryStore;
    use futures::executor::block_on;

    #[test]
    fn empty_fields_are_rejected_without_a_request() {
        let api = FakeApi::seeded();
        let sessions = SessionManager::new(MemoryStore::new(), SessionContext::new());
        let mut form = LoginForm::new();
        form.email = "admin@example.com".into();

        assert_eq!(block_on(form.submit(&sessions, &api)), None);
        assert_eq!(form.error(), Some("Email and password required"));
        assert_eq!(api.calls(), 0);
        assert!(!form.in_flight());
    }

    #[test]
    fn successful_login_navigates_to_list() {
        let api = FakeApi::seeded();
        let store = MemoryStore::new();
        let sessions = SessionManager::new(store.clone(), SessionContext::new());
        let mut form = LoginForm {
            email: "admin@example.com".into(),
            password: "admin123".into(),
            ..LoginForm::default()
        };

        assert_eq!(block_on(form.submit(&sessions, &api)), Some(Route::Tickets));
        assert_eq!(form.error(), None);
        assert!(store.get(TOKEN_KEY).expect("get").is_some());
    }

    #[test]
    fn server_error_message_is_displayed() {
        let api = FakeApi::seeded();
        let sessions = SessionManager::new(MemoryStore::new(), SessionContext::new());
        let mut form = LoginForm {
            email: "admin@example.com".into(),
            password: "wrong".into(),
            ..LoginForm::default()
        };

        assert_eq!(block_on(form.submit(&sessions, &api)), None);
        assert_eq!(form.error(), Some("Invalid credentials"));
        form.dismiss_error();
        assert_eq!(form.error(), None);
    }

    #[test]
    fn second_submit_while_in_flight_is_ignored() {
        let mut form = LoginForm {
            email: "a@b.c".into(),
            password: "pw".into(),
            ..LoginForm::default()
        };
        assert!(form.begin_submit().is_some());
        assert!(form.begin_submit().is_none());
        form.finish_submit(&Err(ClientError::Api {
            status: 500,
            message: None,
        }));
        assert_eq!(form.error(), Some(LOGIN_FAILED));
        assert!(form.begin_submit().is_some());
    }
}
