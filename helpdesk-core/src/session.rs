//! Authenticated identity held by the client.
//!
//! `SessionContext` is the shared, read-mostly handle that views and the API
//! client consult. Only `SessionManager` writes to it, and it mirrors every
//! write into durable storage under the fixed keys [`TOKEN_KEY`] and
//! [`USER_KEY`]. No expiry is tracked; a token is trusted until the server
//! rejects it.

use crate::api::TicketApi;
use crate::error::ClientError;
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use ticket_schema::{Credentials, User, validate_credentials};
use tracing::{info, warn};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Clone, Debug, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Session> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn token(&self) -> Option<String> {
        self.current().map(|s| s.token)
    }

    pub fn user(&self) -> Option<User> {
        self.current().map(|s| s.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn replace(&self, session: Option<Session>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = session;
    }
}

#[derive(Clone, Debug)]
pub struct SessionManager<S> {
    store: S,
    context: SessionContext,
}

impl<S: KeyValueStore> SessionManager<S> {
    pub fn new(store: S, context: SessionContext) -> Self {
        Self { store, context }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Rebuild the session from storage on startup.
    ///
    /// Both keys must be present and the user record must decode. A partial
    /// or corrupt pair is cleared and treated as no session.
    pub fn restore(&self) -> Result<Option<Session>, ClientError> {
        let token = self.store.get(TOKEN_KEY)?;
        let user = self.store.get(USER_KEY)?;

        let session = match (token, user) {
            (Some(token), Some(raw_user)) => match serde_json::from_str::<User>(&raw_user) {
                Ok(user) => Some(Session { token, user }),
                Err(err) => {
                    warn!(error = %err, "stored user record is unreadable; clearing session");
                    self.clear_storage()?;
                    None
                }
            },
            (None, None) => None,
            _ => {
                warn!("found only one of token/user in storage; clearing session");
                self.clear_storage()?;
                None
            }
        };

        self.context.replace(session.clone());
        Ok(session)
    }

    pub async fn login<A: TicketApi>(
        &self,
        api: &A,
        credentials: &Credentials,
    ) -> Result<Session, ClientError> {
        validate_credentials(credentials)?;
        let response = api.login(credentials).await?;
        let session = Session {
            token: response.access_token,
            user: response.user,
        };

        self.store.set(TOKEN_KEY, &session.token)?;
        self.store.set(USER_KEY, &serde_json::to_string(&session.user)?)?;
        self.context.replace(Some(session.clone()));

        info!(email = %session.user.email, role = %session.user.role, "logged in");
        Ok(session)
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        let was = self.context.user();
        self.context.replace(None);
        self.clear_storage()?;
        if let Some(user) = was {
            info!(email = %user.email, "logged out");
        }
        Ok(())
    }

    fn clear_storage(&self) -> Result<(), ClientError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)
    }
}
