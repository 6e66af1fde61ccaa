use helpdesk_core::storage::{KeyValueStore, SqliteStore};
use helpdesk_core::{
    AccessGate, ClientConfig, ClientError, HttpTicketApi, SessionContext, SessionManager,
};

/// Everything one command invocation needs, wired to a single session
/// context shared by the API client and the access gate.
#[derive(Clone, Debug)]
pub struct AppState<S> {
    pub config: ClientConfig,
    pub sessions: SessionManager<S>,
    pub api: HttpTicketApi,
    pub gate: AccessGate,
}

impl<S: KeyValueStore> AppState<S> {
    /// Wire the pieces and restore whatever session `store` holds.
    pub fn new(config: ClientConfig, store: S) -> Result<Self, ClientError> {
        let context = SessionContext::new();
        let sessions = SessionManager::new(store, context.clone());
        sessions.restore()?;

        Ok(Self {
            api: HttpTicketApi::new(config.api_base_url.clone(), context.clone()),
            gate: AccessGate::new(context),
            sessions,
            config,
        })
    }
}

pub fn build_state(config: ClientConfig) -> Result<AppState<SqliteStore>, ClientError> {
    let store = SqliteStore::open(&config.session_db_path)?;
    AppState::new(config, store)
}
