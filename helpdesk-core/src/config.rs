use crate::error::ClientError;
use crate::transition::TransitionPolicy;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_SESSION_DB: &str = ".helpdesk/session.db";
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_secs(2);

pub const API_URL_ENV: &str = "HELPDESK_API_URL";
pub const SESSION_DB_ENV: &str = "HELPDESK_SESSION_DB";
pub const REDIRECT_DELAY_ENV: &str = "HELPDESK_REDIRECT_DELAY_MS";
pub const TRANSITIONS_ENV: &str = "HELPDESK_TRANSITIONS";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub session_db_path: PathBuf,
    /// Pause between a successful ticket creation and the jump back to the list.
    pub redirect_delay: Duration,
    pub transition_policy: TransitionPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.into(),
            session_db_path: PathBuf::from(DEFAULT_SESSION_DB),
            redirect_delay: DEFAULT_REDIRECT_DELAY,
            transition_policy: TransitionPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let defaults = Self::default();

        let api_base_url = lookup(API_URL_ENV)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| {
                info!("{API_URL_ENV} not set, using default: {DEFAULT_API_URL}");
                defaults.api_base_url.clone()
            });

        let session_db_path = lookup(SESSION_DB_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.session_db_path);

        let redirect_delay = match lookup(REDIRECT_DELAY_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| ClientError::Config(format!("{REDIRECT_DELAY_ENV}='{raw}': {e}")))?,
            None => defaults.redirect_delay,
        };

        let transition_policy = match lookup(TRANSITIONS_ENV) {
            Some(raw) => raw
                .parse::<TransitionPolicy>()
                .map_err(|e| ClientError::Config(format!("{TRANSITIONS_ENV}: {e}")))?,
            None => defaults.transition_policy,
        };

        Ok(Self {
            api_base_url,
            session_db_path,
            redirect_delay,
            transition_policy,
        })
    }
}
