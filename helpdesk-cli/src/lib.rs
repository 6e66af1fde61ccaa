pub mod commands;
pub mod prompt;
pub mod render;
pub mod state;

use crate::commands::CommandError;
use crate::prompt::{AssumeYes, StdinConfirm};
use crate::state::AppState;
use clap::{Parser, Subcommand};
use helpdesk_core::storage::KeyValueStore;
use helpdesk_core::transition::TransitionAction;
use helpdesk_core::views::login::DEMO_ACCOUNTS;
use helpdesk_core::views::StatusFilter;
use helpdesk_core::{ClientConfig, ViewScope};
use serde::Serialize;
use std::path::PathBuf;
use ticket_schema::Priority;

#[derive(Parser, Debug)]
#[command(name = "helpdesk")]
#[command(about = "Terminal client for the helpdesk ticket system")]
pub struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// API base URL (overrides HELPDESK_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Session database file (overrides HELPDESK_SESSION_DB)
    #[arg(long, global = true)]
    pub session_db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami {
        /// Ask the server instead of reading the stored session
        #[arg(long)]
        remote: bool,
    },
    /// List tickets
    List {
        /// all, open, in_progress, resolved or closed
        #[arg(long, default_value = "all")]
        filter: StatusFilter,
    },
    /// Move a ticket to in progress
    Start { id: u64 },
    /// Mark a ticket resolved
    Resolve { id: u64 },
    /// Close a ticket
    Close { id: u64 },
    /// Delete a ticket (admins only)
    Delete {
        id: u64,
        /// Skip the confirmation question
        #[arg(long)]
        yes: bool,
    },
    /// Open a new ticket
    Create {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "medium")]
        priority: Priority,
    },
    /// Check that the API is reachable
    Health,
}

impl Cli {
    /// Apply command-line overrides on top of the environment config.
    pub fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(url) = &self.api_url {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(path) = &self.session_db {
            config.session_db_path = path.clone();
        }
    }
}

/// Run one command to completion, or until `scope` is closed.
pub async fn run<S: KeyValueStore>(
    state: &AppState<S>,
    cli: Cli,
    scope: &ViewScope,
) -> anyhow::Result<()> {
    let json = cli.json;
    match scope.guard(dispatch(state, cli.command, json)).await {
        Some(result) => result,
        None => anyhow::bail!("interrupted"),
    }
}

async fn dispatch<S: KeyValueStore>(
    state: &AppState<S>,
    command: Command,
    json: bool,
) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            let result = commands::login(state, email, password).await;
            if result.is_err() && !json {
                println!("{}", render::demo_hint(&DEMO_ACCOUNTS));
            }
            emit(json, &result?, render::user)
        }
        Command::Logout => {
            commands::logout(state)?;
            emit(json, &serde_json::json!({ "logged_out": true }), |_| {
                "Signed out.".to_string()
            })
        }
        Command::Whoami { remote } => emit(json, &commands::whoami(state, remote).await?, render::user),
        Command::List { filter } => emit(json, &commands::list(state, filter).await?, render::list),
        Command::Start { id } => transition(state, id, TransitionAction::Start, json).await,
        Command::Resolve { id } => transition(state, id, TransitionAction::Resolve, json).await,
        Command::Close { id } => transition(state, id, TransitionAction::Close, json).await,
        Command::Delete { id, yes } => {
            let listed = if yes {
                commands::delete(state, id, &AssumeYes).await
            } else {
                commands::delete(state, id, &StdinConfirm).await
            };
            match listed {
                Err(CommandError::Cancelled) => emit(json, &NotDeleted::new(id), |_| {
                    "Nothing deleted.".to_string()
                }),
                other => emit(json, &other?, render::list),
            }
        }
        Command::Create {
            title,
            description,
            priority,
        } => {
            let created = commands::create(state, title, description, priority).await?;
            emit(json, &created, render::created)?;
            tokio::time::sleep(std::time::Duration::from_millis(created.redirect_after_ms)).await;
            emit(
                json,
                &commands::list(state, StatusFilter::All).await?,
                render::list,
            )
        }
        Command::Health => emit(json, &commands::health(state).await?, |h| {
            format!("{} is {}", h.service, h.status)
        }),
    }
}

async fn transition<S: KeyValueStore>(
    state: &AppState<S>,
    id: u64,
    action: TransitionAction,
    json: bool,
) -> anyhow::Result<()> {
    emit(json, &commands::transition(state, id, action).await?, render::list)
}

/// Result of a delete the user declined.
#[derive(Serialize)]
struct NotDeleted {
    id: u64,
    deleted: bool,
    cancelled: bool,
}

impl NotDeleted {
    fn new(id: u64) -> Self {
        Self {
            id,
            deleted: false,
            cancelled: true,
        }
    }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl Fn(&T) -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text(value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticket_schema::TicketStatus;

    #[test]
    fn parses_filter_and_priority_values() {
        let cli = Cli::try_parse_from(["helpdesk", "list", "--filter", "in_progress"]).expect("parse");
        assert!(matches!(
            cli.command,
            Command::List { filter: StatusFilter::Only(TicketStatus::InProgress) }
        ));

        let cli = Cli::try_parse_from([
            "helpdesk", "create", "--title", "t", "--description", "d", "--priority", "HIGH",
        ])
        .expect("parse");
        assert!(matches!(cli.command, Command::Create { priority: Priority::High, .. }));

        assert!(Cli::try_parse_from(["helpdesk", "list", "--filter", "pending"]).is_err());
    }

    #[test]
    fn declined_delete_serializes_as_json() {
        let value = serde_json::to_value(NotDeleted::new(3)).expect("json");
        assert_eq!(
            value,
            serde_json::json!({ "id": 3, "deleted": false, "cancelled": true })
        );
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "helpdesk", "--api-url", "http://api.test/", "--session-db", "/tmp/s.db", "health",
        ])
        .expect("parse");
        let mut config = ClientConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.api_base_url, "http://api.test");
        assert_eq!(config.session_db_path, PathBuf::from("/tmp/s.db"));
    }
}
