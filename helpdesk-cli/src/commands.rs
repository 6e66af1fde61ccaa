use crate::state::AppState;
use helpdesk_core::badge::{priority_badge, status_badge};
use helpdesk_core::effect::{Confirm, TicketCommand};
use helpdesk_core::storage::KeyValueStore;
use helpdesk_core::transition::TransitionAction;
use helpdesk_core::views::{CommandOutcome, LoginForm, StatusFilter, TicketForm, TicketListView};
use helpdesk_core::{ClientError, Resolution, Route};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ticket_schema::{HealthResponse, Priority, Ticket, User};
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum CommandError {
    /// The access gate sent the caller somewhere else.
    #[error("not signed in; redirecting to {} (run `helpdesk login`)", .0.path())]
    Redirected(Route),
    /// A view rejected the action and shows this banner text.
    #[error("{0}")]
    Rejected(String),
    #[error("ticket {0} not found")]
    NotFound(u64),
    #[error("ticket {id}: {action} is not available from its current status")]
    Disabled { id: u64, action: &'static str },
    #[error("cancelled")]
    Cancelled,
    #[error(transparent)]
    Client(#[from] ClientError),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserDto {
    pub email: String,
    pub name: String,
    pub role: String,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BadgeDto {
    pub label: String,
    pub class: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TicketRowDto {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub status: BadgeDto,
    pub priority: BadgeDto,
    pub created_by: String,
    pub created_at: String,
    /// Transition buttons that are enabled for this ticket.
    pub actions: Vec<String>,
    pub can_delete: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TicketListDto {
    pub filter: String,
    pub tickets: Vec<TicketRowDto>,
    pub empty_message: Option<String>,
    /// Set when a change went through but the list could not be re-read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatedDto {
    pub message: String,
    pub redirect_to: String,
    pub redirect_after_ms: u64,
}

fn require<S: KeyValueStore>(state: &AppState<S>, route: Route) -> Result<User, CommandError> {
    match state.gate.resolve(route) {
        Resolution::Render(_) => state
            .sessions
            .context()
            .user()
            .ok_or(CommandError::Redirected(Route::Login)),
        Resolution::Redirect(to) => Err(CommandError::Redirected(to)),
    }
}

/// Returns the signed-in user. An existing session short-circuits the form,
/// the same way the login page bounces authenticated visitors to the list.
pub async fn login<S: KeyValueStore>(
    state: &AppState<S>,
    email: String,
    password: String,
) -> Result<UserDto, CommandError> {
    if let Resolution::Redirect(_) = state.gate.resolve(Route::Login) {
        if let Some(user) = state.sessions.context().user() {
            return Ok(UserDto::from(&user));
        }
    }

    let mut form = LoginForm::new();
    form.email = email;
    form.password = password;
    match form.submit(&state.sessions, &state.api).await {
        Some(_) => {
            let user = require(state, Route::Tickets)?;
            info!(email = %user.email, role = %user.role, "signed in");
            Ok(UserDto::from(&user))
        }
        None => {
            warn!(email = %form.email, "sign-in rejected");
            Err(rejected(form.error()))
        }
    }
}

pub fn logout<S: KeyValueStore>(state: &AppState<S>) -> Result<(), CommandError> {
    state.sessions.logout()?;
    info!("signed out");
    Ok(())
}

pub async fn whoami<S: KeyValueStore>(state: &AppState<S>, remote: bool) -> Result<UserDto, CommandError> {
    let user = require(state, Route::Tickets)?;
    if remote {
        return Ok(UserDto::from(&state.api.me().await?));
    }
    Ok(UserDto::from(&user))
}

pub async fn list<S: KeyValueStore>(
    state: &AppState<S>,
    filter: StatusFilter,
) -> Result<TicketListDto, CommandError> {
    let user = require(state, Route::Tickets)?;
    let mut view = TicketListView::new(state.config.transition_policy);
    view.set_filter(filter);
    view.refresh(&state.api).await;
    if let Some(err) = view.error() {
        return Err(CommandError::Rejected(err.to_string()));
    }
    Ok(list_dto(&view, &user))
}

pub async fn transition<S: KeyValueStore>(
    state: &AppState<S>,
    id: u64,
    action: TransitionAction,
) -> Result<TicketListDto, CommandError> {
    let command = TicketCommand::SetStatus {
        id,
        status: action.target(),
    };
    run_list_command(state, command, &|_: &str| true)
        .await
        .map_err(|err| match err {
            CommandError::Disabled { id, .. } => CommandError::Disabled {
                id,
                action: action.label(),
            },
            other => other,
        })
}

pub async fn delete<S, C>(state: &AppState<S>, id: u64, confirm: &C) -> Result<TicketListDto, CommandError>
where
    S: KeyValueStore,
    C: Confirm + ?Sized,
{
    run_list_command(state, TicketCommand::Delete { id }, confirm).await
}

async fn run_list_command<S, C>(
    state: &AppState<S>,
    command: TicketCommand,
    confirm: &C,
) -> Result<TicketListDto, CommandError>
where
    S: KeyValueStore,
    C: Confirm + ?Sized,
{
    let user = require(state, Route::Tickets)?;
    let mut view = TicketListView::new(state.config.transition_policy);
    view.refresh(&state.api).await;
    if let Some(err) = view.error() {
        return Err(CommandError::Rejected(err.to_string()));
    }

    let outcome = view.execute(&state.api, command, confirm).await;
    let id = command.target().unwrap_or_default();
    match outcome {
        CommandOutcome::Applied => Ok(list_dto(&view, &user)),
        CommandOutcome::AppliedButStale => {
            warn!(?command, "ticket command applied but the list could not be refreshed");
            let mut listed = list_dto(&view, &user);
            listed.warning = view.error().map(ToString::to_string);
            Ok(listed)
        }
        CommandOutcome::Cancelled => Err(CommandError::Cancelled),
        CommandOutcome::Failed => Err(rejected(view.error())),
        CommandOutcome::NotFound => {
            warn!(id, "ticket not in list");
            Err(CommandError::NotFound(id))
        }
        CommandOutcome::Disabled => {
            warn!(?command, "ticket command disabled");
            Err(CommandError::Disabled {
                id,
                action: "this action",
            })
        }
    }
}

/// Submit the new-ticket form. The caller waits out the returned redirect
/// before showing the list again.
pub async fn create<S: KeyValueStore>(
    state: &AppState<S>,
    title: String,
    description: String,
    priority: Priority,
) -> Result<CreatedDto, CommandError> {
    require(state, Route::CreateTicket)?;
    let mut form = TicketForm::new();
    form.title = title;
    form.description = description;
    form.priority = priority;
    let Some(redirect) = form.submit(&state.api, state.config.redirect_delay).await else {
        warn!(error = form.error().unwrap_or_default(), "ticket not created");
        return Err(rejected(form.error()));
    };
    info!(priority = %priority, "ticket created");

    Ok(CreatedDto {
        message: form.success().unwrap_or_default().to_string(),
        redirect_to: redirect.to.path().to_string(),
        redirect_after_ms: u64::try_from(redirect.after.as_millis()).unwrap_or(u64::MAX),
    })
}

pub async fn health<S: KeyValueStore>(state: &AppState<S>) -> Result<HealthResponse, CommandError> {
    Ok(state.api.health().await?)
}

fn rejected(message: Option<&str>) -> CommandError {
    CommandError::Rejected(message.unwrap_or("request failed").to_string())
}

fn list_dto(view: &TicketListView, viewer: &User) -> TicketListDto {
    TicketListDto {
        filter: view.filter().label().to_string(),
        tickets: view.visible().into_iter().map(|t| row_dto(view, t, viewer)).collect(),
        empty_message: view.empty_message().map(ToString::to_string),
        warning: None,
    }
}

fn row_dto(view: &TicketListView, ticket: &Ticket, viewer: &User) -> TicketRowDto {
    let status = status_badge(ticket.status);
    let priority = priority_badge(ticket.priority);
    let actions = view.actions(ticket, viewer);
    TicketRowDto {
        id: ticket.id,
        title: ticket.title.clone(),
        description: ticket.description.clone(),
        status: BadgeDto {
            label: status.label.to_string(),
            class: status.style.css_class().to_string(),
        },
        priority: BadgeDto {
            label: priority.label.to_string(),
            class: priority.style.css_class().to_string(),
        },
        created_by: ticket.created_by.clone(),
        created_at: ticket.created_at.clone(),
        actions: actions
            .transitions
            .into_iter()
            .filter(|(_, enabled)| *enabled)
            .map(|(action, _)| action.label().to_string())
            .collect(),
        can_delete: actions.can_delete,
    }
}
