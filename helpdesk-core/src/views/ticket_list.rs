//! Ticket list screen.
//!
//! The list is a disposable copy of server state. It is never patched
//! locally; every successful mutation is followed by a full re-fetch.
//! Filtering is a pure predicate over that copy and never hits the network.

use crate::api::TicketApi;
use crate::effect::{Confirm, Effectful, TicketCommand};
use crate::error::ClientError;
use crate::transition::{TransitionAction, TransitionPolicy};
use std::fmt;
use std::str::FromStr;
use ticket_schema::{ParseEnumError, Ticket, TicketStatus, User};
use tracing::{info, warn};

pub const EMPTY_LIST_MESSAGE: &str = "No tickets found. Create your first ticket!";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TicketStatus),
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 5] = [
        StatusFilter::All,
        StatusFilter::Only(TicketStatus::Open),
        StatusFilter::Only(TicketStatus::InProgress),
        StatusFilter::Only(TicketStatus::Resolved),
        StatusFilter::Only(TicketStatus::Closed),
    ];

    pub fn matches(self, ticket: &Ticket) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => ticket.status == status,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Only(TicketStatus::Open) => "Open",
            StatusFilter::Only(TicketStatus::InProgress) => "In Progress",
            StatusFilter::Only(TicketStatus::Resolved) => "Resolved",
            StatusFilter::Only(TicketStatus::Closed) => "Closed",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        value.parse::<TicketStatus>().map(StatusFilter::Only)
    }
}

pub fn apply_filter(tickets: &[Ticket], filter: StatusFilter) -> Vec<&Ticket> {
    tickets.iter().filter(|t| filter.matches(t)).collect()
}

/// What a ticket card offers to the current viewer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TicketActions {
    /// Each transition button with its enabled flag.
    pub transitions: Vec<(TransitionAction, bool)>,
    /// Delete is shown to admins only. The server still has the final say.
    pub can_delete: bool,
}

pub fn actions_for(ticket: &Ticket, viewer: &User, policy: TransitionPolicy) -> TicketActions {
    TicketActions {
        transitions: TransitionAction::ALL
            .into_iter()
            .map(|action| (action, policy.allows(ticket.status, action.target())))
            .collect(),
        can_delete: viewer.is_admin(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Sent, succeeded, and the list was re-fetched.
    Applied,
    /// The server applied the change but the re-fetch failed. The list is
    /// stale and the banner holds the fetch error.
    AppliedButStale,
    /// The ticket is not in the current list; nothing was sent.
    NotFound,
    /// The control is disabled for this ticket; nothing was sent.
    Disabled,
    /// The user declined the confirmation.
    Cancelled,
    /// The request failed; the banner holds the message.
    Failed,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TicketListView {
    tickets: Vec<Ticket>,
    filter: StatusFilter,
    loading: bool,
    error: Option<String>,
    policy: TransitionPolicy,
}

impl TicketListView {
    pub fn new(policy: TransitionPolicy) -> Self {
        Self {
            policy,
            loading: true,
            ..Self::default()
        }
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn visible(&self) -> Vec<&Ticket> {
        apply_filter(&self.tickets, self.filter)
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        self.visible().is_empty().then_some(EMPTY_LIST_MESSAGE)
    }

    pub fn actions(&self, ticket: &Ticket, viewer: &User) -> TicketActions {
        actions_for(ticket, viewer, self.policy)
    }

    pub fn begin_fetch(&mut self) {
        self.loading = true;
    }

    pub fn finish_fetch(&mut self, result: Result<Vec<Ticket>, ClientError>) {
        self.loading = false;
        match result {
            Ok(tickets) => {
                self.tickets = tickets;
                self.error = None;
            }
            Err(err) => self.record_failure(&TicketCommand::Refresh, &err),
        }
    }

    pub async fn refresh<A: TicketApi>(&mut self, api: &A) {
        self.begin_fetch();
        let result = api.list_tickets().await;
        self.finish_fetch(result);
    }

    pub fn contains(&self, id: u64) -> bool {
        self.tickets.iter().any(|t| t.id == id)
    }

    /// Whether the control behind `command` is enabled for the current list.
    /// A status change for a ticket already in that status is disabled, as is
    /// one the transition policy forbids. Tickets missing from the list have
    /// no controls at all.
    pub fn is_enabled(&self, command: &TicketCommand) -> bool {
        match *command {
            TicketCommand::SetStatus { id, status } => self
                .tickets
                .iter()
                .find(|t| t.id == id)
                .is_some_and(|t| self.policy.allows(t.status, status)),
            TicketCommand::Refresh | TicketCommand::Delete { .. } => true,
        }
    }

    pub fn record_failure(&mut self, command: &TicketCommand, err: &ClientError) {
        warn!(?command, kind = ?err.kind(), error = %err, "ticket command failed");
        self.error = Some(err.user_message(command.failure_message()));
    }

    /// Run one command end to end: lookup, enabled check, confirmation for
    /// irreversible commands, the request, then a re-fetch if the command
    /// invalidated the list. Read-only commands are the fetch itself.
    pub async fn execute<A, C>(&mut self, api: &A, command: TicketCommand, confirm: &C) -> CommandOutcome
    where
        A: TicketApi,
        C: Confirm + ?Sized,
    {
        if command.target().is_some_and(|id| !self.contains(id)) {
            return CommandOutcome::NotFound;
        }
        if !self.is_enabled(&command) {
            return CommandOutcome::Disabled;
        }
        if let Some(prompt) = command.confirmation_prompt() {
            if command.effect().requires_confirmation() && !confirm.confirm(prompt) {
                return CommandOutcome::Cancelled;
            }
        }

        if !command.effect().invalidates_list() {
            self.refresh(api).await;
            return match self.error {
                Some(_) => CommandOutcome::Failed,
                None => CommandOutcome::Applied,
            };
        }

        if let Err(err) = command.send(api).await {
            self.record_failure(&command, &err);
            return CommandOutcome::Failed;
        }
        info!(?command, "ticket command applied");

        self.refresh(api).await;
        match self.error {
            Some(_) => CommandOutcome::AppliedButStale,
            None => CommandOutcome::Applied,
        }
    }
}
