use crate::api::TicketApi;
use crate::error::ClientError;
use ticket_schema::TicketStatus;

/// Side-effect class of a list command, ordered by severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Reads server state.
    Observe,
    /// Changes server state; the previous value can be set again.
    Mutate,
    /// Cannot be undone from the client.
    Irreversible,
}

impl Effect {
    pub fn requires_confirmation(self) -> bool {
        matches!(self, Effect::Irreversible)
    }

    /// Whether the list must be re-fetched once the command succeeds.
    pub fn invalidates_list(self) -> bool {
        !matches!(self, Effect::Observe)
    }
}

pub trait Effectful {
    fn effect(&self) -> Effect;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TicketCommand {
    Refresh,
    SetStatus { id: u64, status: TicketStatus },
    Delete { id: u64 },
}

impl Effectful for TicketCommand {
    fn effect(&self) -> Effect {
        match self {
            TicketCommand::Refresh => Effect::Observe,
            TicketCommand::SetStatus { .. } => Effect::Mutate,
            TicketCommand::Delete { .. } => Effect::Irreversible,
        }
    }
}

impl TicketCommand {
    /// The ticket this command acts on, if any.
    pub fn target(&self) -> Option<u64> {
        match *self {
            TicketCommand::Refresh => None,
            TicketCommand::SetStatus { id, .. } | TicketCommand::Delete { id } => Some(id),
        }
    }

    pub fn confirmation_prompt(&self) -> Option<&'static str> {
        match self {
            TicketCommand::Delete { .. } => Some("Are you sure you want to delete this ticket?"),
            _ => None,
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            TicketCommand::Refresh => "Failed to fetch tickets",
            TicketCommand::SetStatus { .. } => "Failed to update ticket",
            TicketCommand::Delete { .. } => "Failed to delete ticket",
        }
    }

    /// Issue the request. `Refresh` is a no-op here; the list view fetches
    /// itself.
    pub async fn send<A: TicketApi>(&self, api: &A) -> Result<(), ClientError> {
        match *self {
            TicketCommand::Refresh => Ok(()),
            TicketCommand::SetStatus { id, status } => api.update_status(id, status).await.map(|_| ()),
            TicketCommand::Delete { id } => api.delete_ticket(id).await,
        }
    }
}

/// The interactive yes/no step in front of irreversible commands.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_delete_needs_confirmation() {
        assert!(!TicketCommand::Refresh.effect().requires_confirmation());
        assert!(!TicketCommand::SetStatus {
            id: 1,
            status: TicketStatus::Closed
        }
        .effect()
        .requires_confirmation());
        assert!(TicketCommand::Delete { id: 1 }.effect().requires_confirmation());
    }

    #[test]
    fn mutations_invalidate_the_list() {
        assert!(!Effect::Observe.invalidates_list());
        assert!(Effect::Mutate.invalidates_list());
        assert!(Effect::Irreversible.invalidates_list());
    }

    #[test]
    fn target_is_the_ticket_id() {
        assert_eq!(TicketCommand::Refresh.target(), None);
        assert_eq!(TicketCommand::Delete { id: 7 }.target(), Some(7));
        assert_eq!(
            TicketCommand::SetStatus {
                id: 3,
                status: TicketStatus::Open
            }
            .target(),
            Some(3)
        );
    }

    #[test]
    fn closures_confirm() {
        let yes = |_: &str| true;
        let no = |_: &str| false;
        assert!(yes.confirm("delete?"));
        assert!(!no.confirm("delete?"));
    }
}
