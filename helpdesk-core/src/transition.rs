//! Status transitions offered on a ticket card.
//!
//! The server accepts any status from any other. `TransitionPolicy::Sequential`
//! narrows the client to the forward chain open -> in_progress -> resolved -> closed.

use std::fmt;
use std::str::FromStr;
use ticket_schema::TicketStatus;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionPolicy {
    #[default]
    Unrestricted,
    Sequential,
}

impl TransitionPolicy {
    pub fn allows(self, from: TicketStatus, to: TicketStatus) -> bool {
        if from == to {
            return false;
        }
        match self {
            TransitionPolicy::Unrestricted => true,
            TransitionPolicy::Sequential => rank(to) == rank(from) + 1,
        }
    }
}

fn rank(status: TicketStatus) -> u8 {
    match status {
        TicketStatus::Open => 0,
        TicketStatus::InProgress => 1,
        TicketStatus::Resolved => 2,
        TicketStatus::Closed => 3,
    }
}

impl fmt::Display for TransitionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionPolicy::Unrestricted => f.write_str("unrestricted"),
            TransitionPolicy::Sequential => f.write_str("sequential"),
        }
    }
}

impl FromStr for TransitionPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unrestricted" => Ok(TransitionPolicy::Unrestricted),
            "sequential" => Ok(TransitionPolicy::Sequential),
            other => Err(format!("unknown transition policy '{other}'")),
        }
    }
}

/// The three buttons on a ticket card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionAction {
    Start,
    Resolve,
    Close,
}

impl TransitionAction {
    pub const ALL: [TransitionAction; 3] = [
        TransitionAction::Start,
        TransitionAction::Resolve,
        TransitionAction::Close,
    ];

    pub fn target(self) -> TicketStatus {
        match self {
            TransitionAction::Start => TicketStatus::InProgress,
            TransitionAction::Resolve => TicketStatus::Resolved,
            TransitionAction::Close => TicketStatus::Closed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransitionAction::Start => "Start",
            TransitionAction::Resolve => "Resolve",
            TransitionAction::Close => "Close",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrestricted_allows_everything_but_the_current_status() {
        let policy = TransitionPolicy::Unrestricted;
        for from in TicketStatus::ALL {
            for to in TicketStatus::ALL {
                assert_eq!(policy.allows(from, to), from != to, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn sequential_only_moves_one_step_forward() {
        let policy = TransitionPolicy::Sequential;
        assert!(policy.allows(TicketStatus::Open, TicketStatus::InProgress));
        assert!(policy.allows(TicketStatus::Resolved, TicketStatus::Closed));
        assert!(!policy.allows(TicketStatus::Open, TicketStatus::Closed));
        assert!(!policy.allows(TicketStatus::Closed, TicketStatus::Open));
    }

    #[test]
    fn actions_target_expected_statuses() {
        let targets: Vec<_> = TransitionAction::ALL.iter().map(|a| a.target()).collect();
        assert_eq!(
            targets,
            vec![TicketStatus::InProgress, TicketStatus::Resolved, TicketStatus::Closed]
        );
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!("Sequential".parse::<TransitionPolicy>(), Ok(TransitionPolicy::Sequential));
        assert!("strict".parse::<TransitionPolicy>().is_err());
    }
}
