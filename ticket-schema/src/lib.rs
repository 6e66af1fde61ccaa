//! Wire types for the helpdesk REST API.
//!
//! Every enum travels as a lower snake case string (`in_progress`, `admin`).
//! Timestamps are opaque strings; nothing on the client parses them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }

    /// Display text used on badges: the wire name with `_` replaced by a space.
    pub fn label(self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

macro_rules! wire_enum_text {
    ($ty:ty, $kind:literal, [$($variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseEnumError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let lower = value.trim().to_ascii_lowercase();
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == lower)
                    .ok_or_else(|| ParseEnumError {
                        kind: $kind,
                        value: value.to_string(),
                    })
            }
        }
    };
}

wire_enum_text!(Priority, "priority", [Priority::Low, Priority::Medium, Priority::High]);
wire_enum_text!(
    TicketStatus,
    "status",
    [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ]
);
wire_enum_text!(Role, "role", [Role::Admin, Role::User]);

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid {kind} '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TicketStatus,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: TicketStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    #[serde(default)]
    pub ticket: Option<Ticket>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email and password required")]
    MissingCredentials,
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Required-field check for the login form. Format is left to the server.
pub fn validate_credentials(credentials: &Credentials) -> Result<(), ValidationError> {
    if credentials.email.is_empty() || credentials.password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok(())
}

/// Required-field check for ticket submission, in form order.
pub fn validate_new_ticket(ticket: &NewTicket) -> Result<(), ValidationError> {
    if ticket.title.is_empty() {
        return Err(ValidationError::MissingField("title"));
    }
    if ticket.description.is_empty() {
        return Err(ValidationError::MissingField("description"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_decodes_from_server_shape() {
        let raw = serde_json::json!({
            "id": 2,
            "title": "Add new feature request",
            "description": "Please add export to PDF functionality",
            "status": "in_progress",
            "priority": "medium",
            "created_by": "user@example.com",
            "assigned_to": "admin@example.com",
            "created_at": "2024-01-14 14:20:00",
            "updated_at": "2024-01-15 09:15:00"
        });
        let ticket: Ticket = serde_json::from_value(raw).expect("decode");
        assert_eq!(ticket.id, 2);
        assert_eq!(ticket.status, TicketStatus::InProgress);
        assert_eq!(ticket.priority, Priority::Medium);
        assert_eq!(ticket.assigned_to.as_deref(), Some("admin@example.com"));
    }

    #[test]
    fn ticket_tolerates_missing_optional_fields() {
        let raw = serde_json::json!({
            "id": 7,
            "title": "t",
            "description": "d",
            "status": "open",
            "priority": "low",
            "created_by": "user@example.com",
            "created_at": "2024-01-14 14:20:00"
        });
        let ticket: Ticket = serde_json::from_value(raw).expect("decode");
        assert!(ticket.assigned_to.is_none());
        assert!(ticket.updated_at.is_none());
    }

    #[test]
    fn status_update_encodes_snake_case() {
        let body = serde_json::to_value(StatusUpdate {
            status: TicketStatus::InProgress,
        })
        .expect("encode");
        assert_eq!(body, serde_json::json!({ "status": "in_progress" }));
    }

    #[test]
    fn parses_enums_case_insensitively() {
        assert_eq!("HIGH".parse::<Priority>(), Ok(Priority::High));
        assert_eq!("in_progress".parse::<TicketStatus>(), Ok(TicketStatus::InProgress));
        assert_eq!(" admin ".parse::<Role>(), Ok(Role::Admin));
        let err = "urgent".parse::<Priority>().unwrap_err();
        assert_eq!(err.to_string(), "invalid priority 'urgent'");
    }

    #[test]
    fn status_label_replaces_underscore() {
        assert_eq!(TicketStatus::InProgress.label(), "in progress");
        assert_eq!(TicketStatus::InProgress.to_string(), "in_progress");
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn validates_new_ticket_fields_in_order() {
        let mut ticket = NewTicket {
            title: String::new(),
            description: String::new(),
            priority: Priority::High,
        };
        assert_eq!(
            validate_new_ticket(&ticket),
            Err(ValidationError::MissingField("title"))
        );
        ticket.title = "printer jam".into();
        let err = validate_new_ticket(&ticket).unwrap_err();
        assert_eq!(err.to_string(), "description is required");
        ticket.description = "floor 3".into();
        assert!(validate_new_ticket(&ticket).is_ok());
    }

    #[test]
    fn validates_credentials_presence() {
        let creds = Credentials {
            email: "admin@example.com".into(),
            password: String::new(),
        };
        assert_eq!(
            validate_credentials(&creds),
            Err(ValidationError::MissingCredentials)
        );
    }
}
