//! Plain-text rendering of command results.

use crate::commands::{CreatedDto, TicketListDto, TicketRowDto, UserDto};
use std::fmt::Write;

pub fn user(user: &UserDto) -> String {
    format!("Welcome, {} ({}) <{}>", user.name, user.role, user.email)
}

pub fn demo_hint(accounts: &[(&str, &str, &str)]) -> String {
    let mut out = String::from("Demo credentials:");
    for (label, email, password) in accounts {
        let _ = write!(out, "\n  {label}: {email} / {password}");
    }
    out
}

pub fn created(created: &CreatedDto) -> String {
    format!(
        "{}\nReturning to the ticket list in {:.1}s...",
        created.message,
        created.redirect_after_ms as f64 / 1000.0
    )
}

pub fn list(list: &TicketListDto) -> String {
    let mut out = String::new();
    if let Some(warning) = &list.warning {
        let _ = writeln!(out, "warning: {warning} (the list below may be out of date)");
    }
    let _ = writeln!(out, "Tickets [{}]", list.filter);
    if let Some(message) = &list.empty_message {
        out.push_str(message);
        return out;
    }
    for row in &list.tickets {
        out.push_str(&ticket_row(row));
    }
    out.truncate(out.trim_end().len());
    out
}

fn ticket_row(row: &TicketRowDto) -> String {
    let mut out = format!(
        "#{:<4} {:<12} {:<7} {}\n       {}\n       by {} on {}\n",
        row.id,
        badge(&row.status.label),
        badge(&row.priority.label),
        row.title,
        row.description,
        row.created_by,
        row.created_at,
    );
    let mut actions = row.actions.clone();
    if row.can_delete {
        actions.push("Delete".into());
    }
    if !actions.is_empty() {
        let _ = writeln!(out, "       actions: {}", actions.join(", "));
    }
    out
}

fn badge(label: &str) -> String {
    format!("[{label}]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::BadgeDto;

    fn row(can_delete: bool) -> TicketRowDto {
        TicketRowDto {
            id: 7,
            title: "VPN down".into(),
            description: "since 9am".into(),
            status: BadgeDto {
                label: "open".into(),
                class: "bg-warning".into(),
            },
            priority: BadgeDto {
                label: "high".into(),
                class: "bg-danger".into(),
            },
            created_by: "user@example.com".into(),
            created_at: "2024-01-15 10:30:00".into(),
            actions: vec!["Start".into(), "Resolve".into(), "Close".into()],
            can_delete,
        }
    }

    #[test]
    fn empty_list_shows_message() {
        let text = list(&TicketListDto {
            filter: "All".into(),
            tickets: vec![],
            empty_message: Some("No tickets found. Create your first ticket!".into()),
            warning: None,
        });
        assert!(text.ends_with("No tickets found. Create your first ticket!"));
    }

    #[test]
    fn stale_list_leads_with_the_warning() {
        let text = list(&TicketListDto {
            filter: "All".into(),
            tickets: vec![row(true)],
            empty_message: None,
            warning: Some("Failed to fetch tickets".into()),
        });
        assert!(text.starts_with("warning: Failed to fetch tickets"));
        assert!(text.contains("#7"));
    }

    #[test]
    fn delete_listed_only_when_allowed() {
        assert!(ticket_row(&row(true)).contains("Delete"));
        assert!(!ticket_row(&row(false)).contains("Delete"));
        assert!(ticket_row(&row(false)).contains("[open]"));
    }

    #[test]
    fn demo_hint_lists_accounts() {
        let hint = demo_hint(&[("Admin", "admin@example.com", "admin123")]);
        assert!(hint.contains("admin@example.com / admin123"));
    }
}
