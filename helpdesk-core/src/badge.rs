use ticket_schema::{Priority, TicketStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BadgeStyle {
    Warning,
    Info,
    Success,
    Secondary,
    Danger,
}

impl BadgeStyle {
    pub fn css_class(self) -> &'static str {
        match self {
            BadgeStyle::Warning => "bg-warning",
            BadgeStyle::Info => "bg-info",
            BadgeStyle::Success => "bg-success",
            BadgeStyle::Secondary => "bg-secondary",
            BadgeStyle::Danger => "bg-danger",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub style: BadgeStyle,
}

pub fn status_badge(status: TicketStatus) -> Badge {
    let style = match status {
        TicketStatus::Open => BadgeStyle::Warning,
        TicketStatus::InProgress => BadgeStyle::Info,
        TicketStatus::Resolved => BadgeStyle::Success,
        TicketStatus::Closed => BadgeStyle::Secondary,
    };
    Badge {
        label: status.label(),
        style,
    }
}

pub fn priority_badge(priority: Priority) -> Badge {
    let style = match priority {
        Priority::High => BadgeStyle::Danger,
        Priority::Medium => BadgeStyle::Warning,
        Priority::Low => BadgeStyle::Success,
    };
    Badge {
        label: priority.as_str(),
        style,
    }
}
