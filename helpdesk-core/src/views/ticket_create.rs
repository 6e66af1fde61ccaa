use crate::api::TicketApi;
use crate::error::ClientError;
use crate::router::{Redirect, Route};
use std::time::Duration;
use ticket_schema::{NewTicket, Priority, Ticket, validate_new_ticket};
use tracing::info;

pub const CREATED_MESSAGE: &str = "Ticket created successfully!";
pub const CREATE_FAILED: &str = "Failed to create ticket";

/// New-ticket form. Nothing is persisted between mounts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TicketForm {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    in_flight: bool,
    error: Option<String>,
    success: Option<String>,
}

impl TicketForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn dismiss_success(&mut self) {
        self.success = None;
    }

    /// Cancel goes back to the list, except while a submit is outstanding.
    pub fn cancel(&self) -> Option<Route> {
        (!self.in_flight).then_some(Route::Tickets)
    }

    pub fn begin_submit(&mut self) -> Option<NewTicket> {
        if self.in_flight {
            return None;
        }
        self.error = None;
        self.success = None;
        let ticket = NewTicket {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
        };
        if let Err(err) = validate_new_ticket(&ticket) {
            self.error = Some(err.to_string());
            return None;
        }
        self.in_flight = true;
        Some(ticket)
    }

    /// Settle a submit. On success the form resets and the caller is handed
    /// the delayed redirect back to the list.
    pub fn finish_submit(
        &mut self,
        result: Result<Ticket, ClientError>,
        redirect_delay: Duration,
    ) -> Option<Redirect> {
        self.in_flight = false;
        match result {
            Ok(ticket) => {
                info!(id = ticket.id, priority = %ticket.priority, "ticket created");
                *self = Self {
                    success: Some(CREATED_MESSAGE.into()),
                    ..Self::default()
                };
                Some(Redirect {
                    to: Route::Tickets,
                    after: redirect_delay,
                })
            }
            Err(err) => {
                self.error = Some(err.user_message(CREATE_FAILED));
                None
            }
        }
    }

    pub async fn submit<A: TicketApi>(&mut self, api: &A, redirect_delay: Duration) -> Option<Redirect> {
        let ticket = self.begin_submit()?;
        let result = api.create_ticket(&ticket).await;
        self.finish_submit(result, redirect_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeApi;
    use futures::executor::block_on;

    const DELAY: Duration = Duration::from_secs(2);

    #[test]
    fn defaults_to_medium_priority() {
        assert_eq!(TicketForm::new().priority, Priority::Medium);
    }

    #[test]
    fn exactly_one_priority_option_starts_selected() {
        let form = TicketForm::new();
        let selected: Vec<_> = Priority::ALL.into_iter().filter(|p| form.priority == *p).collect();
        assert_eq!(selected, vec![Priority::Medium]);
    }

    #[test]
    fn banners_can_be_dismissed() {
        let api = FakeApi::seeded();
        let mut form = TicketForm::new();
        assert_eq!(block_on(form.submit(&api, DELAY)), None);
        form.dismiss_error();
        assert_eq!(form.error(), None);

        form.title = "Printer jam".into();
        form.description = "floor 3".into();
        assert!(block_on(form.submit(&api, DELAY)).is_some());
        form.dismiss_success();
        assert_eq!(form.success(), None);
    }

    #[test]
    fn empty_title_is_rejected_before_any_request() {
        let api = FakeApi::seeded();
        let mut form = TicketForm {
            description: "printer on floor 3".into(),
            ..TicketForm::default()
        };
        assert_eq!(block_on(form.submit(&api, DELAY)), None);
        assert_eq!(form.error(), Some("title is required"));
        assert_eq!(api.calls(), 0);
    }

    #[test]
    fn empty_description_is_rejected_before_any_request() {
        let api = FakeApi::seeded();
        let mut form = TicketForm {
            title: "Printer jam".into(),
            ..TicketForm::default()
        };
        assert_eq!(block_on(form.submit(&api, DELAY)), None);
        assert_eq!(form.error(), Some("description is required"));
        assert_eq!(api.calls(), 0);
    }

    #[test]
    fn success_resets_form_and_schedules_redirect() {
        let api = FakeApi::seeded();
        let mut form = TicketForm {
            title: "Printer jam".into(),
            description: "floor 3".into(),
            priority: Priority::High,
            ..TicketForm::default()
        };
        let redirect = block_on(form.submit(&api, DELAY)).expect("redirect");
        assert_eq!(redirect.to, Route::Tickets);
        assert_eq!(redirect.after, DELAY);
        assert_eq!(form.success(), Some(CREATED_MESSAGE));
        assert_eq!(form.title, "");
        assert_eq!(form.priority, Priority::Medium);
        assert!(!form.in_flight());
    }

    #[test]
    fn server_error_is_shown() {
        let api = FakeApi::seeded();
        api.fail_next(400, Some("priority is required"));
        let mut form = TicketForm {
            title: "t".into(),
            description: "d".into(),
            ..TicketForm::default()
        };
        assert_eq!(block_on(form.submit(&api, DELAY)), None);
        assert_eq!(form.error(), Some("priority is required"));
        assert_eq!(form.title, "t");
    }

    #[test]
    fn cancel_blocked_while_in_flight() {
        let mut form = TicketForm {
            title: "t".into(),
            description: "d".into(),
            ..TicketForm::default()
        };
        assert_eq!(form.cancel(), Some(Route::Tickets));
        assert!(form.begin_submit().is_some());
        assert_eq!(form.cancel(), None);
    }
}
