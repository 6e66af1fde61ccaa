//! In-process `TicketApi` for unit tests.

use crate::api::TicketApi;
use crate::error::ClientError;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use ticket_schema::{
    Credentials, LoginResponse, NewTicket, Priority, Role, Ticket, TicketStatus, User,
};

#[derive(Default)]
pub(crate) struct FakeApi {
    tickets: RefCell<Vec<Ticket>>,
    calls: Cell<usize>,
    /// One entry per upcoming call; `None` lets that call through.
    script: RefCell<VecDeque<Option<(u16, Option<String>)>>>,
}

pub(crate) fn ticket(id: u64, status: TicketStatus) -> Ticket {
    Ticket {
        id,
        title: format!("ticket {id}"),
        description: "details".into(),
        priority: Priority::Medium,
        status,
        created_by: "user@example.com".into(),
        assigned_to: None,
        created_at: "2024-01-15 10:30:00".into(),
        updated_at: None,
    }
}

impl FakeApi {
    pub(crate) fn seeded() -> Self {
        Self::with_tickets(vec![
            ticket(1, TicketStatus::Open),
            ticket(2, TicketStatus::InProgress),
            ticket(3, TicketStatus::Resolved),
            ticket(4, TicketStatus::Closed),
        ])
    }

    pub(crate) fn with_tickets(tickets: Vec<Ticket>) -> Self {
        Self {
            tickets: RefCell::new(tickets),
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }

    pub(crate) fn fail_next(&self, status: u16, message: Option<&str>) {
        self.fail_after(0, status, message);
    }

    /// Let `passing` calls succeed, then fail the one after.
    pub(crate) fn fail_after(&self, passing: usize, status: u16, message: Option<&str>) {
        let mut script = self.script.borrow_mut();
        script.clear();
        script.extend(std::iter::repeat(None).take(passing));
        script.push_back(Some((status, message.map(str::to_string))));
    }

    fn enter(&self) -> Result<(), ClientError> {
        self.calls.set(self.calls.get() + 1);
        match self.script.borrow_mut().pop_front().flatten() {
            Some((status, message)) => Err(ClientError::Api { status, message }),
            None => Ok(()),
        }
    }

    fn not_found() -> ClientError {
        ClientError::Api {
            status: 404,
            message: Some("Ticket not found".into()),
        }
    }
}

impl TicketApi for FakeApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ClientError> {
        self.enter()?;
        let (name, role) = match (credentials.email.as_str(), credentials.password.as_str()) {
            ("admin@example.com", "admin123") => ("Admin User", Role::Admin),
            ("user@example.com", "user123") => ("Regular User", Role::User),
            _ => {
                return Err(ClientError::Api {
                    status: 401,
                    message: Some("Invalid credentials".into()),
                });
            }
        };
        Ok(LoginResponse {
            access_token: format!("fake-{}", credentials.email),
            user: User {
                email: credentials.email.clone(),
                name: name.into(),
                role,
            },
        })
    }

    async fn list_tickets(&self) -> Result<Vec<Ticket>, ClientError> {
        self.enter()?;
        Ok(self.tickets.borrow().clone())
    }

    async fn create_ticket(&self, new: &NewTicket) -> Result<Ticket, ClientError> {
        self.enter()?;
        let mut tickets = self.tickets.borrow_mut();
        let id = tickets.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let created = Ticket {
            title: new.title.clone(),
            description: new.description.clone(),
            priority: new.priority,
            ..ticket(id, TicketStatus::Open)
        };
        tickets.push(created.clone());
        Ok(created)
    }

    async fn update_status(&self, id: u64, status: TicketStatus) -> Result<Ticket, ClientError> {
        self.enter()?;
        let mut tickets = self.tickets.borrow_mut();
        let found = tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(Self::not_found)?;
        found.status = status;
        Ok(found.clone())
    }

    async fn delete_ticket(&self, id: u64) -> Result<(), ClientError> {
        self.enter()?;
        let mut tickets = self.tickets.borrow_mut();
        let before = tickets.len();
        tickets.retain(|t| t.id != id);
        if tickets.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }
}
