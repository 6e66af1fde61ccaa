use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use ticket_schema::{Priority, Role, Ticket, TicketStatus, User};

pub const DEFAULT_ASSIGNEE: &str = "admin@example.com";

#[derive(Clone, Debug)]
pub struct Account {
    pub password: String,
    pub name: String,
    pub role: Role,
}

/// Everything the double knows. Lost on restart.
#[derive(Debug, Default)]
pub struct MockState {
    pub accounts: BTreeMap<String, Account>,
    pub tickets: Vec<Ticket>,
    pub next_id: u64,
    /// token -> email
    pub tokens: HashMap<String, String>,
}

impl MockState {
    pub fn seeded() -> Self {
        let mut accounts = BTreeMap::new();
        accounts.insert(
            "admin@example.com".to_string(),
            Account {
                password: "admin123".into(),
                name: "Admin User".into(),
                role: Role::Admin,
            },
        );
        accounts.insert(
            "user@example.com".to_string(),
            Account {
                password: "user123".into(),
                name: "Regular User".into(),
                role: Role::User,
            },
        );

        let tickets = vec![
            Ticket {
                id: 1,
                title: "Cannot login to dashboard".into(),
                description: "Getting 404 error when trying to access dashboard".into(),
                priority: Priority::High,
                status: TicketStatus::Open,
                created_by: "user@example.com".into(),
                assigned_to: Some(DEFAULT_ASSIGNEE.into()),
                created_at: "2024-01-15 10:30:00".into(),
                updated_at: Some("2024-01-15 10:30:00".into()),
            },
            Ticket {
                id: 2,
                title: "Add new feature request".into(),
                description: "Please add export to PDF functionality".into(),
                priority: Priority::Medium,
                status: TicketStatus::InProgress,
                created_by: "user@example.com".into(),
                assigned_to: Some(DEFAULT_ASSIGNEE.into()),
                created_at: "2024-01-14 14:20:00".into(),
                updated_at: Some("2024-01-15 09:15:00".into()),
            },
        ];

        Self {
            accounts,
            next_id: tickets.len() as u64,
            tickets,
            tokens: HashMap::new(),
        }
    }

    pub fn user(&self, email: &str) -> Option<User> {
        self.accounts.get(email).map(|account| User {
            email: email.to_string(),
            name: account.name.clone(),
            role: account.role,
        })
    }

    pub fn issue_token(&mut self, email: &str) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.tokens.insert(token.clone(), email.to_string());
        token
    }

    pub fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Clone, Debug, Default)]
pub struct SharedState {
    inner: Arc<Mutex<MockState>>,
}

impl SharedState {
    pub fn new(state: MockState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    pub fn seeded() -> Self {
        Self::new(MockState::seeded())
    }

    pub fn lock(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn now_string() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
