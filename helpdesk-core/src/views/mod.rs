//! View controllers: the state and submit logic behind each screen.
//!
//! Each controller exposes a `begin_*`/`finish_*` pair so a reactive shell can
//! keep the state in a signal across the await point, plus an `async`
//! convenience that does both for shells that hold `&mut` directly.

pub mod login;
pub mod ticket_create;
pub mod ticket_list;

pub use login::LoginForm;
pub use ticket_create::TicketForm;
pub use ticket_list::{CommandOutcome, StatusFilter, TicketActions, TicketListView};
