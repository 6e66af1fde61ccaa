//! Platform-neutral client core for the helpdesk ticket system.
//!
//! Shells (terminal, browser) own rendering and scheduling; everything they
//! show comes from the controllers in [`views`], gated by [`router`], with
//! identity held in [`session`].

#![allow(async_fn_in_trait)]

pub mod api;
pub mod badge;
pub mod config;
pub mod effect;
pub mod error;
pub mod router;
pub mod scope;
pub mod session;
pub mod storage;
pub mod transition;
pub mod views;

#[cfg(test)]
mod fake;

pub use ticket_schema as schema;

pub use api::{HttpTicketApi, TicketApi};
pub use config::ClientConfig;
pub use error::{ClientError, ErrorKind};
pub use router::{AccessGate, Redirect, Resolution, Route};
pub use scope::ViewScope;
pub use session::{Session, SessionContext, SessionManager};
