//! REST client for the ticket API.
//!
//! The bearer token comes from the `SessionContext` handed to the
//! constructor; there is no process-wide interceptor.

use crate::error::ClientError;
use crate::session::SessionContext;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use ticket_schema::{
    Credentials, ErrorBody, HealthResponse, LoginResponse, NewTicket, StatusUpdate, Ticket,
    TicketStatus, User,
};
use tracing::debug;

/// Operations the views issue against the server.
pub trait TicketApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ClientError>;
    async fn list_tickets(&self) -> Result<Vec<Ticket>, ClientError>;
    async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket, ClientError>;
    async fn update_status(&self, id: u64, status: TicketStatus) -> Result<Ticket, ClientError>;
    async fn delete_ticket(&self, id: u64) -> Result<(), ClientError>;
}

#[derive(Clone, Debug)]
pub struct HttpTicketApi {
    base_url: String,
    client: reqwest::Client,
    session: SessionContext,
}

impl HttpTicketApi {
    pub fn new(base_url: impl Into<String>, session: SessionContext) -> Self {
        Self::with_client(base_url, session, reqwest::Client::new())
    }

    pub fn with_client(
        base_url: impl Into<String>,
        session: SessionContext,
        client: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self.request(Method::GET, "/api/health").send().await?;
        decode(response).await
    }

    /// The identity the server associates with the current token.
    pub async fn me(&self) -> Result<User, ClientError> {
        let response = self.request(Method::GET, "/api/me").send().await?;
        decode(response).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "api request");
        let builder = self.client.request(method, url);
        match self.session.token() {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        }
    }
}

impl TicketApi for HttpTicketApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ClientError> {
        let response = self
            .client
            .post(format!("{}/api/login", self.base_url))
            .json(credentials)
            .send()
            .await?;
        decode(response).await
    }

    async fn list_tickets(&self) -> Result<Vec<Ticket>, ClientError> {
        let response = self.request(Method::GET, "/api/tickets").send().await?;
        decode(response).await
    }

    async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket, ClientError> {
        let response = self
            .request(Method::POST, "/api/tickets")
            .json(ticket)
            .send()
            .await?;
        decode(response).await
    }

    async fn update_status(&self, id: u64, status: TicketStatus) -> Result<Ticket, ClientError> {
        let response = self
            .request(Method::PUT, &format!("/api/tickets/{id}"))
            .json(&StatusUpdate { status })
            .send()
            .await?;
        decode(response).await
    }

    async fn delete_ticket(&self, id: u64) -> Result<(), ClientError> {
        let response = self
            .request(Method::DELETE, &format!("/api/tickets/{id}"))
            .send()
            .await?;
        check(response).await.map(|_| ())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = check(response).await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Pass a 2xx body through; turn anything else into `ClientError::Api`
/// carrying the server's `error` field when it has one.
async fn check(response: Response) -> Result<Vec<u8>, ClientError> {
    let status = response.status();
    let body = response.bytes().await?;
    if status.is_success() {
        return Ok(body.to_vec());
    }
    let message = serde_json::from_slice::<ErrorBody>(&body)
        .ok()
        .map(|b| b.error);
    debug!(status = status.as_u16(), ?message, "api error");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
