use crate::state::{DEFAULT_ASSIGNEE, SharedState, now_string};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use ticket_schema::{
    DeleteResponse, ErrorBody, HealthResponse, LoginResponse, Priority, Role, Ticket, TicketStatus,
    User,
};
use tracing::{debug, info};

pub fn api_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/tickets", get(list_tickets).post(create_ticket))
        .route("/api/tickets/:id", put(update_ticket).delete(delete_ticket))
        .route("/api/health", get(health))
        .route("/api/me", get(me))
        .with_state(state)
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
struct LoginPayload {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CreatePayload {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    priority: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct UpdatePayload {
    #[serde(default)]
    status: Option<TicketStatus>,
    #[serde(default)]
    priority: Option<Priority>,
    #[serde(default)]
    assigned_to: Option<String>,
}

async fn login(
    State(state): State<SharedState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = payload.email.filter(|v| !v.is_empty());
    let password = payload.password.filter(|v| !v.is_empty());
    let (Some(email), Some(password)) = (email, password) else {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Email and password required",
        ));
    };

    let mut db = state.lock();
    let valid = db
        .accounts
        .get(&email)
        .is_some_and(|account| account.password == password);
    let user = db.user(&email).filter(|_| valid).ok_or_else(|| {
        ApiError::new(StatusCode::UNAUTHORIZED, "Invalid credentials")
    })?;

    let access_token = db.issue_token(&email);
    info!(%email, "issued token");
    Ok(Json(LoginResponse { access_token, user }))
}

async fn list_tickets(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    let caller = authenticate(&state, &headers)?;
    let db = state.lock();
    let tickets = db
        .tickets
        .iter()
        .filter(|t| caller.role == Role::Admin || t.created_by == caller.email)
        .cloned()
        .collect();
    Ok(Json(tickets))
}

async fn create_ticket(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<CreatePayload>,
) -> Result<(StatusCode, Json<Ticket>), ApiError> {
    let caller = authenticate(&state, &headers)?;
    let title = required("title", payload.title)?;
    let description = required("description", payload.description)?;
    let priority = required("priority", payload.priority)?
        .parse::<Priority>()
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.to_string()))?;

    let mut db = state.lock();
    let now = now_string();
    let ticket = Ticket {
        id: db.allocate_id(),
        title,
        description,
        priority,
        status: TicketStatus::Open,
        created_by: caller.email,
        assigned_to: Some(DEFAULT_ASSIGNEE.into()),
        created_at: now.clone(),
        updated_at: Some(now),
    };
    db.tickets.push(ticket.clone());
    debug!(id = ticket.id, "ticket created");
    Ok((StatusCode::CREATED, Json(ticket)))
}

async fn update_ticket(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(payload): Json<UpdatePayload>,
) -> Result<Json<Ticket>, ApiError> {
    let caller = authenticate(&state, &headers)?;
    let mut db = state.lock();
    let ticket = db
        .tickets
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "Ticket not found"))?;

    if caller.role != Role::Admin && ticket.created_by != caller.email {
        return Err(ApiError::new(StatusCode::FORBIDDEN, "Not authorized"));
    }

    if let Some(status) = payload.status {
        ticket.status = status;
    }
    if let Some(priority) = payload.priority {
        ticket.priority = priority;
    }
    if let Some(assigned_to) = payload.assigned_to {
        ticket.assigned_to = Some(assigned_to);
    }
    ticket.updated_at = Some(now_string());
    Ok(Json(ticket.clone()))
}

async fn delete_ticket(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let caller = authenticate(&state, &headers)?;
    let mut db = state.lock();
    let index = db
        .tickets
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "Ticket not found"))?;

    if caller.role != Role::Admin {
        return Err(ApiError::new(StatusCode::FORBIDDEN, "Not authorized"));
    }

    let ticket = db.tickets.remove(index);
    Ok(Json(DeleteResponse {
        message: "Ticket deleted successfully".into(),
        ticket: Some(ticket),
    }))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        service: "ticket-system".into(),
    })
}

async fn me(State(state): State<SharedState>, headers: HeaderMap) -> Result<Json<User>, ApiError> {
    authenticate(&state, &headers).map(Json)
}

fn authenticate(state: &SharedState, headers: &HeaderMap) -> Result<User, ApiError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "Missing Authorization Header"))?;

    let db = state.lock();
    db.tokens
        .get(token)
        .and_then(|email| db.user(email))
        .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "Invalid token"))
}

fn required(field: &str, value: Option<String>) -> Result<String, ApiError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, format!("{field} is required")))
}
