use axum::{
    extract::{Path, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use shared::{CreatePersonRequest, UpdatePersonRequest};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::domain::{PersonError, PersonService};

/// Application state containing the PersonService
#[derive(Clone)]
pub struct AppState {
    pub person_service: PersonService,
}

impl AppState {
    pub fn new(person_service: PersonService) -> Self {
        Self { person_service }
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(state: AppState) -> Router {
    // CORS setup to allow frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/people", get(list_people).post(create_person))
        .route("/people/upcoming", get(get_upcoming))
        .route("/people/by-month/:month", get(get_by_month))
        .route(
            "/people/:id",
            axum::routing::put(update_person).delete(delete_person),
        );

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}

/// Translate a domain error into an HTTP status code
fn error_status(error: &PersonError) -> StatusCode {
    match error {
        PersonError::NotFound(_) => StatusCode::NOT_FOUND,
        PersonError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

/// Axum handler for POST /api/people
pub async fn create_person(
    State(state): State<AppState>,
    Json(request): Json<CreatePersonRequest>,
) -> impl IntoResponse {
    info!("POST /api/people - request: {:?}", request);

    match state.person_service.create_person(request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to create person: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Axum handler for GET /api/people
pub async fn list_people(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/people");

    match state.person_service.list_people().await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to list people: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Axum handler for PUT /api/people/:id
pub async fn update_person(
    State(state): State<AppState>,
    Path(person_id): Path<String>,
    Json(request): Json<UpdatePersonRequest>,
) -> impl IntoResponse {
    info!("PUT /api/people/{} - request: {:?}", person_id, request);

    match state.person_service.update_person(&person_id, request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to update person: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Axum handler for DELETE /api/people/:id
pub async fn delete_person(
    State(state): State<AppState>,
    Path(person_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/people/{}", person_id);

    match state.person_service.delete_person(&person_id).await {
        Ok(()) => (StatusCode::NO_CONTENT, "").into_response(),
        Err(e) => {
            error!("Failed to delete person: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Axum handler for GET /api/people/upcoming
pub async fn get_upcoming(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/people/upcoming");

    match state.person_service.get_upcoming().await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to list upcoming birthdays: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Axum handler for GET /api/people/by-month/:month
pub async fn get_by_month(
    State(state): State<AppState>,
    Path(month): Path<i64>,
) -> impl IntoResponse {
    info!("GET /api/people/by-month/{}", month);

    match state.person_service.get_by_month(month).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to list birthdays by month: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}
