//! API handlers for the Tool Crib REST endpoints

pub mod categories;
pub mod checkouts;
pub mod employees;
pub mod health;
pub mod openapi;
pub mod tools;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::Actor, AppState};

/// Name picked in the client's "select your name" dropdown
pub const ACTOR_HEADER: &str = "x-actor";
/// Shared admin secret unlocking admin mode
pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

/// Extractor for the acting employee.
///
/// Requests without a name act as the guest. Admin mode is granted only when
/// the admin secret header matches the configured secret.
pub struct RequestActor(pub Actor);

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, AppError> {
    headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| AppError::Validation(format!("Header {} is not valid text", name)))
        })
        .transpose()
}

#[async_trait]
impl FromRequestParts<AppState> for RequestActor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let name = header_str(&parts.headers, ACTOR_HEADER)?;
        let secret = header_str(&parts.headers, ADMIN_SECRET_HEADER)?;

        Ok(RequestActor(state.services.auth.actor(name, secret)))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Categories and text logs
        .route("/categories", get(categories::list_categories))
        .route("/categories/:name/tools", get(categories::list_tools))
        .route(
            "/categories/:name/log",
            get(categories::list_log_entries).post(categories::add_log_entry),
        )
        // Tools
        .route("/tools", post(tools::create_tool))
        .route(
            "/tools/:id",
            get(tools::get_tool)
                .put(tools::update_tool)
                .delete(tools::delete_tool),
        )
        // Checkouts
        .route("/tools/:id/checkout", post(checkouts::check_out))
        .route("/tools/:id/checkin", post(checkouts::check_in))
        .route("/tools/:id/return-all", post(checkouts::return_all))
        .route("/me/tools", get(checkouts::my_tools))
        .route("/activity", get(checkouts::activity))
        // Roster
        .route(
            "/employees",
            get(employees::list_employees).post(employees::add_employee),
        )
        .route("/employees/:name", delete(employees::remove_employee))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
