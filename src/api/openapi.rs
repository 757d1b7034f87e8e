//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{categories, checkouts, employees, health, tools, ADMIN_SECRET_HEADER};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tool Crib API",
        version = "0.3.0",
        description = "Shop tool checkout ledger REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        // Categories
        categories::list_categories,
        categories::list_tools,
        categories::list_log_entries,
        categories::add_log_entry,
        // Tools
        tools::get_tool,
        tools::create_tool,
        tools::update_tool,
        tools::delete_tool,
        // Checkouts
        checkouts::check_out,
        checkouts::check_in,
        checkouts::return_all,
        checkouts::my_tools,
        checkouts::activity,
        // Roster
        employees::list_employees,
        employees::add_employee,
        employees::remove_employee,
    ),
    components(
        schemas(
            // Categories
            crate::models::Category,
            crate::models::CategoryKind,
            crate::models::TextLogEntry,
            crate::models::text_log::NewTextLogEntry,
            // Tools
            crate::models::Tool,
            crate::models::ToolStatus,
            crate::models::tool::NewTool,
            crate::models::tool::ToolUpdate,
            crate::models::tool::HolderEntry,
            crate::models::tool::HeldTool,
            // Checkouts
            crate::models::CheckoutAction,
            crate::models::CheckoutEvent,
            crate::models::checkout::ActivityEntry,
            checkouts::CheckInRequest,
            // Roster
            crate::models::Employee,
            crate::models::employee::NewEmployee,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&AdminSecurity),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "categories", description = "Categories and free-text logs"),
        (name = "tools", description = "Tool catalog management"),
        (name = "checkouts", description = "Checkout ledger"),
        (name = "employees", description = "Employee roster")
    )
)]
pub struct ApiDoc;

/// Declares the admin secret header used by admin-only operations
struct AdminSecurity;

impl Modify for AdminSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_secret",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ADMIN_SECRET_HEADER))),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
