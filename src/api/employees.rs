//! Employee roster endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::employee::{Employee, NewEmployee},
};

use super::RequestActor;

/// List roster names
#[utoipa::path(
    get,
    path = "/employees",
    tag = "employees",
    responses(
        (status = 200, description = "Roster", body = Vec<Employee>)
    )
)]
pub async fn list_employees(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Employee>>> {
    let employees = state.services.roster.list().await?;
    Ok(Json(employees))
}

/// Add a name to the roster
#[utoipa::path(
    post,
    path = "/employees",
    tag = "employees",
    security(("admin_secret" = [])),
    request_body = NewEmployee,
    responses(
        (status = 201, description = "Employee listed", body = Employee),
        (status = 400, description = "Invalid name"),
        (status = 403, description = "Admin mode required")
    )
)]
pub async fn add_employee(
    State(state): State<crate::AppState>,
    RequestActor(actor): RequestActor,
    Json(employee): Json<NewEmployee>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    let saved = state.services.roster.add(&actor, employee).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// Remove a name from the roster
#[utoipa::path(
    delete,
    path = "/employees/{name}",
    tag = "employees",
    security(("admin_secret" = [])),
    params(
        ("name" = String, Path, description = "Employee name")
    ),
    responses(
        (status = 204, description = "Employee removed"),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn remove_employee(
    State(state): State<crate::AppState>,
    RequestActor(actor): RequestActor,
    Path(name): Path<String>,
) -> AppResult<StatusCode> {
    state.services.roster.remove(&actor, &name).await?;
    Ok(StatusCode::NO_CONTENT)
}
