//! Tool catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        tool::{DeleteToolQuery, NewTool, ToolUpdate},
        Tool, ToolId, ToolStatus,
    },
};

use super::RequestActor;

/// Get a tool with its availability and holders
#[utoipa::path(
    get,
    path = "/tools/{id}",
    tag = "tools",
    params(
        ("id" = i32, Path, description = "Tool ID")
    ),
    responses(
        (status = 200, description = "Tool details", body = ToolStatus),
        (status = 404, description = "Tool not found")
    )
)]
pub async fn get_tool(
    State(state): State<crate::AppState>,
    Path(id): Path<ToolId>,
) -> AppResult<Json<ToolStatus>> {
    let tool = state.services.catalog.get_tool(id).await?;
    Ok(Json(tool))
}

/// Add a tool, or update the one with the same name in the category
#[utoipa::path(
    post,
    path = "/tools",
    tag = "tools",
    security(("admin_secret" = [])),
    request_body = NewTool,
    responses(
        (status = 201, description = "Tool saved", body = Tool),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin mode required")
    )
)]
pub async fn create_tool(
    State(state): State<crate::AppState>,
    RequestActor(actor): RequestActor,
    Json(tool): Json<NewTool>,
) -> AppResult<(StatusCode, Json<Tool>)> {
    let saved = state.services.catalog.create_tool(&actor, tool).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// Update a tool
#[utoipa::path(
    put,
    path = "/tools/{id}",
    tag = "tools",
    security(("admin_secret" = [])),
    params(
        ("id" = i32, Path, description = "Tool ID")
    ),
    request_body = ToolUpdate,
    responses(
        (status = 200, description = "Tool updated", body = Tool),
        (status = 404, description = "Tool not found"),
        (status = 409, description = "Name already used in the category")
    )
)]
pub async fn update_tool(
    State(state): State<crate::AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<ToolId>,
    Json(update): Json<ToolUpdate>,
) -> AppResult<Json<Tool>> {
    let updated = state.services.catalog.update_tool(&actor, id, update).await?;
    Ok(Json(updated))
}

/// Delete a tool
#[utoipa::path(
    delete,
    path = "/tools/{id}",
    tag = "tools",
    security(("admin_secret" = [])),
    params(
        ("id" = i32, Path, description = "Tool ID"),
        DeleteToolQuery
    ),
    responses(
        (status = 204, description = "Tool deleted"),
        (status = 404, description = "Tool not found"),
        (status = 409, description = "Units are still checked out")
    )
)]
pub async fn delete_tool(
    State(state): State<crate::AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<ToolId>,
    Query(query): Query<DeleteToolQuery>,
) -> AppResult<StatusCode> {
    state
        .services
        .catalog
        .delete_tool(&actor, id, query.delete_history)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
