//! Category endpoints, including the free-text logs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        text_log::{LimitQuery, NewTextLogEntry, TextLogEntry},
        tool::ToolQuery,
        Category, ToolStatus,
    },
};

use super::RequestActor;

/// List the categories in display order
#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    responses(
        (status = 200, description = "Category list", body = Vec<Category>)
    )
)]
pub async fn list_categories(State(state): State<crate::AppState>) -> Json<Vec<Category>> {
    Json(state.services.catalog.categories().to_vec())
}

/// List the tools of a category with their availability
#[utoipa::path(
    get,
    path = "/categories/{name}/tools",
    tag = "categories",
    params(
        ("name" = String, Path, description = "Category name"),
        ToolQuery
    ),
    responses(
        (status = 200, description = "Tools with availability", body = Vec<ToolStatus>),
        (status = 400, description = "Category has no tools"),
        (status = 404, description = "Unknown category")
    )
)]
pub async fn list_tools(
    State(state): State<crate::AppState>,
    Path(name): Path<String>,
    Query(query): Query<ToolQuery>,
) -> AppResult<Json<Vec<ToolStatus>>> {
    let tools = state
        .services
        .catalog
        .list_by_category(&name, query.search.as_deref())
        .await?;
    Ok(Json(tools))
}

/// Latest entries of a text-log category, newest first
#[utoipa::path(
    get,
    path = "/categories/{name}/log",
    tag = "categories",
    params(
        ("name" = String, Path, description = "Category name"),
        LimitQuery
    ),
    responses(
        (status = 200, description = "Log entries", body = Vec<TextLogEntry>),
        (status = 400, description = "Category is not a text log")
    )
)]
pub async fn list_log_entries(
    State(state): State<crate::AppState>,
    Path(name): Path<String>,
    Query(query): Query<LimitQuery>,
) -> AppResult<Json<Vec<TextLogEntry>>> {
    let entries = state
        .services
        .text_logs
        .recent_entries(&name, query.limit)
        .await?;
    Ok(Json(entries))
}

/// Record what the actor took from a text-log category
#[utoipa::path(
    post,
    path = "/categories/{name}/log",
    tag = "categories",
    params(
        ("name" = String, Path, description = "Category name")
    ),
    request_body = NewTextLogEntry,
    responses(
        (status = 201, description = "Entry recorded", body = TextLogEntry),
        (status = 400, description = "Empty entry or wrong category"),
        (status = 403, description = "No name selected")
    )
)]
pub async fn add_log_entry(
    State(state): State<crate::AppState>,
    RequestActor(actor): RequestActor,
    Path(name): Path<String>,
    Json(body): Json<NewTextLogEntry>,
) -> AppResult<(StatusCode, Json<TextLogEntry>)> {
    let entry = state
        .services
        .text_logs
        .log_entry(&actor, &name, &body.entry)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
