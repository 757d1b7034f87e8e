//! Checkout endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        checkout::ActivityEntry, text_log::LimitQuery, tool::HeldTool, CheckoutEvent, ToolId,
    },
};

use super::RequestActor;

/// Check-in request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CheckInRequest {
    /// Holder whose unit is returned (admin only when not the requester)
    pub on_behalf_of: Option<String>,
}

/// Check out one unit for the requesting actor
#[utoipa::path(
    post,
    path = "/tools/{id}/checkout",
    tag = "checkouts",
    params(
        ("id" = i32, Path, description = "Tool ID")
    ),
    responses(
        (status = 201, description = "Unit checked out", body = CheckoutEvent),
        (status = 403, description = "No name selected"),
        (status = 404, description = "Tool not found"),
        (status = 409, description = "No units available")
    )
)]
pub async fn check_out(
    State(state): State<crate::AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<ToolId>,
) -> AppResult<(StatusCode, Json<CheckoutEvent>)> {
    let event = state.services.checkouts.check_out(id, &actor).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Check in one unit
#[utoipa::path(
    post,
    path = "/tools/{id}/checkin",
    tag = "checkouts",
    params(
        ("id" = i32, Path, description = "Tool ID")
    ),
    request_body = CheckInRequest,
    responses(
        (status = 201, description = "Unit checked in", body = CheckoutEvent),
        (status = 400, description = "Malformed body, or no unit to return"),
        (status = 403, description = "Not a holder and not an admin"),
        (status = 404, description = "Tool not found")
    )
)]
pub async fn check_in(
    State(state): State<crate::AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<ToolId>,
    body: Result<Json<CheckInRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CheckoutEvent>)> {
    // The body is optional, but a JSON body must be well formed.
    let request = match body {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => CheckInRequest::default(),
        Err(rejection) => return Err(AppError::Validation(rejection.body_text())),
    };
    let event = state
        .services
        .checkouts
        .check_in(id, request.on_behalf_of.as_deref(), &actor)
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Return every unit the requesting actor holds
#[utoipa::path(
    post,
    path = "/tools/{id}/return-all",
    tag = "checkouts",
    params(
        ("id" = i32, Path, description = "Tool ID")
    ),
    responses(
        (status = 200, description = "Units checked in", body = Vec<CheckoutEvent>),
        (status = 403, description = "Requester holds no units"),
        (status = 404, description = "Tool not found")
    )
)]
pub async fn return_all(
    State(state): State<crate::AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<ToolId>,
) -> AppResult<Json<Vec<CheckoutEvent>>> {
    let events = state.services.checkouts.return_all(id, &actor).await?;
    Ok(Json(events))
}

/// Tools the requesting actor currently holds
#[utoipa::path(
    get,
    path = "/me/tools",
    tag = "checkouts",
    responses(
        (status = 200, description = "Held tools", body = Vec<HeldTool>)
    )
)]
pub async fn my_tools(
    State(state): State<crate::AppState>,
    RequestActor(actor): RequestActor,
) -> AppResult<Json<Vec<HeldTool>>> {
    let tools = state.services.checkouts.current_tools(&actor).await?;
    Ok(Json(tools))
}

/// Latest checkout activity, newest first
#[utoipa::path(
    get,
    path = "/activity",
    tag = "checkouts",
    security(("admin_secret" = [])),
    params(LimitQuery),
    responses(
        (status = 200, description = "Activity log", body = Vec<ActivityEntry>),
        (status = 403, description = "Admin mode required")
    )
)]
pub async fn activity(
    State(state): State<crate::AppState>,
    RequestActor(actor): RequestActor,
    Query(query): Query<LimitQuery>,
) -> AppResult<Json<Vec<ActivityEntry>>> {
    let entries = state.services.checkouts.activity(&actor, query.limit).await?;
    Ok(Json(entries))
}
