// src/handlers/notifications.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState, models::notification::NotificationList};

// GET /api/notifications
#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "Notificações",
    responses((status = 200, description = "Notificações, mais recentes primeiro", body = NotificationList)),
    security(("api_jwt" = []))
)]
pub async fn list_notifications(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.notification_service.list().await)
}

// POST /api/notifications/{id}/read
#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    tag = "Notificações",
    params(("id" = Uuid, Path, description = "ID da notificação")),
    responses(
        (status = 204, description = "Marcada como lida"),
        (status = 404, description = "Notificação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_read(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.notification_service.mark_read(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/notifications/read-all
#[utoipa::path(
    post,
    path = "/api/notifications/read-all",
    tag = "Notificações",
    responses((status = 204, description = "Todas marcadas como lidas")),
    security(("api_jwt" = []))
)]
pub async fn mark_all_read(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    app_state.notification_service.mark_all_read().await?;
    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/notifications
#[utoipa::path(
    delete,
    path = "/api/notifications",
    tag = "Notificações",
    responses((status = 204, description = "Notificações removidas")),
    security(("api_jwt" = []))
)]
pub async fn clear_notifications(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    app_state.notification_service.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}
