// src/handlers/jobs.rs

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState, models::jobs::JobStatus};

// GET /api/jobs/{id}
#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    tag = "Tarefas",
    params(("id" = Uuid, Path, description = "ID da tarefa")),
    responses(
        (status = 200, description = "Progresso da tarefa", body = JobStatus),
        (status = 404, description = "Tarefa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_job(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobStatus>, AppError> {
    Ok(Json(app_state.jobs.status(id).await?))
}

// POST /api/jobs/{id}/cancel
#[utoipa::path(
    post,
    path = "/api/jobs/{id}/cancel",
    tag = "Tarefas",
    params(("id" = Uuid, Path, description = "ID da tarefa")),
    responses(
        (status = 200, description = "Cancelamento solicitado", body = JobStatus),
        (status = 404, description = "Tarefa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_job(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobStatus>, AppError> {
    Ok(Json(app_state.jobs.cancel(id).await?))
}
