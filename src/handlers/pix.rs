// src/handlers/pix.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        jobs::{BulkChargePayload, JobStatus},
        pix::{ChargeListQuery, CreateChargePayload, PixCharge, PixStatus, SendChargePayload},
        tracking::{ChargeTracking, ReconcileReport, TrackingQuery},
        whatsapp::RenderedMessage,
    },
};

// GET /api/pix/status
#[utoipa::path(
    get,
    path = "/api/pix/status",
    tag = "PIX",
    responses((status = 200, description = "Conexão e autenticação do gateway", body = PixStatus)),
    security(("api_jwt" = []))
)]
pub async fn get_status(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.pix_service.status().await)
}

// GET /api/pix/charges
#[utoipa::path(
    get,
    path = "/api/pix/charges",
    tag = "PIX",
    params(ChargeListQuery),
    responses(
        (status = 200, description = "Cobranças da categoria", body = Vec<PixCharge>),
        (status = 502, description = "Gateway indisponível mesmo após novas tentativas")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_charges(
    State(app_state): State<AppState>,
    Query(query): Query<ChargeListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let charges = app_state
        .pix_service
        .list(query.bucket.unwrap_or_default(), query.search.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(charges)))
}

// POST /api/pix/charges
#[utoipa::path(
    post,
    path = "/api/pix/charges",
    tag = "PIX",
    request_body = CreateChargePayload,
    responses(
        (status = 201, description = "Cobrança criada", body = PixCharge),
        (status = 400, description = "Valor, CPF ou nome inválidos"),
        (status = 502, description = "Falha no gateway")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_charge(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateChargePayload>,
) -> Result<impl IntoResponse, AppError> {
    let charge = app_state.pix_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(charge)))
}

// GET /api/pix/charges/{id}
#[utoipa::path(
    get,
    path = "/api/pix/charges/{id}",
    tag = "PIX",
    params(("id" = String, Path, description = "ID ou txid da cobrança")),
    responses(
        (status = 200, description = "Cobrança", body = PixCharge),
        (status = 404, description = "Cobrança não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_charge(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let charge = app_state.pix_service.get(&id).await?;
    Ok((StatusCode::OK, Json(charge)))
}

// DELETE /api/pix/charges/{id}
#[utoipa::path(
    delete,
    path = "/api/pix/charges/{id}",
    tag = "PIX",
    params(("id" = String, Path, description = "ID ou txid da cobrança")),
    responses(
        (status = 204, description = "Cobrança cancelada"),
        (status = 404, description = "Cobrança não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_charge(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.pix_service.cancel(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/pix/charges/active
#[utoipa::path(
    delete,
    path = "/api/pix/charges/active",
    tag = "PIX",
    responses((status = 204, description = "Todas as cobranças ativas canceladas")),
    security(("api_jwt" = []))
)]
pub async fn cancel_all_active(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    app_state.pix_service.cancel_all_active().await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/pix/charges/{id}/send
#[utoipa::path(
    post,
    path = "/api/pix/charges/{id}/send",
    tag = "PIX",
    params(("id" = String, Path, description = "ID ou txid da cobrança")),
    request_body = SendChargePayload,
    responses(
        (status = 200, description = "Mensagem enviada", body = RenderedMessage),
        (status = 404, description = "Revendedor ou cobrança não encontrados"),
        (status = 502, description = "Falha no envio")
    ),
    security(("api_jwt" = []))
)]
pub async fn send_charge(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SendChargePayload>,
) -> Result<impl IntoResponse, AppError> {
    let sent = app_state
        .whatsapp_service
        .send_charge(&payload.reseller_id, &id, payload.template.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(sent)))
}

// POST /api/pix/bulk-charges
#[utoipa::path(
    post,
    path = "/api/pix/bulk-charges",
    tag = "PIX",
    request_body = BulkChargePayload,
    responses(
        (status = 202, description = "Geração em massa iniciada", body = JobStatus),
        (status = 400, description = "Nenhum revendedor selecionado"),
        (status = 409, description = "Já existe uma geração em andamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn start_bulk_charges(
    State(app_state): State<AppState>,
    Json(payload): Json<BulkChargePayload>,
) -> Result<impl IntoResponse, AppError> {
    let job = app_state
        .bulk_charge_service
        .start(&payload.reseller_ids)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(job)))
}

// GET /api/pix/tracking
#[utoipa::path(
    get,
    path = "/api/pix/tracking",
    tag = "PIX",
    params(TrackingQuery),
    responses((status = 200, description = "Rastreamento local das cobranças", body = Vec<ChargeTracking>)),
    security(("api_jwt" = []))
)]
pub async fn list_tracking(
    State(app_state): State<AppState>,
    Query(query): Query<TrackingQuery>,
) -> impl IntoResponse {
    Json(app_state.pix_service.tracking(query.search.as_deref()).await)
}

// DELETE /api/pix/tracking
#[utoipa::path(
    delete,
    path = "/api/pix/tracking",
    tag = "PIX",
    responses((status = 204, description = "Histórico de rastreamento limpo")),
    security(("api_jwt" = []))
)]
pub async fn clear_tracking(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    app_state.pix_service.clear_tracking().await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/pix/tracking/refresh
#[utoipa::path(
    post,
    path = "/api/pix/tracking/refresh",
    tag = "PIX",
    responses(
        (status = 200, description = "Verificação concluída", body = ReconcileReport),
        (status = 409, description = "Já existe uma verificação em andamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn refresh_tracking(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.reconciliation_service.refresh_all().await?;
    Ok((StatusCode::OK, Json(report)))
}
