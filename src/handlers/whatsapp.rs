// src/handlers/whatsapp.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        jobs::JobStatus,
        whatsapp::{BulkSendPayload, MessagePreviewPayload, RenderedMessage, SendRawMessagePayload},
    },
};

// POST /api/whatsapp/preview
#[utoipa::path(
    post,
    path = "/api/whatsapp/preview",
    tag = "WhatsApp",
    request_body = MessagePreviewPayload,
    responses(
        (status = 200, description = "Mensagem montada a partir do modelo", body = RenderedMessage),
        (status = 404, description = "Revendedor ou cobrança não encontrados")
    ),
    security(("api_jwt" = []))
)]
pub async fn preview_message(
    State(app_state): State<AppState>,
    Json(payload): Json<MessagePreviewPayload>,
) -> Result<impl IntoResponse, AppError> {
    let rendered = app_state
        .whatsapp_service
        .preview(&payload.reseller_id, &payload.charge_id, payload.template.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(rendered)))
}

// POST /api/whatsapp/send
#[utoipa::path(
    post,
    path = "/api/whatsapp/send",
    tag = "WhatsApp",
    request_body = MessagePreviewPayload,
    responses(
        (status = 200, description = "Cobrança enviada ao revendedor", body = RenderedMessage),
        (status = 404, description = "Revendedor ou cobrança não encontrados"),
        (status = 502, description = "Falha no serviço de envio")
    ),
    security(("api_jwt" = []))
)]
pub async fn send_charge_message(
    State(app_state): State<AppState>,
    Json(payload): Json<MessagePreviewPayload>,
) -> Result<impl IntoResponse, AppError> {
    let sent = app_state
        .whatsapp_service
        .send_charge(&payload.reseller_id, &payload.charge_id, payload.template.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(sent)))
}

// POST /api/whatsapp/messages
#[utoipa::path(
    post,
    path = "/api/whatsapp/messages",
    tag = "WhatsApp",
    request_body = SendRawMessagePayload,
    responses(
        (status = 204, description = "Mensagem enviada"),
        (status = 400, description = "Número ou texto inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn send_raw_message(
    State(app_state): State<AppState>,
    Json(payload): Json<SendRawMessagePayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state.whatsapp_service.send_raw(payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/whatsapp/bulk-send
#[utoipa::path(
    post,
    path = "/api/whatsapp/bulk-send",
    tag = "WhatsApp",
    request_body = BulkSendPayload,
    responses(
        (status = 202, description = "Envio em massa iniciado", body = JobStatus),
        (status = 400, description = "Seleção vazia ou sem cobranças geradas"),
        (status = 409, description = "Já existe um envio em andamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn start_bulk_send(
    State(app_state): State<AppState>,
    Json(payload): Json<BulkSendPayload>,
) -> Result<impl IntoResponse, AppError> {
    let job = app_state
        .whatsapp_service
        .start_bulk_send(&payload.reseller_ids, payload.template)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(job)))
}
