// src/handlers/settings.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    models::settings::{DashboardSettings, UpdateThemeRequest},
};

// GET /api/settings
#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "Configurações",
    responses((status = 200, description = "Tema e endereços dos serviços", body = DashboardSettings)),
    security(("api_jwt" = []))
)]
pub async fn get_settings(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.settings_service.get_settings().await)
}

// PUT /api/settings/theme
#[utoipa::path(
    put,
    path = "/api/settings/theme",
    tag = "Configurações",
    request_body = UpdateThemeRequest,
    responses(
        (status = 200, description = "Tema atualizado", body = DashboardSettings),
        (status = 422, description = "Tema desconhecido")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_theme(
    State(app_state): State<AppState>,
    Json(payload): Json<UpdateThemeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let settings = app_state.settings_service.set_theme(payload.theme).await?;
    Ok((StatusCode::OK, Json(settings)))
}
