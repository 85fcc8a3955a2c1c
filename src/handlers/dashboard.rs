// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        dashboard::{ClientRangeEntry, DashboardSummary},
        reseller::Reseller,
    },
};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses((status = 200, description = "Cards do painel; cards com falha vêm nulos", body = DashboardSummary)),
    security(("api_jwt" = []))
)]
pub async fn get_summary(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.dashboard_service.get_summary().await)
}

// GET /api/dashboard/clients-chart
#[utoipa::path(
    get,
    path = "/api/dashboard/clients-chart",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Revendedores por faixa de clientes", body = Vec<ClientRangeEntry>),
        (status = 502, description = "Serviço de revendedores indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_clients_chart(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let chart = app_state.dashboard_service.get_clients_chart().await?;
    Ok((StatusCode::OK, Json(chart)))
}

// GET /api/dashboard/recent-resellers
#[utoipa::path(
    get,
    path = "/api/dashboard/recent-resellers",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Cinco revendedores mais recentes", body = Vec<Reseller>),
        (status = 502, description = "Serviço de revendedores indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_recent_resellers(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let recent = app_state.dashboard_service.get_recent_resellers().await?;
    Ok((StatusCode::OK, Json(recent)))
}
