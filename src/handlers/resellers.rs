// src/handlers/resellers.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::reseller::{CreateResellerPayload, Reseller, ResellerSearchQuery, UpdateResellerPayload},
};

// GET /api/resellers
#[utoipa::path(
    get,
    path = "/api/resellers",
    tag = "Revendedores",
    params(ResellerSearchQuery),
    responses(
        (status = 200, description = "Lista de revendedores", body = Vec<Reseller>),
        (status = 502, description = "Serviço de revendedores indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_resellers(
    State(app_state): State<AppState>,
    Query(query): Query<ResellerSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let resellers = app_state
        .reseller_service
        .list(query.search.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(resellers)))
}

// POST /api/resellers
#[utoipa::path(
    post,
    path = "/api/resellers",
    tag = "Revendedores",
    request_body = CreateResellerPayload,
    responses(
        (status = 201, description = "Revendedor criado", body = Reseller),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_reseller(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateResellerPayload>,
) -> Result<impl IntoResponse, AppError> {
    let reseller = app_state.reseller_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(reseller)))
}

// DELETE /api/resellers
#[utoipa::path(
    delete,
    path = "/api/resellers",
    tag = "Revendedores",
    responses((status = 204, description = "Todos os revendedores excluídos")),
    security(("api_jwt" = []))
)]
pub async fn delete_all_resellers(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    app_state.reseller_service.delete_all().await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/resellers/{id}
#[utoipa::path(
    get,
    path = "/api/resellers/{id}",
    tag = "Revendedores",
    params(("id" = String, Path, description = "ID do revendedor")),
    responses(
        (status = 200, description = "Revendedor", body = Reseller),
        (status = 404, description = "Revendedor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_reseller(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reseller = app_state.reseller_service.get(&id).await?;
    Ok((StatusCode::OK, Json(reseller)))
}

// PUT /api/resellers/{id}
#[utoipa::path(
    put,
    path = "/api/resellers/{id}",
    tag = "Revendedores",
    params(("id" = String, Path, description = "ID do revendedor")),
    request_body = UpdateResellerPayload,
    responses(
        (status = 200, description = "Revendedor atualizado", body = Reseller),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Revendedor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_reseller(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateResellerPayload>,
) -> Result<impl IntoResponse, AppError> {
    let reseller = app_state.reseller_service.update(&id, payload).await?;
    Ok((StatusCode::OK, Json(reseller)))
}

// DELETE /api/resellers/{id}
#[utoipa::path(
    delete,
    path = "/api/resellers/{id}",
    tag = "Revendedores",
    params(("id" = String, Path, description = "ID do revendedor")),
    responses(
        (status = 204, description = "Revendedor excluído"),
        (status = 404, description = "Revendedor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_reseller(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.reseller_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
