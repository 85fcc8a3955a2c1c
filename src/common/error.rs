// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Tipo de erro único da aplicação. Tudo que sai de um handler passa por aqui.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Validações que não pertencem a um campo (seleção vazia, valor zerado...)
    #[error("{0}")]
    InvalidInput(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    // --- Serviços externos ---
    #[error("Falha de comunicação com {service}: {source}")]
    UpstreamUnavailable {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} respondeu com status {status}")]
    UpstreamStatus { service: &'static str, status: u16 },

    #[error("Resposta inesperada de {service}: {detail}")]
    MalformedResponse { service: &'static str, detail: String },

    // --- Persistência local ---
    #[error("Erro de armazenamento: {0}")]
    StorageError(#[from] std::io::Error),

    #[error("Erro de serialização: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn upstream(service: &'static str) -> impl FnOnce(reqwest::Error) -> AppError {
        move |source| AppError::UpstreamUnavailable { service, source }
    }

    /// Falhas em que vale a pena tentar de novo (rede ou 5xx do serviço externo).
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::UpstreamUnavailable { .. } => true,
            AppError::UpstreamStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidInput(message) => (StatusCode::BAD_REQUEST, message),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Usuário ou senha inválidos.".to_string(),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Conflict(message) => (StatusCode::CONFLICT, message),

            // Erros dos serviços externos viram 502: o painel está de pé, quem falhou foi o upstream.
            ref e @ (AppError::UpstreamUnavailable { .. }
            | AppError::UpstreamStatus { .. }
            | AppError::MalformedResponse { .. }) => {
                tracing::warn!("Falha em serviço externo: {}", e);
                (StatusCode::BAD_GATEWAY, e.to_string())
            }

            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
