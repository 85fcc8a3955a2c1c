// src/clients/transport.rs

use std::time::Duration;

use crate::common::error::AppError;

const USER_AGENT: &str = concat!("painel-revendas/", env!("CARGO_PKG_VERSION"));

/// Cliente HTTP compartilhado pelos três serviços externos.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| AppError::InternalServerError(anyhow::anyhow!("falha ao montar o cliente HTTP: {e}")))
}
