// src/clients.rs

use serde_json::Value;

use crate::common::error::AppError;

pub mod transport;
pub use transport::build_http_client;
pub mod reseller_client;
pub use reseller_client::ResellerClient;
pub mod pix_client;
pub use pix_client::{ChargeGateway, PixClient};
pub mod whatsapp_client;
pub use whatsapp_client::WhatsAppClient;

/// Lê o corpo de uma resposta 2xx como JSON.
/// Corpo vazio vira `None`; status fora de 2xx vira `UpstreamStatus`.
pub(crate) async fn read_json(
    response: reqwest::Response,
    service: &'static str,
) -> Result<Option<Value>, AppError> {
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::UpstreamStatus {
            service,
            status: status.as_u16(),
        });
    }

    let text = response.text().await.map_err(AppError::upstream(service))?;
    if text.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| AppError::MalformedResponse {
            service,
            detail: format!("corpo não é JSON ({})", e),
        })
}

/// Só confere o status; o corpo é descartado.
pub(crate) fn expect_success(
    response: &reqwest::Response,
    service: &'static str,
) -> Result<(), AppError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(AppError::UpstreamStatus {
            service,
            status: status.as_u16(),
        })
    }
}

/// Os serviços às vezes embrulham o conteúdo em `data` ou `dados`.
pub(crate) fn unwrap_envelope(value: &Value) -> &Value {
    value
        .get("data")
        .or_else(|| value.get("dados"))
        .unwrap_or(value)
}
