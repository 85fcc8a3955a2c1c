// src/models/whatsapp.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Corpo aceito pelo serviço de envio.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct WhatsAppMessage {
    /// Atraso pedido ao serviço antes do envio, em milissegundos
    #[schema(example = 8000)]
    pub delay: u64,

    #[validate(length(min = 10, message = "Número de WhatsApp inválido"))]
    #[schema(example = "11999999999")]
    pub number: String,

    #[validate(length(min = 1, message = "A mensagem não pode ser vazia"))]
    pub text: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendRawMessagePayload {
    pub number: String,
    pub text: String,
    pub delay: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MessagePreviewPayload {
    pub reseller_id: String,
    pub charge_id: String,
    pub template: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkSendPayload {
    pub reseller_ids: Vec<String>,
    pub template: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RenderedMessage {
    pub number: String,
    pub text: String,
}
