// src/models/pix.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChargeStatus {
    Ativa,
    Pendente,
    Concluida,
    Removida,
    #[serde(other)]
    Desconhecida,
}

impl ChargeStatus {
    /// O gateway devolve "ATIVA", "CONCLUIDA", "REMOVIDA_PELO_USUARIO_RECEBEDOR"...
    pub fn from_gateway(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        match lower.as_str() {
            "ativa" => ChargeStatus::Ativa,
            "pendente" => ChargeStatus::Pendente,
            "concluida" | "concluída" => ChargeStatus::Concluida,
            s if s.starts_with("removida") => ChargeStatus::Removida,
            _ => ChargeStatus::Desconhecida,
        }
    }
}

/// Categoria de listagem do painel.
///
/// `Pendente` e `Ativa` consultam o mesmo endpoint do gateway
/// (`/pix/cobrancas/ativas`). O gateway não expõe uma listagem própria de
/// pendentes e ainda não há definição de produto sobre o que "pendente"
/// deveria significar; as duas abas mostram o mesmo conjunto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChargeBucket {
    Ativa,
    Pendente,
    Concluida,
    #[default]
    Todas,
}

impl ChargeBucket {
    pub fn endpoint_segment(self) -> &'static str {
        match self {
            ChargeBucket::Ativa | ChargeBucket::Pendente => "ativas",
            ChargeBucket::Concluida => "concluidas",
            ChargeBucket::Todas => "todas",
        }
    }

    // Status assumido quando o item da listagem não traz o próprio status.
    pub fn fallback_status(self) -> ChargeStatus {
        match self {
            ChargeBucket::Concluida => ChargeStatus::Concluida,
            _ => ChargeStatus::Ativa,
        }
    }
}

// --- Structs ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PixCharge {
    #[schema(example = "TX-1001")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,

    #[serde(rename = "valor")]
    #[schema(value_type = f64, example = 49.9)]
    pub amount: Decimal,

    #[serde(default)]
    #[schema(example = "12345678901")]
    pub cpf: String,

    #[serde(rename = "nome", default)]
    #[schema(example = "Ana Silva")]
    pub payer_name: String,

    pub status: ChargeStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    // Código PIX copia e cola
    #[serde(rename = "codigo_pix", default, skip_serializing_if = "Option::is_none")]
    pub payment_code: Option<String>,

    #[serde(rename = "qrcode", default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,

    #[serde(rename = "statusDetalhado", default, skip_serializing_if = "Option::is_none")]
    pub detailed_status: Option<String>,
}

impl PixCharge {
    /// Identificador preferido para cancelar/consultar: txid quando existir.
    pub fn gateway_id(&self) -> &str {
        self.txid.as_deref().unwrap_or(&self.id)
    }

    /// Busca livre da listagem: nome, CPF e id.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return true;
        }
        let lower = term.to_lowercase();
        self.payer_name.to_lowercase().contains(&lower)
            || self.cpf.contains(term)
            || self.id.to_lowercase().contains(&lower)
            || self
                .txid
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains(&lower))
    }
}

/// Corpo enviado ao gateway para criar uma cobrança.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewPixCharge {
    #[serde(rename = "valor")]
    #[schema(value_type = f64, example = 50.0)]
    pub amount: Decimal,

    #[validate(custom(function = "crate::common::validation::validate_cpf"))]
    #[schema(example = "12345678901")]
    pub cpf: String,

    #[serde(rename = "nome")]
    #[validate(length(min = 3, message = "Nome deve ter pelo menos 3 caracteres"))]
    #[schema(example = "Ana Silva")]
    pub payer_name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateChargePayload {
    #[serde(rename = "valor")]
    #[schema(value_type = f64, example = 50.0)]
    pub amount: Decimal,

    // Aceita CPF com máscara; os dígitos são extraídos antes da validação.
    #[schema(example = "123.456.789-01")]
    pub cpf: String,

    #[serde(rename = "nome")]
    #[schema(example = "Ana Silva")]
    pub payer_name: String,

    /// Quando informado, a cobrança entra no rastreamento deste revendedor.
    pub reseller_id: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ChargeListQuery {
    pub bucket: Option<ChargeBucket>,
    /// Filtro por nome, CPF ou id
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct PixStatus {
    pub connection: bool,
    pub authenticated: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendChargePayload {
    pub reseller_id: String,
    /// Modelo com {nome}, {sobrenome}, {valor}, {id}, {txid}, {codigopix}
    pub template: Option<String>,
}

/// Valor da cobrança em massa: 10 por cliente, com duas casas.
pub fn amount_for_clients(client_count: u32) -> Decimal {
    let mut amount = Decimal::from(client_count) * Decimal::TEN;
    amount.rescale(2);
    amount
}

/// Formata com exatamente duas casas ("49.9" -> "49.90").
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);
    rounded.to_string()
}
