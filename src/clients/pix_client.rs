// src/clients/pix_client.rs

use std::str::FromStr;

use async_trait::async_trait;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::{
    clients::{expect_success, read_json},
    common::error::AppError,
    models::pix::{ChargeBucket, ChargeStatus, NewPixCharge, PixCharge},
};

const SERVICE: &str = "gateway PIX";

/// Operações do gateway usadas pelos fluxos em lote e pela verificação.
/// Os testes trocam a implementação HTTP por uma falsa.
#[async_trait]
pub trait ChargeGateway: Send + Sync {
    async fn create_charge(&self, charge: &NewPixCharge) -> Result<PixCharge, AppError>;
    async fn get_charge(&self, id: &str) -> Result<Option<PixCharge>, AppError>;
}

#[derive(Clone)]
pub struct PixClient {
    base_url: String,
    client: reqwest::Client,
}

impl PixClient {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// O serviço responde? Qualquer resposta abaixo de 500 conta como conectado.
    pub async fn test_connection(&self) -> bool {
        match self.client.get(self.url("/")).send().await {
            Ok(response) => !response.status().is_server_error(),
            Err(e) => {
                tracing::warn!("Gateway PIX inacessível: {}", e);
                false
            }
        }
    }

    /// As credenciais do gateway junto ao provedor PIX estão válidas?
    pub async fn test_authentication(&self) -> bool {
        match self.client.get(self.url("/pix/auth")).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("Falha ao testar autenticação do gateway PIX: {}", e);
                false
            }
        }
    }

    pub async fn list_charges(&self, bucket: ChargeBucket) -> Result<Vec<PixCharge>, AppError> {
        let path = format!("/pix/cobrancas/{}", bucket.endpoint_segment());
        let response = self
            .client
            .get(self.url(&path))
            .send()
            .await
            .map_err(AppError::upstream(SERVICE))?;

        let body = read_json(response, SERVICE).await?;
        Ok(body
            .as_ref()
            .map(|b| parse_charge_list(b, bucket.fallback_status()))
            .unwrap_or_default())
    }

    pub async fn cancel_charge(&self, id: &str) -> Result<(), AppError> {
        let response = self
            .client
            .delete(self.url(&format!("/pix/cancelar/{id}")))
            .send()
            .await
            .map_err(AppError::upstream(SERVICE))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound("Cobrança não encontrada".to_string()));
        }
        expect_success(&response, SERVICE)
    }

    pub async fn cancel_all_active(&self) -> Result<(), AppError> {
        let response = self
            .client
            .delete(self.url("/pix/cancelar-ativas"))
            .send()
            .await
            .map_err(AppError::upstream(SERVICE))?;

        expect_success(&response, SERVICE)
    }
}

#[async_trait]
impl ChargeGateway for PixClient {
    async fn create_charge(&self, charge: &NewPixCharge) -> Result<PixCharge, AppError> {
        let response = self
            .client
            .post(self.url("/pix/cobranca"))
            .json(charge)
            .send()
            .await
            .map_err(AppError::upstream(SERVICE))?;

        let body = read_json(response, SERVICE).await?.unwrap_or(Value::Null);
        let created = charge_payload(&body)
            .and_then(|raw| normalize_charge(raw, ChargeStatus::Ativa))
            .ok_or_else(|| AppError::MalformedResponse {
                service: SERVICE,
                detail: "estrutura de resposta inesperada ao criar cobrança".to_string(),
            })?;

        Ok(fill_from_request(created, charge))
    }

    async fn get_charge(&self, id: &str) -> Result<Option<PixCharge>, AppError> {
        let response = self
            .client
            .get(self.url(&format!("/pix/cobranca/{id}")))
            .send()
            .await
            .map_err(AppError::upstream(SERVICE))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = read_json(response, SERVICE).await?;
        Ok(body
            .as_ref()
            .and_then(charge_payload)
            .and_then(|raw| normalize_charge(raw, ChargeStatus::Ativa)))
    }
}

// O gateway responde com `{ "dados": {...} }`, com o objeto puro ou com um array de um item.
fn charge_payload(body: &Value) -> Option<&Value> {
    let inner = body.get("dados").or_else(|| body.get("data")).unwrap_or(body);
    match inner {
        Value::Array(items) => items.first(),
        Value::Object(_) => Some(inner),
        _ => None,
    }
}

// Campos que o gateway omitiu na resposta de criação vêm do próprio pedido.
fn fill_from_request(mut created: PixCharge, request: &NewPixCharge) -> PixCharge {
    if created.payer_name.is_empty() {
        created.payer_name = request.payer_name.clone();
    }
    if created.cpf.is_empty() {
        created.cpf = request.cpf.clone();
    }
    if created.amount.is_zero() {
        created.amount = request.amount;
    }
    created
}

/// Extrai a lista de cobranças de qualquer um dos formatos conhecidos:
/// `{ "dados": { "cobrancas": [...] } }`, `{ "dados": [...] }`, `{ "cobrancas": [...] }` ou `[...]`.
pub fn parse_charge_list(body: &Value, fallback: ChargeStatus) -> Vec<PixCharge> {
    let inner = body.get("dados").or_else(|| body.get("data")).unwrap_or(body);
    let items = match inner {
        Value::Array(items) => items,
        Value::Object(obj) => match obj.get("cobrancas") {
            Some(Value::Array(items)) => items,
            _ => {
                tracing::warn!("Listagem de cobranças sem array, tratando como vazia.");
                return Vec::new();
            }
        },
        _ => return Vec::new(),
    };

    items
        .iter()
        .filter_map(|raw| normalize_charge(raw, fallback))
        .collect()
}

/// Converte um item bruto do gateway no formato interno.
/// Itens sem `id` nem `txid` são descartados.
pub fn normalize_charge(raw: &Value, fallback: ChargeStatus) -> Option<PixCharge> {
    let obj = raw.as_object()?;

    let txid = text(obj.get("txid"));
    let id = text(obj.get("id")).or_else(|| txid.clone())?;

    let devedor = obj.get("devedor").and_then(Value::as_object);
    let from_devedor = |key: &str| devedor.and_then(|d| text(d.get(key)));

    let pix = obj.get("pix").and_then(Value::as_object);
    let from_pix = |key: &str| pix.and_then(|p| text(p.get(key)));

    let status = obj
        .get("status")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(ChargeStatus::from_gateway)
        .unwrap_or(fallback);

    let created_at = text(obj.get("criacao"))
        .or_else(|| text(obj.get("created_at")))
        .or_else(|| nested_text(obj, "calendario", "criacao"));

    Some(PixCharge {
        id,
        txid,
        amount: obj.get("valor").map(parse_amount).unwrap_or(Decimal::ZERO),
        cpf: from_devedor("cpf")
            .or_else(|| text(obj.get("cpf")))
            .unwrap_or_default(),
        payer_name: from_devedor("nome")
            .or_else(|| text(obj.get("nome")))
            .unwrap_or_default(),
        status,
        created_at,
        payment_code: from_pix("copiaCola")
            .or_else(|| text(obj.get("codigo_pix")))
            .or_else(|| text(obj.get("pixCopiaECola")))
            .or_else(|| text(obj.get("location"))),
        qr_code: from_pix("qrCode").or_else(|| text(obj.get("qrcode"))),
        detailed_status: text(obj.get("statusDetalhado")),
    })
}

/// Valor como número, string ("49.90", "49,90") ou `{ "original": "49.90" }`.
/// Qualquer coisa ilegível vale zero.
pub fn parse_amount(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .unwrap_or(Decimal::ZERO),
        Value::String(s) => Decimal::from_str(&s.trim().replace(',', ".")).unwrap_or(Decimal::ZERO),
        Value::Object(obj) => obj.get("original").map(parse_amount).unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn nested_text(obj: &Map<String, Value>, outer: &str, inner: &str) -> Option<String> {
    obj.get(outer)
        .and_then(Value::as_object)
        .and_then(|o| text(o.get(inner)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_gateway_item() {
        let raw = json!({
            "txid": "TX1",
            "valor": { "original": "49.90" },
            "status": "CONCLUIDA",
            "devedor": { "nome": "Ana Silva", "cpf": "12345678901" },
            "calendario": { "criacao": "2024-01-01T10:00:00Z" },
            "pix": { "copiaCola": "000201...", "qrCode": "data:image/png;base64,AAA" }
        });

        let charge = normalize_charge(&raw, ChargeStatus::Ativa).unwrap();
        assert_eq!(charge.id, "TX1");
        assert_eq!(charge.txid.as_deref(), Some("TX1"));
        assert_eq!(charge.amount.to_string(), "49.90");
        assert_eq!(charge.payer_name, "Ana Silva");
        assert_eq!(charge.status, ChargeStatus::Concluida);
        assert_eq!(charge.created_at.as_deref(), Some("2024-01-01T10:00:00Z"));
        assert_eq!(charge.payment_code.as_deref(), Some("000201..."));
        assert!(charge.qr_code.is_some());
    }

    #[test]
    fn flat_item_uses_bucket_status_when_missing() {
        let raw = json!({ "id": 15, "valor": 20.5, "nome": "Bruno", "cpf": "98765432100", "codigo_pix": "abc" });
        let charge = normalize_charge(&raw, ChargeStatus::Concluida).unwrap();
        assert_eq!(charge.id, "15");
        assert_eq!(charge.amount, Decimal::from_str("20.5").unwrap());
        assert_eq!(charge.status, ChargeStatus::Concluida);
        assert_eq!(charge.payment_code.as_deref(), Some("abc"));
    }

    #[test]
    fn item_without_identifier_is_dropped() {
        assert!(normalize_charge(&json!({ "valor": 10 }), ChargeStatus::Ativa).is_none());
        assert!(normalize_charge(&json!("x"), ChargeStatus::Ativa).is_none());
    }

    #[test]
    fn amount_accepts_several_shapes() {
        assert_eq!(parse_amount(&json!(49.9)).to_string(), "49.9");
        assert_eq!(parse_amount(&json!("49,90")).to_string(), "49.90");
        assert_eq!(parse_amount(&json!(null)), Decimal::ZERO);
        assert_eq!(parse_amount(&json!("abc")), Decimal::ZERO);
    }

    #[test]
    fn list_accepts_known_envelopes() {
        let item = json!({ "txid": "TX1", "valor": "10.00" });
        let fallback = ChargeStatus::Ativa;
        assert_eq!(parse_charge_list(&json!({ "success": true, "dados": { "cobrancas": [item.clone()] } }), fallback).len(), 1);
        assert_eq!(parse_charge_list(&json!({ "dados": [item.clone(), item.clone()] }), fallback).len(), 2);
        assert_eq!(parse_charge_list(&json!({ "cobrancas": [item.clone()] }), fallback).len(), 1);
        assert_eq!(parse_charge_list(&json!([item]), fallback).len(), 1);
        assert!(parse_charge_list(&json!({ "success": false }), fallback).is_empty());
    }

    #[test]
    fn creation_payload_may_be_array_or_envelope() {
        let body = json!({ "dados": [{ "txid": "TX9" }] });
        assert_eq!(charge_payload(&body).and_then(|v| v.get("txid")), Some(&json!("TX9")));
        assert!(charge_payload(&json!("ok")).is_none());
    }

    #[test]
    fn missing_creation_fields_come_from_request() {
        let request = NewPixCharge {
            amount: Decimal::new(5000, 2),
            cpf: "12345678901".into(),
            payer_name: "Ana Silva".into(),
        };
        let created = normalize_charge(&json!({ "txid": "TX1" }), ChargeStatus::Ativa).unwrap();
        let filled = fill_from_request(created, &request);
        assert_eq!(filled.payer_name, "Ana Silva");
        assert_eq!(filled.cpf, "12345678901");
        assert_eq!(filled.amount.to_string(), "50.00");
    }
}
