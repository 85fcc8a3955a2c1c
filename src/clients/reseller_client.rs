// src/clients/reseller_client.rs

use reqwest::StatusCode;
use serde_json::Value;

use crate::{
    clients::{expect_success, read_json, unwrap_envelope},
    common::error::AppError,
    models::reseller::{CreateResellerPayload, Reseller, UpdateResellerPayload},
};

const SERVICE: &str = "API de revendedores";

#[derive(Clone)]
pub struct ResellerClient {
    base_url: String,
    client: reqwest::Client,
}

impl ResellerClient {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Cliente HTTP compartilhado, usado também pelo proxy.
    pub fn http(&self) -> &reqwest::Client {
        &self.client
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list(&self) -> Result<Vec<Reseller>, AppError> {
        let response = self
            .client
            .get(self.url("/resellers"))
            .send()
            .await
            .map_err(AppError::upstream(SERVICE))?;

        let body = read_json(response, SERVICE).await?;
        Ok(body.as_ref().map(parse_reseller_list).unwrap_or_default())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Reseller>, AppError> {
        // "new" é a rota do formulário de criação, não um id.
        if id == "new" {
            return Ok(None);
        }

        let response = self
            .client
            .get(self.url(&format!("/resellers/{id}")))
            .send()
            .await
            .map_err(AppError::upstream(SERVICE))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = read_json(response, SERVICE).await?;
        Ok(body.as_ref().and_then(parse_reseller))
    }

    pub async fn create(&self, payload: &CreateResellerPayload) -> Result<Reseller, AppError> {
        let response = self
            .client
            .post(self.url("/resellers"))
            .json(payload)
            .send()
            .await
            .map_err(AppError::upstream(SERVICE))?;

        let body = read_json(response, SERVICE).await?;
        body.as_ref()
            .and_then(parse_reseller)
            .ok_or_else(|| AppError::MalformedResponse {
                service: SERVICE,
                detail: "revendedor criado não veio na resposta".to_string(),
            })
    }

    pub async fn update(
        &self,
        id: &str,
        payload: &UpdateResellerPayload,
    ) -> Result<Option<Reseller>, AppError> {
        let response = self
            .client
            .put(self.url(&format!("/resellers/{id}")))
            .json(payload)
            .send()
            .await
            .map_err(AppError::upstream(SERVICE))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = read_json(response, SERVICE).await?;
        Ok(body.as_ref().and_then(parse_reseller))
    }

    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let response = self
            .client
            .delete(self.url(&format!("/resellers/{id}")))
            .send()
            .await
            .map_err(AppError::upstream(SERVICE))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            s if s.is_success() => Ok(true),
            s => Err(AppError::UpstreamStatus {
                service: SERVICE,
                status: s.as_u16(),
            }),
        }
    }

    pub async fn delete_all(&self) -> Result<(), AppError> {
        let response = self
            .client
            .delete(self.url("/resellers"))
            .send()
            .await
            .map_err(AppError::upstream(SERVICE))?;

        expect_success(&response, SERVICE)
    }
}

fn parse_reseller(value: &Value) -> Option<Reseller> {
    let inner = unwrap_envelope(value);
    match serde_json::from_value(inner.clone()) {
        Ok(reseller) => Some(reseller),
        Err(e) => {
            tracing::warn!("Revendedor em formato inesperado: {}", e);
            None
        }
    }
}

// Aceita `[...]`, `{ "data": [...] }` ou `{ "dados": [...] }`. Itens ruins são ignorados.
fn parse_reseller_list(value: &Value) -> Vec<Reseller> {
    let Some(items) = unwrap_envelope(value).as_array() else {
        tracing::warn!("Listagem de revendedores sem array, tratando como vazia.");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<Reseller>(item.clone()) {
            Ok(r) => Some(r),
            Err(e) => {
                tracing::warn!("Ignorando revendedor inválido na listagem: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reseller_json(id: &str) -> Value {
        json!({
            "id": id, "nome": "Ana", "sobrenome": "Silva", "cpf": "12345678901",
            "whatsapp": "11999999999", "nome_usuario": "ana.s", "quantidade_clientes": 12
        })
    }

    #[test]
    fn list_accepts_array_and_envelopes() {
        assert_eq!(parse_reseller_list(&json!([reseller_json("r1")])).len(), 1);
        assert_eq!(
            parse_reseller_list(&json!({ "data": [reseller_json("r1"), reseller_json("r2")] })).len(),
            2
        );
        assert_eq!(parse_reseller_list(&json!({ "dados": [reseller_json("r1")] })).len(), 1);
        assert!(parse_reseller_list(&json!({ "message": "ok" })).is_empty());
    }

    #[test]
    fn list_skips_broken_items() {
        let list = parse_reseller_list(&json!([reseller_json("r1"), { "id": "r2" }]));
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "r1");
    }

    #[test]
    fn numeric_ids_and_string_counts_are_accepted() {
        let raw = json!({
            "id": 7, "nome": "Ana", "sobrenome": "Silva", "cpf": "12345678901",
            "whatsapp": "11999999999", "nome_usuario": "ana.s", "quantidade_clientes": "15"
        });
        let reseller = parse_reseller(&raw).unwrap();
        assert_eq!(reseller.id, "7");
        assert_eq!(reseller.client_count, 15);
    }
}
