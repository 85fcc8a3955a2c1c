// src/models/reseller.rs

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

// O serviço de revendedores fala português no JSON; os nomes Rust ficam em inglês.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Reseller {
    #[serde(deserialize_with = "string_or_number")]
    #[schema(example = "r1")]
    pub id: String,

    #[serde(rename = "nome")]
    #[schema(example = "Ana")]
    pub first_name: String,

    #[serde(rename = "sobrenome")]
    #[schema(example = "Silva")]
    pub last_name: String,

    #[schema(example = "12345678901")]
    pub cpf: String,

    #[schema(example = "11999999999")]
    pub whatsapp: String,

    #[serde(rename = "nome_usuario")]
    #[schema(example = "ana.s")]
    pub username: String,

    #[serde(rename = "quantidade_clientes", default, deserialize_with = "lenient_count")]
    #[schema(example = 12)]
    pub client_count: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Reseller {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Busca livre usada pelas listagens: nome, sobrenome e usuário sem
    /// diferenciar maiúsculas; CPF por substring.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return true;
        }
        let lower = term.to_lowercase();
        self.first_name.to_lowercase().contains(&lower)
            || self.last_name.to_lowercase().contains(&lower)
            || self.username.to_lowercase().contains(&lower)
            || self.cpf.contains(term)
    }
}

// Alguns cadastros antigos vêm com id numérico.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("id inválido: {other}"))),
    }
}

// Quantidade ausente, nula, negativa ou ilegível conta como zero.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let count = match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f.trunc() as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    };
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateResellerPayload {
    #[serde(rename = "nome")]
    #[validate(length(min = 2, message = "Nome deve ter pelo menos 2 caracteres"))]
    #[schema(example = "Ana")]
    pub first_name: String,

    #[serde(rename = "sobrenome")]
    #[validate(length(min = 2, message = "Sobrenome deve ter pelo menos 2 caracteres"))]
    #[schema(example = "Silva")]
    pub last_name: String,

    #[validate(custom(function = "crate::common::validation::validate_cpf"))]
    #[schema(example = "12345678901")]
    pub cpf: String,

    #[validate(custom(function = "crate::common::validation::validate_whatsapp"))]
    #[schema(example = "11999999999")]
    pub whatsapp: String,

    #[serde(rename = "nome_usuario")]
    #[validate(length(min = 3, message = "Nome de usuário deve ter pelo menos 3 caracteres"))]
    #[schema(example = "ana.s")]
    pub username: String,

    // i64 para conseguir recusar negativos com mensagem, em vez de falhar no parse.
    #[serde(rename = "quantidade_clientes")]
    #[validate(range(min = 0, message = "Quantidade de clientes não pode ser negativa"))]
    #[schema(example = 12)]
    pub client_count: i64,
}

// Atualização parcial: só os campos enviados são validados e repassados.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateResellerPayload {
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, message = "Nome deve ter pelo menos 2 caracteres"))]
    pub first_name: Option<String>,

    #[serde(rename = "sobrenome", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, message = "Sobrenome deve ter pelo menos 2 caracteres"))]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "crate::common::validation::validate_cpf"))]
    pub cpf: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "crate::common::validation::validate_whatsapp"))]
    pub whatsapp: Option<String>,

    #[serde(rename = "nome_usuario", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 3, message = "Nome de usuário deve ter pelo menos 3 caracteres"))]
    pub username: Option<String>,

    #[serde(rename = "quantidade_clientes", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "Quantidade de clientes não pode ser negativa"))]
    pub client_count: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ResellerSearchQuery {
    /// Filtro por nome, sobrenome, usuário ou CPF
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn payload() -> CreateResellerPayload {
        CreateResellerPayload {
            first_name: "Ana".into(),
            last_name: "Silva".into(),
            cpf: "12345678901".into(),
            whatsapp: "11999999999".into(),
            username: "ana.s".into(),
            client_count: 12,
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn rejects_bad_cpf_whatsapp_and_negative_clients() {
        let mut p = payload();
        p.cpf = "123".into();
        p.whatsapp = "119".into();
        p.client_count = -1;
        let errors = p.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("cpf"));
        assert!(fields.contains_key("whatsapp"));
        assert!(fields.contains_key("client_count"));
    }

    #[test]
    fn partial_update_only_checks_present_fields() {
        let update = UpdateResellerPayload {
            client_count: Some(3),
            ..Default::default()
        };
        assert!(update.validate().is_ok());

        let bad = UpdateResellerPayload {
            cpf: Some("abc".into()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn deserializes_portuguese_wire_names() {
        let json = r#"{"id":"r1","nome":"Ana","sobrenome":"Silva","cpf":"12345678901",
            "whatsapp":"11999999999","nome_usuario":"ana.s","quantidade_clientes":12}"#;
        let reseller: Reseller = serde_json::from_str(json).unwrap();
        assert_eq!(reseller.full_name(), "Ana Silva");
        assert_eq!(reseller.client_count, 12);
        assert!(reseller.matches("SILVA"));
        assert!(reseller.matches("456"));
        assert!(!reseller.matches("bruno"));
    }
}
