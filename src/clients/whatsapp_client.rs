// src/clients/whatsapp_client.rs

use crate::{clients::expect_success, common::error::AppError, models::whatsapp::WhatsAppMessage};

const SERVICE: &str = "serviço de WhatsApp";

#[derive(Clone)]
pub struct WhatsAppClient {
    send_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl WhatsAppClient {
    /// `send_url` é o endpoint completo de envio de texto da instância.
    pub fn new(send_url: impl Into<String>, api_key: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            send_url: send_url.into(),
            api_key: api_key.into(),
            client,
        }
    }

    pub fn send_url(&self) -> &str {
        &self.send_url
    }

    pub async fn send_text(&self, message: &WhatsAppMessage) -> Result<(), AppError> {
        let response = self
            .client
            .post(&self.send_url)
            .header("apikey", &self.api_key)
            .json(message)
            .send()
            .await
            .map_err(AppError::upstream(SERVICE))?;

        expect_success(&response, SERVICE)?;
        tracing::info!("Mensagem enviada para {}", mask_number(&message.number));
        Ok(())
    }
}

// Só os quatro últimos dígitos vão para o log.
fn mask_number(number: &str) -> String {
    let digits: Vec<char> = number.chars().collect();
    let keep = digits.len().min(4);
    let hidden = digits.len() - keep;
    let tail: String = digits[hidden..].iter().collect();
    format!("{}{}", "*".repeat(hidden), tail)
}
