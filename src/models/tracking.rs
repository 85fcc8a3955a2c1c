// src/models/tracking.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::pix::PixCharge;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TrackingStatus {
    Pending,   // Aguardando o gateway
    Generated, // Cobrança criada
    Sent,      // Enviada por WhatsApp (ou concluída no gateway)
    Error,     // Falhou na geração
}

/// Vínculo local entre um revendedor e a última cobrança gerada para ele.
/// É só cache: o gateway é a fonte da verdade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChargeTracking {
    pub reseller_id: String,

    #[serde(default)]
    pub charge_id: Option<String>,

    #[serde(default)]
    pub txid: Option<String>,

    pub status: TrackingStatus,

    #[serde(default)]
    pub last_checked: Option<DateTime<Utc>>,

    #[serde(default)]
    pub charge_data: Option<PixCharge>,
}

impl ChargeTracking {
    /// Mesmo critério usado em todo o painel: id da cobrança ou txid.
    pub fn refers_to(&self, charge_id: &str, txid: Option<&str>) -> bool {
        self.charge_id.as_deref() == Some(charge_id)
            || txid.is_some_and(|t| self.txid.as_deref() == Some(t))
    }

    /// Busca do histórico: id da cobrança, txid e nome do pagador sem
    /// diferenciar maiúsculas; CPF por substring.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return true;
        }
        let lower = term.to_lowercase();
        let contains = |value: Option<&str>| value.is_some_and(|v| v.to_lowercase().contains(&lower));
        let charge = self.charge_data.as_ref();

        contains(self.charge_id.as_deref())
            || contains(self.txid.as_deref())
            || contains(charge.map(|c| c.payer_name.as_str()))
            || charge.is_some_and(|c| c.cpf.contains(term))
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct TrackingQuery {
    /// Filtro por id da cobrança, txid, nome ou CPF
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackingCounts {
    pub pending: usize,
    pub generated: usize,
    pub sent: usize,
    pub error: usize,
}

impl TrackingCounts {
    pub fn from_entries(entries: &[ChargeTracking]) -> Self {
        entries.iter().fold(Self::default(), |mut acc, t| {
            match t.status {
                TrackingStatus::Pending => acc.pending += 1,
                TrackingStatus::Generated => acc.generated += 1,
                TrackingStatus::Sent => acc.sent += 1,
                TrackingStatus::Error => acc.error += 1,
            }
            acc
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub checked: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub tracked: usize,
}
