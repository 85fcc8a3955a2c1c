// src/models/dashboard.rs

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::tracking::TrackingCounts;

// 1. Cards do topo. Um card que falhou vem como `null` e a causa vai em `warnings`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_resellers: Option<usize>,
    pub total_clients: Option<u64>,
    pub pix_connection: bool,
    pub pix_authenticated: bool,
    pub tracking: TrackingCounts,
    pub warnings: Vec<String>,
}

// 2. Gráfico de revendedores por faixa de clientes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ClientRangeEntry {
    #[schema(example = "0-10")]
    pub name: String,
    pub value: usize,
}
