// src/services/dashboard_service.rs

use chrono::{DateTime, Utc};

use crate::{
    common::error::AppError,
    db::TrackingRepository,
    models::{
        dashboard::{ClientRangeEntry, DashboardSummary},
        reseller::Reseller,
        tracking::TrackingCounts,
    },
    services::{pix_service::PixService, reseller_service::ResellerService},
};

const RECENT_LIMIT: usize = 5;

#[derive(Clone)]
pub struct DashboardService {
    resellers: ResellerService,
    pix: PixService,
    tracking: TrackingRepository,
}

impl DashboardService {
    pub fn new(resellers: ResellerService, pix: PixService, tracking: TrackingRepository) -> Self {
        Self {
            resellers,
            pix,
            tracking,
        }
    }

    /// Cada card falha sozinho: o valor vira `null` e o motivo entra em `warnings`.
    pub async fn get_summary(&self) -> DashboardSummary {
        let mut warnings = Vec::new();

        let (resellers, pix_status, tracked) = tokio::join!(
            self.resellers.list(None),
            self.pix.status(),
            self.tracking.list()
        );

        let (total_resellers, total_clients) = match resellers {
            Ok(list) => (
                Some(list.len()),
                Some(list.iter().map(|r| u64::from(r.client_count)).sum()),
            ),
            Err(e) => {
                tracing::warn!("Resumo sem dados de revendedores: {}", e);
                warnings.push(format!("Não foi possível carregar os revendedores: {e}"));
                (None, None)
            }
        };

        if !pix_status.connection {
            warnings.push("Gateway PIX indisponível.".to_string());
        }

        DashboardSummary {
            total_resellers,
            total_clients,
            pix_connection: pix_status.connection,
            pix_authenticated: pix_status.authenticated,
            tracking: TrackingCounts::from_entries(&tracked),
            warnings,
        }
    }

    pub async fn get_clients_chart(&self) -> Result<Vec<ClientRangeEntry>, AppError> {
        let resellers = self.resellers.list(None).await?;
        Ok(client_ranges(&resellers))
    }

    pub async fn get_recent_resellers(&self) -> Result<Vec<Reseller>, AppError> {
        let resellers = self.resellers.list(None).await?;
        Ok(most_recent(resellers, RECENT_LIMIT))
    }
}

pub fn client_ranges(resellers: &[Reseller]) -> Vec<ClientRangeEntry> {
    let mut counts = [0usize; 5];
    for reseller in resellers {
        let slot = match reseller.client_count {
            0..=10 => 0,
            11..=20 => 1,
            21..=50 => 2,
            51..=100 => 3,
            _ => 4,
        };
        counts[slot] += 1;
    }

    ["0-10", "11-20", "21-50", "51-100", "100+"]
        .iter()
        .zip(counts)
        .map(|(name, value)| ClientRangeEntry {
            name: name.to_string(),
            value,
        })
        .collect()
}

// Mais novos primeiro pela data de criação; sem data, pelo id decrescente.
pub fn most_recent(mut resellers: Vec<Reseller>, limit: usize) -> Vec<Reseller> {
    let created = |r: &Reseller| -> Option<DateTime<Utc>> {
        r.created_at
            .as_deref()
            .and_then(|c| DateTime::parse_from_rfc3339(c).ok())
            .map(|d| d.with_timezone(&Utc))
    };

    resellers.sort_by(|a, b| {
        created(b)
            .cmp(&created(a))
            .then_with(|| b.id.cmp(&a.id))
    });
    resellers.truncate(limit);
    resellers
}
