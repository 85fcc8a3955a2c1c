// src/services/reconciliation_service.rs

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    clients::ChargeGateway,
    common::error::AppError,
    db::TrackingRepository,
    models::tracking::{ReconcileReport, TrackingStatus},
    services::job_registry::ExclusiveRun,
};

/// Reconsulta no gateway as cobranças rastreadas e atualiza o cache local.
#[derive(Clone)]
pub struct ReconciliationService {
    gateway: Arc<dyn ChargeGateway>,
    tracking: TrackingRepository,
    delay: Duration,
    running: ExclusiveRun,
}

impl ReconciliationService {
    pub fn new(gateway: Arc<dyn ChargeGateway>, tracking: TrackingRepository, delay: Duration) -> Self {
        Self {
            gateway,
            tracking,
            delay,
            running: ExclusiveRun::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_busy()
    }

    pub async fn refresh_all(&self) -> Result<ReconcileReport, AppError> {
        let Some(_guard) = self.running.try_acquire() else {
            return Err(AppError::Conflict(
                "Já existe uma verificação de cobranças em andamento.".to_string(),
            ));
        };

        let entries = self.tracking.list().await;
        let mut report = ReconcileReport::default();
        let mut first_call = true;

        for entry in entries {
            let charge_id = match (&entry.status, entry.charge_id.as_deref()) {
                (TrackingStatus::Pending | TrackingStatus::Error, _) | (_, None) | (_, Some("")) => {
                    report.skipped += 1;
                    continue;
                }
                (_, Some(id)) => id.to_string(),
            };

            if !first_call {
                tokio::time::sleep(self.delay).await;
            }
            first_call = false;
            report.checked += 1;

            match self.gateway.get_charge(&charge_id).await {
                Ok(Some(charge)) => {
                    if self
                        .tracking
                        .merge_checked_charge(&entry.reseller_id, &charge_id, charge)
                        .await?
                    {
                        report.updated += 1;
                    }
                }
                Ok(None) => {
                    tracing::debug!("Cobrança {} não encontrada no gateway", charge_id);
                }
                Err(e) => {
                    tracing::warn!(
                        "Falha ao verificar a cobrança {} do revendedor {}: {}",
                        charge_id,
                        entry.reseller_id,
                        e
                    );
                    report.failed += 1;
                }
            }
        }

        report.tracked = self.tracking.len().await;
        Ok(report)
    }

    /// Verificação periódica enquanto houver cobranças rastreadas.
    pub fn spawn_periodic(self, period: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;

            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        if self.is_running() || self.tracking.len().await == 0 {
                            continue;
                        }
                        match self.refresh_all().await {
                            Ok(report) => tracing::info!(
                                "Verificação periódica: {} consultadas, {} atualizadas, {} falhas",
                                report.checked,
                                report.updated,
                                report.failed
                            ),
                            Err(AppError::Conflict(_)) => {}
                            Err(e) => tracing::warn!("Verificação periódica falhou: {}", e),
                        }
                    }
                }
            }

            tracing::debug!("Verificação periódica encerrada");
        })
    }
}
