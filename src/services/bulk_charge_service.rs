// src/services/bulk_charge_service.rs

use std::sync::Arc;

use crate::{
    clients::ChargeGateway,
    common::{error::AppError, validation::only_digits},
    db::{NotificationRepository, TrackingRepository},
    models::{
        jobs::{ItemOutcome, JobItem, JobKind, JobStatus},
        notification::NotificationKind,
        pix::{amount_for_clients, NewPixCharge},
        reseller::Reseller,
        tracking::TrackingStatus,
    },
    services::{
        job_registry::{run_queue, ExclusiveRun, JobHandle, JobRegistry, QueueSettings},
        reseller_service::ResellerService,
    },
};

#[derive(Clone)]
pub struct BulkChargeService {
    gateway: Arc<dyn ChargeGateway>,
    resellers: ResellerService,
    tracking: TrackingRepository,
    notifications: NotificationRepository,
    jobs: JobRegistry,
    queue: QueueSettings,
    running: ExclusiveRun,
}

impl BulkChargeService {
    pub fn new(
        gateway: Arc<dyn ChargeGateway>,
        resellers: ResellerService,
        tracking: TrackingRepository,
        notifications: NotificationRepository,
        jobs: JobRegistry,
        queue: QueueSettings,
    ) -> Self {
        Self {
            gateway,
            resellers,
            tracking,
            notifications,
            jobs,
            queue,
            running: ExclusiveRun::new(),
        }
    }

    /// Valida a seleção, registra o trabalho e o dispara em segundo plano.
    /// Só um lote de cobranças roda por vez; um segundo pedido recebe conflito.
    pub async fn start(&self, reseller_ids: &[String]) -> Result<JobStatus, AppError> {
        if reseller_ids.is_empty() {
            return Err(AppError::InvalidInput(
                "Selecione pelo menos um revendedor para gerar cobranças.".to_string(),
            ));
        }

        let Some(guard) = self.running.try_acquire() else {
            return Err(AppError::Conflict(
                "Já existe uma geração de cobranças em andamento.".to_string(),
            ));
        };

        let selected = self.resellers.select(reseller_ids).await?;
        if selected.is_empty() {
            return Err(AppError::NotFound(
                "Nenhum dos revendedores selecionados foi encontrado.".to_string(),
            ));
        }

        let handle = self.prepare(&selected);
        let snapshot = handle.snapshot().await;

        tracing::info!(
            "Tarefa {} iniciada: {} cobranças em massa",
            handle.id(),
            selected.len()
        );

        let service = self.clone();
        tokio::spawn(async move {
            let _guard = guard;
            service.execute(handle, selected).await;
        });

        Ok(snapshot)
    }

    pub fn prepare(&self, resellers: &[Reseller]) -> Arc<JobHandle> {
        let items = resellers
            .iter()
            .map(|r| JobItem {
                reseller_id: r.id.clone(),
                reseller_name: r.full_name(),
                outcome: ItemOutcome::Waiting,
                amount: Some(amount_for_clients(r.client_count)),
                charge_id: None,
                error: None,
            })
            .collect();

        self.jobs.register(JobStatus::new(JobKind::BulkCharge, items))
    }

    /// Roda o lote até o fim (ou até o cancelamento) e registra a notificação final.
    pub async fn execute(&self, handle: Arc<JobHandle>, resellers: Vec<Reseller>) -> JobStatus {
        run_queue(&handle, resellers, self.queue, |reseller| async move {
            self.charge_reseller(&reseller).await
        })
        .await;

        let snapshot = handle.snapshot().await;
        let summary = format!(
            "Foram geradas {} de {} cobranças com sucesso.",
            snapshot.successful, snapshot.processed
        );
        let status = handle.complete(summary.clone()).await;

        let kind = if status.failed > 0 {
            NotificationKind::Warning
        } else {
            NotificationKind::Success
        };
        if let Err(e) = self
            .notifications
            .add("Cobranças geradas", &summary, kind)
            .await
        {
            tracing::warn!("Falha ao registrar notificação do lote {}: {}", status.id, e);
        }

        tracing::info!("Tarefa {} finalizada ({:?}): {}", status.id, status.state, summary);
        status
    }

    // pending -> chamada ao gateway -> generated | error
    async fn charge_reseller(&self, reseller: &Reseller) -> Result<Option<String>, AppError> {
        self.tracking
            .upsert(&reseller.id, None, TrackingStatus::Pending, None)
            .await?;

        let request = NewPixCharge {
            amount: amount_for_clients(reseller.client_count),
            cpf: only_digits(&reseller.cpf),
            payer_name: reseller.full_name(),
        };

        match self.gateway.create_charge(&request).await {
            Ok(charge) => {
                let charge_id = charge.id.clone();
                self.tracking
                    .upsert(
                        &reseller.id,
                        Some(charge_id.clone()),
                        TrackingStatus::Generated,
                        Some(charge),
                    )
                    .await?;
                tracing::info!(
                    "Cobrança {} gerada para o revendedor {} ({})",
                    charge_id,
                    reseller.id,
                    request.amount
                );
                Ok(Some(charge_id))
            }
            Err(e) => {
                tracing::warn!("Falha ao gerar cobrança para o revendedor {}: {}", reseller.id, e);
                self.tracking
                    .upsert(&reseller.id, None, TrackingStatus::Error, None)
                    .await?;
                Err(e)
            }
        }
    }
}
