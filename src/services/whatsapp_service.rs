// src/services/whatsapp_service.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    clients::{ChargeGateway, WhatsAppClient},
    common::{error::AppError, validation::only_digits},
    db::{NotificationRepository, TrackingRepository},
    models::{
        jobs::{ItemOutcome, JobItem, JobKind, JobStatus},
        notification::NotificationKind,
        pix::PixCharge,
        reseller::Reseller,
        tracking::TrackingStatus,
        whatsapp::{RenderedMessage, SendRawMessagePayload, WhatsAppMessage},
    },
    services::{
        job_registry::{run_queue, ExclusiveRun, JobHandle, JobRegistry, QueueSettings},
        message_template::{render, template_or_default},
        reseller_service::ResellerService,
    },
};

#[derive(Clone)]
pub struct WhatsAppService {
    client: WhatsAppClient,
    gateway: Arc<dyn ChargeGateway>,
    resellers: ResellerService,
    tracking: TrackingRepository,
    notifications: NotificationRepository,
    jobs: JobRegistry,
    queue: QueueSettings,
    /// Atraso pedido ao serviço de envio, em milissegundos
    send_delay_ms: u64,
    running: ExclusiveRun,
}

impl WhatsAppService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        client: WhatsAppClient,
        gateway: Arc<dyn ChargeGateway>,
        resellers: ResellerService,
        tracking: TrackingRepository,
        notifications: NotificationRepository,
        jobs: JobRegistry,
        queue: QueueSettings,
        send_delay_ms: u64,
    ) -> Self {
        Self {
            client,
            gateway,
            resellers,
            tracking,
            notifications,
            jobs,
            queue,
            send_delay_ms,
            running: ExclusiveRun::new(),
        }
    }

    async fn load_pair(
        &self,
        reseller_id: &str,
        charge_id: &str,
    ) -> Result<(Reseller, PixCharge), AppError> {
        let reseller = self.resellers.get(reseller_id).await?;
        let charge = self
            .gateway
            .get_charge(charge_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cobrança não encontrada".to_string()))?;
        Ok((reseller, charge))
    }

    fn compose(&self, reseller: &Reseller, charge: &PixCharge, template: Option<&str>) -> WhatsAppMessage {
        WhatsAppMessage {
            delay: self.send_delay_ms,
            number: only_digits(&reseller.whatsapp),
            text: render(template_or_default(template), reseller, charge),
        }
    }

    pub async fn preview(
        &self,
        reseller_id: &str,
        charge_id: &str,
        template: Option<&str>,
    ) -> Result<RenderedMessage, AppError> {
        let (reseller, charge) = self.load_pair(reseller_id, charge_id).await?;
        let message = self.compose(&reseller, &charge, template);
        Ok(RenderedMessage {
            number: message.number,
            text: message.text,
        })
    }

    /// Envia a cobrança ao revendedor e marca o rastreamento como enviado.
    pub async fn send_charge(
        &self,
        reseller_id: &str,
        charge_id: &str,
        template: Option<&str>,
    ) -> Result<RenderedMessage, AppError> {
        let (reseller, charge) = self.load_pair(reseller_id, charge_id).await?;
        let message = self.compose(&reseller, &charge, template);
        message.validate()?;

        self.client.send_text(&message).await?;

        let txid = charge.txid.clone();
        let id = charge.id.clone();
        self.tracking
            .upsert(&reseller.id, Some(id.clone()), TrackingStatus::Sent, Some(charge))
            .await?;
        self.tracking.mark_sent(&id, txid.as_deref()).await?;

        Ok(RenderedMessage {
            number: message.number,
            text: message.text,
        })
    }

    pub async fn send_raw(&self, payload: SendRawMessagePayload) -> Result<(), AppError> {
        let message = WhatsAppMessage {
            delay: payload.delay.unwrap_or(self.send_delay_ms),
            number: only_digits(&payload.number),
            text: payload.text,
        };
        message.validate()?;
        self.client.send_text(&message).await
    }

    /// Envio em massa para os revendedores selecionados que têm cobrança gerada.
    pub async fn start_bulk_send(
        &self,
        reseller_ids: &[String],
        template: Option<String>,
    ) -> Result<JobStatus, AppError> {
        if reseller_ids.is_empty() {
            return Err(AppError::InvalidInput(
                "Selecione pelo menos um revendedor para enviar mensagens.".to_string(),
            ));
        }

        let Some(guard) = self.running.try_acquire() else {
            return Err(AppError::Conflict(
                "Já existe um envio em massa em andamento.".to_string(),
            ));
        };

        let selected = self.resellers.select(reseller_ids).await?;
        let pending = self.with_generated_charges(selected).await;
        if pending.is_empty() {
            return Err(AppError::InvalidInput(
                "Nenhum dos revendedores selecionados tem cobrança gerada para envio.".to_string(),
            ));
        }

        let handle = self.prepare(&pending);
        let snapshot = handle.snapshot().await;
        tracing::info!("Tarefa {} iniciada: {} mensagens em massa", handle.id(), pending.len());

        let service = self.clone();
        tokio::spawn(async move {
            let _guard = guard;
            service.execute(handle, pending, template).await;
        });

        Ok(snapshot)
    }

    async fn with_generated_charges(&self, resellers: Vec<Reseller>) -> Vec<(Reseller, PixCharge)> {
        let tracked = self.tracking.list().await;
        resellers
            .into_iter()
            .filter_map(|r| {
                let charge = tracked
                    .iter()
                    .find(|t| t.reseller_id == r.id && t.status == TrackingStatus::Generated)
                    .and_then(|t| t.charge_data.clone())?;
                Some((r, charge))
            })
            .collect()
    }

    pub fn prepare(&self, pending: &[(Reseller, PixCharge)]) -> Arc<JobHandle> {
        let items = pending
            .iter()
            .map(|(r, c)| JobItem {
                reseller_id: r.id.clone(),
                reseller_name: r.full_name(),
                outcome: ItemOutcome::Waiting,
                amount: Some(c.amount),
                charge_id: Some(c.id.clone()),
                error: None,
            })
            .collect();
        self.jobs.register(JobStatus::new(JobKind::BulkWhatsapp, items))
    }

    pub async fn execute(
        &self,
        handle: Arc<JobHandle>,
        pending: Vec<(Reseller, PixCharge)>,
        template: Option<String>,
    ) -> JobStatus {
        let template = template.as_deref();
        run_queue(&handle, pending, self.queue, |(reseller, charge)| async move {
            let message = self.compose(&reseller, &charge, template);
            message.validate()?;
            if let Err(e) = self.client.send_text(&message).await {
                tracing::warn!("Falha ao enviar mensagem ao revendedor {}: {}", reseller.id, e);
                return Err(e);
            }

            let id = charge.id.clone();
            self.tracking
                .upsert(&reseller.id, Some(id.clone()), TrackingStatus::Sent, Some(charge))
                .await?;
            Ok(Some(id))
        })
        .await;

        let snapshot = handle.snapshot().await;
        let summary = format!(
            "Foram enviadas {} de {} mensagens com sucesso.",
            snapshot.successful, snapshot.processed
        );
        let status = handle.complete(summary.clone()).await;

        let kind = if status.failed > 0 {
            NotificationKind::Warning
        } else {
            NotificationKind::Success
        };
        if let Err(e) = self.notifications.add("Mensagens enviadas", &summary, kind).await {
            tracing::warn!("Falha ao registrar notificação do lote {}: {}", status.id, e);
        }

        status
    }
}
