// src/services/pix_service.rs

use validator::Validate;

use crate::{
    clients::{ChargeGateway, PixClient},
    common::{error::AppError, validation::only_digits},
    db::TrackingRepository,
    models::{
        pix::{ChargeBucket, CreateChargePayload, NewPixCharge, PixCharge, PixStatus},
        tracking::{ChargeTracking, TrackingStatus},
    },
    services::retry::RetryPolicy,
};

#[derive(Clone)]
pub struct PixService {
    client: PixClient,
    tracking: TrackingRepository,
    list_retry: RetryPolicy,
}

impl PixService {
    pub fn new(client: PixClient, tracking: TrackingRepository, list_retry: RetryPolicy) -> Self {
        Self {
            client,
            tracking,
            list_retry,
        }
    }

    /// Autenticação só é testada quando a conexão responde.
    pub async fn status(&self) -> PixStatus {
        let connection = self.client.test_connection().await;
        let authenticated = connection && self.client.test_authentication().await;
        PixStatus {
            connection,
            authenticated,
        }
    }

    pub async fn list(
        &self,
        bucket: ChargeBucket,
        search: Option<&str>,
    ) -> Result<Vec<PixCharge>, AppError> {
        let label = format!("Listagem de cobranças ({})", bucket.endpoint_segment());
        let charges = self
            .list_retry
            .run(&label, || self.client.list_charges(bucket))
            .await?;

        // O rastreamento é só cache: falhar aqui não derruba a listagem.
        match self.tracking.sync_from_listing(&charges).await {
            Ok(updated) if updated > 0 => {
                tracing::debug!("{} entradas de rastreamento atualizadas pela listagem", updated)
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Falha ao atualizar o rastreamento: {}", e),
        }

        Ok(match search {
            Some(term) => charges.into_iter().filter(|c| c.matches(term)).collect(),
            None => charges,
        })
    }

    pub async fn get(&self, id: &str) -> Result<PixCharge, AppError> {
        self.client
            .get_charge(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cobrança não encontrada".to_string()))
    }

    pub async fn create(&self, payload: CreateChargePayload) -> Result<PixCharge, AppError> {
        if payload.amount <= rust_decimal::Decimal::ZERO {
            return Err(AppError::InvalidInput(
                "O valor da cobrança deve ser maior que zero.".to_string(),
            ));
        }

        let request = NewPixCharge {
            amount: payload.amount,
            cpf: only_digits(&payload.cpf),
            payer_name: payload.payer_name.trim().to_string(),
        };
        request.validate()?;

        let created = self.client.create_charge(&request).await?;
        tracing::info!("Cobrança {} criada no valor de {}", created.id, created.amount);

        if let Some(reseller_id) = payload.reseller_id.as_deref() {
            self.tracking
                .upsert(
                    reseller_id,
                    Some(created.id.clone()),
                    TrackingStatus::Generated,
                    Some(created.clone()),
                )
                .await?;
        }

        Ok(created)
    }

    pub async fn cancel(&self, id: &str) -> Result<(), AppError> {
        self.client.cancel_charge(id).await?;
        tracing::info!("Cobrança {} cancelada", id);
        Ok(())
    }

    pub async fn cancel_all_active(&self) -> Result<(), AppError> {
        self.client.cancel_all_active().await?;
        tracing::warn!("Todas as cobranças ativas foram canceladas");
        Ok(())
    }

    pub async fn tracking(&self, search: Option<&str>) -> Vec<ChargeTracking> {
        let entries = self.tracking.list().await;
        match search {
            Some(term) => entries.into_iter().filter(|t| t.matches(term)).collect(),
            None => entries,
        }
    }

    pub async fn clear_tracking(&self) -> Result<(), AppError> {
        self.tracking.clear().await?;
        tracing::info!("Histórico de rastreamento limpo");
        Ok(())
    }
}
