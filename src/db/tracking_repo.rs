// src/db/tracking_repo.rs

use chrono::Utc;

use crate::{
    common::error::AppError,
    db::state_store::StateStore,
    models::{
        pix::{ChargeStatus, PixCharge},
        tracking::{ChargeTracking, TrackingStatus},
    },
};

#[derive(Clone)]
pub struct TrackingRepository {
    store: StateStore,
}

impl TrackingRepository {
    pub fn new(store: StateStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Vec<ChargeTracking> {
        self.store.read(|s| s.charge_tracking.clone()).await
    }

    pub async fn len(&self) -> usize {
        self.store.read(|s| s.charge_tracking.len()).await
    }

    pub async fn find_by_reseller(&self, reseller_id: &str) -> Option<ChargeTracking> {
        self.store
            .read(|s| {
                s.charge_tracking
                    .iter()
                    .find(|t| t.reseller_id == reseller_id)
                    .cloned()
            })
            .await
    }

    /// Registra o estado atual da cobrança de um revendedor (uma entrada por revendedor).
    ///
    /// Quando o id da cobrança muda, txid e dados antigos são descartados;
    /// quando continua o mesmo, são mantidos se a atualização não trouxer novos.
    pub async fn upsert(
        &self,
        reseller_id: &str,
        charge_id: Option<String>,
        status: TrackingStatus,
        charge: Option<PixCharge>,
    ) -> Result<ChargeTracking, AppError> {
        self.store
            .update(|s| {
                let now = Utc::now();
                let new_txid = charge.as_ref().and_then(|c| c.txid.clone());

                if let Some(existing) = s
                    .charge_tracking
                    .iter_mut()
                    .find(|t| t.reseller_id == reseller_id)
                {
                    let same_charge = existing.charge_id == charge_id;
                    existing.txid = match (new_txid, same_charge) {
                        (Some(txid), _) => Some(txid),
                        (None, true) => existing.txid.take(),
                        (None, false) => None,
                    };
                    existing.charge_data = match (charge, same_charge) {
                        (Some(data), _) => Some(data),
                        (None, true) => existing.charge_data.take(),
                        (None, false) => None,
                    };
                    existing.charge_id = charge_id;
                    existing.status = status;
                    existing.last_checked = Some(now);
                    existing.clone()
                } else {
                    let entry = ChargeTracking {
                        reseller_id: reseller_id.to_string(),
                        charge_id,
                        txid: new_txid,
                        status,
                        last_checked: Some(now),
                        charge_data: charge,
                    };
                    s.charge_tracking.push(entry.clone());
                    entry
                }
            })
            .await
    }

    /// Resultado da verificação: atualiza dados e txid, mantém o status.
    /// Retorna `false` se a entrada mudou de cobrança no meio do caminho.
    pub async fn merge_checked_charge(
        &self,
        reseller_id: &str,
        charge_id: &str,
        charge: PixCharge,
    ) -> Result<bool, AppError> {
        self.store
            .update(|s| {
                let Some(entry) = s.charge_tracking.iter_mut().find(|t| {
                    t.reseller_id == reseller_id && t.charge_id.as_deref() == Some(charge_id)
                }) else {
                    return false;
                };

                if charge.txid.is_some() {
                    entry.txid = charge.txid.clone();
                }
                entry.charge_data = Some(charge);
                entry.last_checked = Some(Utc::now());
                true
            })
            .await
    }

    /// Marca como enviada toda entrada que aponta para a cobrança.
    pub async fn mark_sent(&self, charge_id: &str, txid: Option<&str>) -> Result<usize, AppError> {
        self.store
            .update(|s| {
                let now = Utc::now();
                let mut count = 0;
                for entry in s
                    .charge_tracking
                    .iter_mut()
                    .filter(|t| t.refers_to(charge_id, txid))
                {
                    entry.status = TrackingStatus::Sent;
                    entry.last_checked = Some(now);
                    count += 1;
                }
                count
            })
            .await
    }

    /// Atualiza entradas já rastreadas com o que veio de uma listagem do gateway.
    /// Nunca cria entradas novas.
    pub async fn sync_from_listing(&self, charges: &[PixCharge]) -> Result<usize, AppError> {
        if charges.is_empty() {
            return Ok(0);
        }

        self.store
            .update(|s| {
                let now = Utc::now();
                let mut updated = 0;
                for charge in charges {
                    if charge.id.is_empty() {
                        continue;
                    }
                    for entry in s
                        .charge_tracking
                        .iter_mut()
                        .filter(|t| t.refers_to(&charge.id, charge.txid.as_deref()))
                    {
                        entry.txid = charge.txid.clone().or(entry.txid.take());
                        entry.status = if charge.status == ChargeStatus::Concluida {
                            TrackingStatus::Sent
                        } else if entry.status == TrackingStatus::Sent {
                            TrackingStatus::Sent
                        } else {
                            TrackingStatus::Generated
                        };
                        entry.last_checked = Some(now);
                        entry.charge_data = Some(charge.clone());
                        updated += 1;
                    }
                }
                updated
            })
            .await
    }

    pub async fn clear(&self) -> Result<(), AppError> {
        self.store.update(|s| s.charge_tracking.clear()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn charge(id: &str, txid: Option<&str>, status: ChargeStatus) -> PixCharge {
        PixCharge {
            id: id.into(),
            txid: txid.map(Into::into),
            amount: Decimal::new(5000, 2),
            cpf: "12345678901".into(),
            payer_name: "Ana Silva".into(),
            status,
            created_at: None,
            payment_code: None,
            qr_code: None,
            detailed_status: None,
        }
    }

    #[tokio::test]
    async fn upsert_keeps_one_entry_per_reseller() {
        let repo = TrackingRepository::new(StateStore::in_memory());

        repo.upsert("r1", None, TrackingStatus::Pending, None).await.unwrap();
        let entry = repo
            .upsert(
                "r1",
                Some("c1".into()),
                TrackingStatus::Generated,
                Some(charge("c1", Some("TX1"), ChargeStatus::Ativa)),
            )
            .await
            .unwrap();

        assert_eq!(repo.len().await, 1);
        assert_eq!(entry.status, TrackingStatus::Generated);
        assert_eq!(entry.txid.as_deref(), Some("TX1"));
    }

    #[tokio::test]
    async fn same_charge_keeps_previous_data() {
        let repo = TrackingRepository::new(StateStore::in_memory());
        repo.upsert(
            "r1",
            Some("c1".into()),
            TrackingStatus::Generated,
            Some(charge("c1", Some("TX1"), ChargeStatus::Ativa)),
        )
        .await
        .unwrap();

        let entry = repo
            .upsert("r1", Some("c1".into()), TrackingStatus::Sent, None)
            .await
            .unwrap();
        assert_eq!(entry.txid.as_deref(), Some("TX1"));
        assert!(entry.charge_data.is_some());

        let entry = repo
            .upsert("r1", None, TrackingStatus::Pending, None)
            .await
            .unwrap();
        assert!(entry.txid.is_none());
        assert!(entry.charge_data.is_none());
    }

    #[tokio::test]
    async fn listing_sync_updates_but_never_adds() {
        let repo = TrackingRepository::new(StateStore::in_memory());
        repo.upsert("r1", Some("c1".into()), TrackingStatus::Generated, None)
            .await
            .unwrap();

        let updated = repo
            .sync_from_listing(&[
                charge("c1", Some("TX1"), ChargeStatus::Concluida),
                charge("c9", Some("TX9"), ChargeStatus::Ativa),
            ])
            .await
            .unwrap();

        assert_eq!(updated, 1);
        let all = repo.list().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, TrackingStatus::Sent);
        assert_eq!(all[0].txid.as_deref(), Some("TX1"));
    }

    #[tokio::test]
    async fn mark_sent_matches_by_txid() {
        let repo = TrackingRepository::new(StateStore::in_memory());
        repo.upsert(
            "r1",
            Some("c1".into()),
            TrackingStatus::Generated,
            Some(charge("c1", Some("TX1"), ChargeStatus::Ativa)),
        )
        .await
        .unwrap();

        assert_eq!(repo.mark_sent("other", Some("TX1")).await.unwrap(), 1);
        assert_eq!(repo.list().await[0].status, TrackingStatus::Sent);
        assert_eq!(repo.mark_sent("nope", None).await.unwrap(), 0);
    }
}
