// src/services/reseller_service.rs

use validator::Validate;

use crate::{
    clients::ResellerClient,
    common::error::AppError,
    models::reseller::{CreateResellerPayload, Reseller, UpdateResellerPayload},
};

#[derive(Clone)]
pub struct ResellerService {
    client: ResellerClient,
}

impl ResellerService {
    pub fn new(client: ResellerClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Reseller>, AppError> {
        let resellers = self.client.list().await?;
        Ok(match search {
            Some(term) => resellers.into_iter().filter(|r| r.matches(term)).collect(),
            None => resellers,
        })
    }

    pub async fn get(&self, id: &str) -> Result<Reseller, AppError> {
        self.client
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Revendedor não encontrado".to_string()))
    }

    pub async fn create(&self, payload: CreateResellerPayload) -> Result<Reseller, AppError> {
        payload.validate()?;
        let created = self.client.create(&payload).await?;
        tracing::info!("Revendedor {} criado", created.id);
        Ok(created)
    }

    pub async fn update(
        &self,
        id: &str,
        payload: UpdateResellerPayload,
    ) -> Result<Reseller, AppError> {
        payload.validate()?;
        self.client
            .update(id, &payload)
            .await?
            .ok_or_else(|| AppError::NotFound("Revendedor não encontrado".to_string()))
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        if !self.client.delete(id).await? {
            return Err(AppError::NotFound("Revendedor não encontrado".to_string()));
        }
        tracing::info!("Revendedor {} excluído", id);
        Ok(())
    }

    pub async fn delete_all(&self) -> Result<(), AppError> {
        self.client.delete_all().await?;
        tracing::warn!("Todos os revendedores foram excluídos");
        Ok(())
    }

    /// Revendedores escolhidos numa seleção, na ordem do cadastro.
    pub async fn select(&self, ids: &[String]) -> Result<Vec<Reseller>, AppError> {
        let all = self.client.list().await?;
        Ok(all
            .into_iter()
            .filter(|r| ids.iter().any(|id| id == &r.id))
            .collect())
    }
}
