// src/services/notification_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::NotificationRepository,
    models::notification::NotificationList,
};

#[derive(Clone)]
pub struct NotificationService {
    repo: NotificationRepository,
}

impl NotificationService {
    pub fn new(repo: NotificationRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> NotificationList {
        let items = self.repo.list().await;
        let unread_count = items.iter().filter(|n| !n.read).count();
        NotificationList { items, unread_count }
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<(), AppError> {
        if self.repo.mark_read(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("Notificação não encontrada".to_string()))
        }
    }

    pub async fn mark_all_read(&self) -> Result<(), AppError> {
        self.repo.mark_all_read().await
    }

    pub async fn clear(&self) -> Result<(), AppError> {
        self.repo.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::StateStore, models::notification::NotificationKind};

    #[tokio::test]
    async fn unread_count_follows_reads() {
        let repo = NotificationRepository::new(StateStore::in_memory());
        let first = repo.add("A", "a", NotificationKind::Info).await.unwrap();
        repo.add("B", "b", NotificationKind::Success).await.unwrap();
        let service = NotificationService::new(repo);

        let list = service.list().await;
        assert_eq!(list.unread_count, 2);
        assert_eq!(list.items[0].title, "B");

        service.mark_read(first.id).await.unwrap();
        assert_eq!(service.list().await.unread_count, 1);

        service.mark_all_read().await.unwrap();
        assert_eq!(service.list().await.unread_count, 0);

        assert!(matches!(
            service.mark_read(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));

        service.clear().await.unwrap();
        assert!(service.list().await.items.is_empty());
    }
}
