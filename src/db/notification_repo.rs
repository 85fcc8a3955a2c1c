// src/db/notification_repo.rs

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::state_store::StateStore,
    models::notification::{Notification, NotificationKind},
};

#[derive(Clone)]
pub struct NotificationRepository {
    store: StateStore,
}

impl NotificationRepository {
    pub fn new(store: StateStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Vec<Notification> {
        self.store.read(|s| s.notifications.clone()).await
    }

    // Mais recentes primeiro
    pub async fn add(
        &self,
        title: &str,
        message: &str,
        kind: NotificationKind,
    ) -> Result<Notification, AppError> {
        let notification = Notification {
            id: Uuid::new_v4(),
            title: title.to_string(),
            message: message.to_string(),
            kind,
            read: false,
            timestamp: Utc::now(),
        };

        let stored = notification.clone();
        self.store
            .update(move |s| s.notifications.insert(0, stored))
            .await?;

        Ok(notification)
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<bool, AppError> {
        self.store
            .update(|s| match s.notifications.iter_mut().find(|n| n.id == id) {
                Some(n) => {
                    n.read = true;
                    true
                }
                None => false,
            })
            .await
    }

    pub async fn mark_all_read(&self) -> Result<(), AppError> {
        self.store
            .update(|s| s.notifications.iter_mut().for_each(|n| n.read = true))
            .await
    }

    pub async fn clear(&self) -> Result<(), AppError> {
        self.store.update(|s| s.notifications.clear()).await
    }
}
