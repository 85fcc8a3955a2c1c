// src/db/preferences_repo.rs

use crate::{common::error::AppError, db::state_store::StateStore, models::settings::Theme};

#[derive(Clone)]
pub struct PreferencesRepository {
    store: StateStore,
}

impl PreferencesRepository {
    pub fn new(store: StateStore) -> Self {
        Self { store }
    }

    pub async fn theme(&self) -> Theme {
        self.store.read(|s| s.theme).await
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<Theme, AppError> {
        self.store
            .update(|s| {
                s.theme = theme;
                s.theme
            })
            .await
    }
}
