// src/services/settings_service.rs

use crate::{
    common::error::AppError,
    db::PreferencesRepository,
    models::settings::{DashboardSettings, Theme},
};

// Endereços dos serviços externos em uso; só leitura, vêm da configuração.
#[derive(Debug, Clone)]
pub struct ServiceUrls {
    pub reseller_api_url: String,
    pub pix_api_url: String,
    pub whatsapp_api_url: String,
}

#[derive(Clone)]
pub struct SettingsService {
    preferences: PreferencesRepository,
    urls: ServiceUrls,
}

impl SettingsService {
    pub fn new(preferences: PreferencesRepository, urls: ServiceUrls) -> Self {
        Self { preferences, urls }
    }

    pub async fn get_settings(&self) -> DashboardSettings {
        DashboardSettings {
            theme: self.preferences.theme().await,
            reseller_api_url: self.urls.reseller_api_url.clone(),
            pix_api_url: self.urls.pix_api_url.clone(),
            whatsapp_api_url: self.urls.whatsapp_api_url.clone(),
        }
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<DashboardSettings, AppError> {
        self.preferences.set_theme(theme).await?;
        Ok(self.get_settings().await)
    }
}
