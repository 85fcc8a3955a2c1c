// src/models/settings.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSettings {
    pub theme: Theme,

    #[schema(example = "https://dash.prime-stream.site/api")]
    pub reseller_api_url: String,

    #[schema(example = "https://efi.prime-stream.site")]
    pub pix_api_url: String,

    pub whatsapp_api_url: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateThemeRequest {
    pub theme: Theme,
}
