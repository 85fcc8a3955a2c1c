// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Revendedores ---
        handlers::resellers::list_resellers,
        handlers::resellers::create_reseller,
        handlers::resellers::delete_all_resellers,
        handlers::resellers::get_reseller,
        handlers::resellers::update_reseller,
        handlers::resellers::delete_reseller,

        // --- PIX ---
        handlers::pix::get_status,
        handlers::pix::list_charges,
        handlers::pix::create_charge,
        handlers::pix::get_charge,
        handlers::pix::cancel_charge,
        handlers::pix::cancel_all_active,
        handlers::pix::send_charge,
        handlers::pix::start_bulk_charges,
        handlers::pix::list_tracking,
        handlers::pix::clear_tracking,
        handlers::pix::refresh_tracking,

        // --- Tarefas ---
        handlers::jobs::get_job,
        handlers::jobs::cancel_job,

        // --- WhatsApp ---
        handlers::whatsapp::preview_message,
        handlers::whatsapp::send_charge_message,
        handlers::whatsapp::send_raw_message,
        handlers::whatsapp::start_bulk_send,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
        handlers::dashboard::get_clients_chart,
        handlers::dashboard::get_recent_resellers,

        // --- Notificações ---
        handlers::notifications::list_notifications,
        handlers::notifications::mark_read,
        handlers::notifications::mark_all_read,
        handlers::notifications::clear_notifications,

        // --- Configurações ---
        handlers::settings::get_settings,
        handlers::settings::update_theme,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Revendedores ---
            models::reseller::Reseller,
            models::reseller::CreateResellerPayload,
            models::reseller::UpdateResellerPayload,

            // --- PIX ---
            models::pix::ChargeStatus,
            models::pix::ChargeBucket,
            models::pix::PixCharge,
            models::pix::CreateChargePayload,
            models::pix::PixStatus,
            models::pix::SendChargePayload,

            // --- Rastreamento ---
            models::tracking::TrackingStatus,
            models::tracking::ChargeTracking,
            models::tracking::TrackingCounts,
            models::tracking::ReconcileReport,

            // --- Tarefas ---
            models::jobs::JobKind,
            models::jobs::JobState,
            models::jobs::ItemOutcome,
            models::jobs::JobItem,
            models::jobs::JobStatus,
            models::jobs::BulkChargePayload,

            // --- WhatsApp ---
            models::whatsapp::SendRawMessagePayload,
            models::whatsapp::MessagePreviewPayload,
            models::whatsapp::BulkSendPayload,
            models::whatsapp::RenderedMessage,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::ClientRangeEntry,

            // --- Notificações ---
            models::notification::NotificationKind,
            models::notification::Notification,
            models::notification::NotificationList,

            // --- Configurações ---
            models::settings::Theme,
            models::settings::DashboardSettings,
            models::settings::UpdateThemeRequest,
        )
    ),
    tags(
        (name = "Auth", description = "Login do operador do painel"),
        (name = "Revendedores", description = "Cadastro de revendedores (serviço externo)"),
        (name = "PIX", description = "Cobranças PIX, geração em massa e rastreamento"),
        (name = "Tarefas", description = "Acompanhamento e cancelamento de tarefas em lote"),
        (name = "WhatsApp", description = "Montagem e envio de mensagens de cobrança"),
        (name = "Dashboard", description = "Indicadores e gráficos do painel"),
        (name = "Notificações", description = "Avisos gerados pelas tarefas em segundo plano"),
        (name = "Configurações", description = "Tema e endereços dos serviços")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
