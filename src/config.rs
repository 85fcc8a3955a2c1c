// src/config.rs

use std::{env, path::PathBuf, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;

use crate::{
    clients::{build_http_client, ChargeGateway, PixClient, ResellerClient, WhatsAppClient},
    db::{NotificationRepository, PreferencesRepository, StateStore, TrackingRepository},
    services::{
        auth::AuthService,
        bulk_charge_service::BulkChargeService,
        dashboard_service::DashboardService,
        job_registry::{JobRegistry, QueueSettings},
        notification_service::NotificationService,
        pix_service::PixService,
        reconciliation_service::ReconciliationService,
        reseller_service::ResellerService,
        retry::RetryPolicy,
        settings_service::{ServiceUrls, SettingsService},
        whatsapp_service::WhatsAppService,
    },
};

const DEV_JWT_SECRET: &str = "painel-revendas-dev-secret";

/// Tudo que vem do ambiente (ou do `.env`).
#[derive(Debug, Clone)]
pub struct Settings {
    pub addr: String,
    pub jwt_secret: String,
    pub admin_username: String,
    pub admin_password: String,
    pub reseller_api_url: String,
    pub pix_api_url: String,
    pub whatsapp_api_url: String,
    pub whatsapp_api_key: String,
    pub whatsapp_send_delay_ms: u64,
    pub state_file: PathBuf,
    pub http_timeout: Duration,
    pub bulk_interval: Duration,
    pub bulk_concurrency: usize,
    pub reconcile_delay: Duration,
    pub reconcile_period: Duration,
    pub job_retention: Duration,
    pub list_retry: RetryPolicy,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET não definido, usando o segredo de desenvolvimento.");
                DEV_JWT_SECRET.to_string()
            }
        };

        let whatsapp_api_key = env::var("WHATSAPP_API_KEY").unwrap_or_default();
        if whatsapp_api_key.is_empty() {
            tracing::warn!("WHATSAPP_API_KEY não definido; os envios devem ser recusados pelo serviço.");
        }

        Ok(Self {
            addr: text("APP_ADDR", "0.0.0.0:3000"),
            jwt_secret,
            admin_username: text("ADMIN_USERNAME", "admin"),
            admin_password: text("ADMIN_PASSWORD", "admin"),
            reseller_api_url: text("RESELLER_API_URL", "https://dash.prime-stream.site/api"),
            pix_api_url: text("PIX_API_URL", "https://efi.prime-stream.site"),
            whatsapp_api_url: text(
                "WHATSAPP_API_URL",
                "http://localhost:8080/message/sendText/painel",
            ),
            whatsapp_api_key,
            whatsapp_send_delay_ms: number("WHATSAPP_SEND_DELAY_MS", 8000)?,
            state_file: PathBuf::from(text("STATE_FILE", "data/state.json")),
            http_timeout: Duration::from_secs(number("HTTP_TIMEOUT_SECS", 30)?),
            bulk_interval: Duration::from_millis(number("BULK_INTERVAL_MS", 1000)?),
            bulk_concurrency: number::<usize>("BULK_CONCURRENCY", 1)?.max(1),
            reconcile_delay: Duration::from_millis(number("RECONCILE_DELAY_MS", 500)?),
            reconcile_period: Duration::from_secs(number::<u64>("RECONCILE_PERIOD_SECS", 60)?.max(1)),
            job_retention: Duration::from_secs(number("JOB_RETENTION_SECS", 1800)?),
            list_retry: RetryPolicy {
                retries: number("LIST_RETRY_ATTEMPTS", 3)?,
                base_delay: Duration::from_millis(number("LIST_RETRY_BASE_MS", 1000)?),
                max_delay: Duration::from_millis(number("LIST_RETRY_MAX_MS", 30000)?),
            },
        })
    }
}

fn text(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

// Valor malformado é erro de inicialização, nunca cai silenciosamente no padrão.
fn number<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} inválido: '{raw}'")),
        _ => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub reseller_client: ResellerClient,
    pub auth_service: AuthService,
    pub reseller_service: ResellerService,
    pub pix_service: PixService,
    pub bulk_charge_service: BulkChargeService,
    pub reconciliation_service: ReconciliationService,
    pub whatsapp_service: WhatsAppService,
    pub dashboard_service: DashboardService,
    pub notification_service: NotificationService,
    pub settings_service: SettingsService,
    pub jobs: JobRegistry,
}

impl AppState {
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        let http = build_http_client(settings.http_timeout)?;

        let store = StateStore::open(&settings.state_file)
            .await
            .with_context(|| format!("falha ao abrir {}", settings.state_file.display()))?;
        tracing::info!("✅ Estado local carregado de {}", settings.state_file.display());

        // --- Monta o gráfico de dependências ---
        let reseller_client = ResellerClient::new(&settings.reseller_api_url, http.clone());
        let pix_client = PixClient::new(&settings.pix_api_url, http.clone());
        let whatsapp_client = WhatsAppClient::new(
            &settings.whatsapp_api_url,
            &settings.whatsapp_api_key,
            http,
        );
        let gateway: Arc<dyn ChargeGateway> = Arc::new(pix_client.clone());

        let tracking = TrackingRepository::new(store.clone());
        let notifications = NotificationRepository::new(store.clone());
        let preferences = PreferencesRepository::new(store);
        let jobs = JobRegistry::with_retention(settings.job_retention);
        let queue = QueueSettings {
            interval: settings.bulk_interval,
            concurrency: settings.bulk_concurrency,
        };

        let auth_service = AuthService::new(
            settings.jwt_secret.clone(),
            settings.admin_username.clone(),
            settings.admin_password.clone(),
        );
        let reseller_service = ResellerService::new(reseller_client.clone());
        let pix_service = PixService::new(pix_client, tracking.clone(), settings.list_retry);
        let bulk_charge_service = BulkChargeService::new(
            gateway.clone(),
            reseller_service.clone(),
            tracking.clone(),
            notifications.clone(),
            jobs.clone(),
            queue,
        );
        let reconciliation_service =
            ReconciliationService::new(gateway.clone(), tracking.clone(), settings.reconcile_delay);
        let whatsapp_service = WhatsAppService::new(
            whatsapp_client,
            gateway,
            reseller_service.clone(),
            tracking.clone(),
            notifications.clone(),
            jobs.clone(),
            queue,
            settings.whatsapp_send_delay_ms,
        );
        let dashboard_service =
            DashboardService::new(reseller_service.clone(), pix_service.clone(), tracking);
        let notification_service = NotificationService::new(notifications);
        let settings_service = SettingsService::new(
            preferences,
            ServiceUrls {
                reseller_api_url: settings.reseller_api_url.clone(),
                pix_api_url: settings.pix_api_url.clone(),
                whatsapp_api_url: settings.whatsapp_api_url.clone(),
            },
        );

        Ok(Self {
            settings: Arc::new(settings),
            reseller_client,
            auth_service,
            reseller_service,
            pix_service,
            bulk_charge_service,
            reconciliation_service,
            whatsapp_service,
            dashboard_service,
            notification_service,
            settings_service,
            jobs,
        })
    }
}
