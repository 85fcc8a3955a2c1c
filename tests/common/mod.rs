#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    path::Path,
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;
use painel_revendas::{
    clients::ChargeGateway,
    common::error::AppError,
    config::{AppState, Settings},
    db::TrackingRepository,
    models::{
        pix::{ChargeStatus, NewPixCharge, PixCharge},
        reseller::Reseller,
        tracking::TrackingStatus,
    },
    routes::build_router,
    services::retry::RetryPolicy,
};
use tokio::net::TcpListener;

pub fn settings(reseller_url: &str, pix_url: &str, whatsapp_url: &str, state_file: &Path) -> Settings {
    Settings {
        addr: "127.0.0.1:0".into(),
        jwt_secret: "segredo-de-teste".into(),
        admin_username: "admin".into(),
        admin_password: "admin".into(),
        reseller_api_url: reseller_url.into(),
        pix_api_url: pix_url.into(),
        whatsapp_api_url: whatsapp_url.into(),
        whatsapp_api_key: "chave-teste".into(),
        whatsapp_send_delay_ms: 8000,
        state_file: state_file.to_path_buf(),
        http_timeout: Duration::from_secs(5),
        bulk_interval: Duration::from_millis(1),
        bulk_concurrency: 1,
        reconcile_delay: Duration::from_millis(1),
        reconcile_period: Duration::from_secs(60),
        job_retention: Duration::from_secs(1800),
        list_retry: RetryPolicy {
            retries: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        },
    }
}

/// Sobe o roteador completo numa porta livre e devolve a URL base.
pub async fn spawn_app(settings: Settings) -> (String, AppState) {
    let state = AppState::new(settings).await.expect("estado de teste");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = build_router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

pub async fn login(base: &str) -> String {
    let response = reqwest::Client::new()
        .post(format!("{base}/api/auth/login"))
        .json(&serde_json::json!({ "username": "admin", "password": "admin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

pub fn reseller(id: &str, first_name: &str, clients: u32) -> Reseller {
    Reseller {
        id: id.into(),
        first_name: first_name.into(),
        last_name: "Silva".into(),
        cpf: format!("{:0>11}", id.trim_start_matches('r')),
        whatsapp: "11999999999".into(),
        username: format!("{}.silva", first_name.to_lowercase()),
        client_count: clients,
        created_at: None,
    }
}

pub fn reseller_json(r: &Reseller) -> serde_json::Value {
    serde_json::json!({
        "id": r.id,
        "nome": r.first_name,
        "sobrenome": r.last_name,
        "cpf": r.cpf,
        "whatsapp": r.whatsapp,
        "nome_usuario": r.username,
        "quantidade_clientes": r.client_count,
    })
}

/// Gateway em memória. Falha a criação para os CPFs em `failing_cpfs`.
/// Com um rastreamento ligado, guarda o estado dele no momento de cada criação.
#[derive(Default)]
pub struct FakeGateway {
    pub failing_cpfs: HashSet<String>,
    pub created: Mutex<Vec<NewPixCharge>>,
    pub charges: Mutex<HashMap<String, PixCharge>>,
    pub lookups: Mutex<Vec<String>>,
    pub tracking: Option<TrackingRepository>,
    pub tracking_at_create: Mutex<Vec<Vec<(String, TrackingStatus)>>>,
}

impl FakeGateway {
    pub fn failing(cpfs: &[&str]) -> Self {
        Self {
            failing_cpfs: cpfs.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_charge(self, charge: PixCharge) -> Self {
        self.charges
            .lock()
            .unwrap()
            .insert(charge.id.clone(), charge);
        self
    }

    pub fn with_tracking(mut self, tracking: TrackingRepository) -> Self {
        self.tracking = Some(tracking);
        self
    }

    pub fn tracking_seen_on_create(&self) -> Vec<Vec<(String, TrackingStatus)>> {
        self.tracking_at_create.lock().unwrap().clone()
    }

    pub fn created_requests(&self) -> Vec<NewPixCharge> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChargeGateway for FakeGateway {
    async fn create_charge(&self, charge: &NewPixCharge) -> Result<PixCharge, AppError> {
        if let Some(tracking) = &self.tracking {
            let seen = tracking
                .list()
                .await
                .into_iter()
                .map(|t| (t.reseller_id, t.status))
                .collect();
            self.tracking_at_create.lock().unwrap().push(seen);
        }

        let index = {
            let mut created = self.created.lock().unwrap();
            created.push(charge.clone());
            created.len()
        };

        if self.failing_cpfs.contains(&charge.cpf) {
            return Err(AppError::UpstreamStatus {
                service: "gateway PIX",
                status: 500,
            });
        }

        let created = pix_charge(&format!("C{index}"), None, charge.amount);
        self.charges
            .lock()
            .unwrap()
            .insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn get_charge(&self, id: &str) -> Result<Option<PixCharge>, AppError> {
        self.lookups.lock().unwrap().push(id.to_string());
        Ok(self.charges.lock().unwrap().get(id).cloned())
    }
}

pub fn pix_charge(id: &str, txid: Option<&str>, amount: rust_decimal::Decimal) -> PixCharge {
    PixCharge {
        id: id.into(),
        txid: txid.map(Into::into),
        amount,
        cpf: "12345678901".into(),
        payer_name: "Ana Silva".into(),
        status: ChargeStatus::Ativa,
        created_at: None,
        payment_code: Some("00020101".into()),
        qr_code: None,
        detailed_status: None,
    }
}
