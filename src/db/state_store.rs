// src/db/state_store.rs

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{
    common::error::AppError,
    models::{notification::Notification, settings::Theme, tracking::ChargeTracking},
};

/// Versão atual do documento persistido. Qualquer outra é descartada na carga.
pub const STATE_VERSION: u32 = 1;

// Documento único gravado em disco:
// { "version": 1, "pixChargeTracking": [...], "theme": "light", "notifications": [...] }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientState {
    pub version: u32,

    #[serde(rename = "pixChargeTracking", default)]
    pub charge_tracking: Vec<ChargeTracking>,

    #[serde(default)]
    pub theme: Theme,

    #[serde(default)]
    pub notifications: Vec<Notification>,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            charge_tracking: Vec::new(),
            theme: Theme::default(),
            notifications: Vec::new(),
        }
    }
}

/// Armazenamento chave-valor do painel (o antigo "localStorage").
/// Cada mutação é gravada imediatamente; o lock serializa as escritas.
#[derive(Clone)]
pub struct StateStore {
    state: Arc<Mutex<ClientState>>,
    path: Option<PathBuf>,
}

impl StateStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let state = load(&path).await?;

        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            path: Some(path),
        })
    }

    /// Sem arquivo. Usado nos testes.
    pub fn in_memory() -> Self {
        Self {
            state: Arc::new(Mutex::new(ClientState::default())),
            path: None,
        }
    }

    pub async fn read<R>(&self, f: impl FnOnce(&ClientState) -> R) -> R {
        let state = self.state.lock().await;
        f(&state)
    }

    /// Aplica a mutação numa cópia e só troca o estado em memória depois
    /// que a cópia foi gravada. Falha de escrita não deixa rastro.
    pub async fn update<R>(&self, f: impl FnOnce(&mut ClientState) -> R) -> Result<R, AppError> {
        let mut state = self.state.lock().await;

        let Some(path) = &self.path else {
            return Ok(f(&mut state));
        };

        let mut next = state.clone();
        let result = f(&mut next);
        persist(path, &next).await?;
        *state = next;

        Ok(result)
    }
}

async fn load(path: &Path) -> Result<ClientState, AppError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("Arquivo de estado {} ainda não existe, começando vazio.", path.display());
            return Ok(ClientState::default());
        }
        Err(e) => return Err(e.into()),
    };

    if raw.trim().is_empty() {
        return Ok(ClientState::default());
    }

    match serde_json::from_str::<ClientState>(&raw) {
        Ok(state) if state.version == STATE_VERSION => Ok(state),
        Ok(state) => {
            tracing::warn!(
                "Arquivo de estado com versão {} (esperada {}), descartando.",
                state.version,
                STATE_VERSION
            );
            Ok(ClientState::default())
        }
        Err(e) => {
            tracing::warn!("Arquivo de estado corrompido ({}), descartando.", e);
            Ok(ClientState::default())
        }
    }
}

// Grava em arquivo temporário e renomeia, para nunca deixar um JSON pela metade.
async fn persist(path: &Path, state: &ClientState) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let body = serde_json::to_vec_pretty(state)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, body).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tracking::TrackingStatus;

    #[tokio::test]
    async fn missing_file_starts_with_default_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::open(dir.path().join("state.json")).await.unwrap();
        let state = store.read(|s| s.clone()).await;
        assert_eq!(state, ClientState::default());
    }

    #[tokio::test]
    async fn updates_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let store = StateStore::open(&path).await.unwrap();
        store
            .update(|s| {
                s.theme = Theme::Dark;
                s.charge_tracking.push(ChargeTracking {
                    reseller_id: "r1".into(),
                    charge_id: Some("c1".into()),
                    txid: None,
                    status: TrackingStatus::Generated,
                    last_checked: None,
                    charge_data: None,
                });
            })
            .await
            .unwrap();

        let reopened = StateStore::open(&path).await.unwrap();
        let (theme, tracked) = reopened
            .read(|s| (s.theme, s.charge_tracking.len()))
            .await;
        assert_eq!(theme, Theme::Dark);
        assert_eq!(tracked, 1);
    }

    #[tokio::test]
    async fn corrupt_or_foreign_version_is_discarded() {
        let dir = tempfile::tempdir().unwrap();

        let corrupt = dir.path().join("corrupt.json");
        tokio::fs::write(&corrupt, "{not json").await.unwrap();
        let store = StateStore::open(&corrupt).await.unwrap();
        assert_eq!(store.read(|s| s.clone()).await, ClientState::default());

        let old = dir.path().join("old.json");
        tokio::fs::write(&old, r#"{"version":0,"theme":"dark"}"#).await.unwrap();
        let store = StateStore::open(&old).await.unwrap();
        assert_eq!(store.read(|s| s.theme).await, Theme::Light);
    }

    #[tokio::test]
    async fn failed_write_leaves_memory_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("state.json");
        let store = StateStore::open(&path).await.unwrap();

        // Um arquivo no lugar do diretório faz a gravação falhar.
        tokio::fs::write(dir.path().join("sub"), "bloqueio").await.unwrap();

        let result = store.update(|s| s.theme = Theme::Dark).await;
        assert!(result.is_err());
        assert_eq!(store.read(|s| s.theme).await, Theme::Light);

        // Com o caminho liberado, a próxima gravação não carrega a mudança perdida.
        tokio::fs::remove_file(dir.path().join("sub")).await.unwrap();
        store
            .update(|s| s.notifications.clear())
            .await
            .unwrap();
        let reopened = StateStore::open(&path).await.unwrap();
        assert_eq!(reopened.read(|s| s.theme).await, Theme::Light);
    }
}
