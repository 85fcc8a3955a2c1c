// src/services/job_registry.rs

use std::{
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::Utc;
use dashmap::DashMap;
use futures_util::{stream, StreamExt};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::jobs::{ItemOutcome, JobState, JobStatus},
    services::rate_limiter::RateLimiter,
};

/// Ritmo dos trabalhos em lote.
#[derive(Debug, Clone, Copy)]
pub struct QueueSettings {
    /// Intervalo mínimo entre o início de dois itens
    pub interval: Duration,
    /// Itens em andamento ao mesmo tempo (1 = estritamente sequencial)
    pub concurrency: usize,
}

/// Um trabalho em segundo plano: o estado visível pela API e o sinal de cancelamento.
pub struct JobHandle {
    id: Uuid,
    status: Mutex<JobStatus>,
    cancel: CancellationToken,
}

impl JobHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn snapshot(&self) -> JobStatus {
        self.status.lock().await.clone()
    }

    pub async fn update<R>(&self, f: impl FnOnce(&mut JobStatus) -> R) -> R {
        let mut status = self.status.lock().await;
        f(&mut status)
    }

    /// Registra o resultado de um item e recalcula os contadores.
    pub async fn finish_item(
        &self,
        index: usize,
        outcome: ItemOutcome,
        charge_id: Option<String>,
        error: Option<String>,
    ) {
        self.update(|s| {
            if let Some(item) = s.items.get_mut(index) {
                item.outcome = outcome;
                item.charge_id = charge_id;
                item.error = error;
            }
            match outcome {
                ItemOutcome::Succeeded => {
                    s.successful += 1;
                    s.processed += 1;
                }
                ItemOutcome::Failed => {
                    s.failed += 1;
                    s.processed += 1;
                }
                _ => {}
            }
            s.recompute_progress();
        })
        .await;
    }

    /// Fecha o trabalho. Cancelado se o sinal foi disparado, concluído caso contrário.
    pub async fn complete(&self, message: String) -> JobStatus {
        let cancelled = self.cancel.is_cancelled();
        self.update(|s| {
            s.state = if cancelled {
                JobState::Cancelled
            } else {
                JobState::Completed
            };
            s.message = Some(message);
            s.finished_at = Some(Utc::now());
            s.clone()
        })
        .await
    }
}

/// Processa `inputs` na fila do trabalho. O item `i` corresponde a `status.items[i]`.
///
/// `work` devolve o id gerado (quando houver) ou o erro do item; um erro nunca
/// interrompe os demais. Itens que não começaram antes do cancelamento ficam `skipped`.
pub async fn run_queue<T, F, Fut>(handle: &JobHandle, inputs: Vec<T>, queue: QueueSettings, work: F)
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<Option<String>, AppError>>,
{
    let limiter = RateLimiter::new(queue.interval);
    let cancel = handle.cancel_token();
    let limiter = &limiter;
    let cancel = &cancel;
    let work = &work;

    stream::iter(inputs.into_iter().enumerate())
        .map(|(index, input)| async move {
            if !limiter.acquire(cancel).await {
                handle
                    .update(|s| {
                        if let Some(item) = s.items.get_mut(index) {
                            item.outcome = ItemOutcome::Skipped;
                        }
                    })
                    .await;
                return;
            }

            handle
                .update(|s| {
                    if let Some(item) = s.items.get_mut(index) {
                        item.outcome = ItemOutcome::Running;
                    }
                })
                .await;

            match work(input).await {
                Ok(produced_id) => {
                    handle
                        .finish_item(index, ItemOutcome::Succeeded, produced_id, None)
                        .await
                }
                Err(e) => {
                    handle
                        .finish_item(index, ItemOutcome::Failed, None, Some(e.to_string()))
                        .await
                }
            }
        })
        .buffer_unordered(queue.concurrency.max(1))
        .for_each(|()| async {})
        .await;
}

/// Trava de execução exclusiva: no máximo um lote do mesmo tipo por vez.
#[derive(Clone, Default)]
pub struct ExclusiveRun {
    busy: Arc<AtomicBool>,
}

/// Mantém a trava enquanto existir; solta no drop, inclusive em erro ou pânico.
pub struct RunGuard {
    busy: Arc<AtomicBool>,
}

impl ExclusiveRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<RunGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunGuard {
                busy: self.busy.clone(),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Tempo que um trabalho encerrado continua consultável.
pub const DEFAULT_JOB_RETENTION: Duration = Duration::from_secs(30 * 60);

#[derive(Clone)]
pub struct JobRegistry {
    jobs: Arc<DashMap<Uuid, Arc<JobHandle>>>,
    retention: Duration,
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::with_retention(DEFAULT_JOB_RETENTION)
    }
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retention: Duration) -> Self {
        Self {
            jobs: Arc::new(DashMap::new()),
            retention,
        }
    }

    pub fn register(&self, status: JobStatus) -> Arc<JobHandle> {
        self.purge_finished();

        let handle = Arc::new(JobHandle {
            id: status.id,
            status: Mutex::new(status),
            cancel: CancellationToken::new(),
        });
        self.jobs.insert(handle.id, handle.clone());
        handle
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Descarta trabalhos encerrados há mais que o tempo de retenção.
    /// Trabalhos em andamento (ou com o estado travado no momento) ficam.
    pub fn purge_finished(&self) -> usize {
        let retention = chrono::Duration::from_std(self.retention).unwrap_or(chrono::Duration::MAX);
        let now = Utc::now();
        let before = self.jobs.len();

        self.jobs.retain(|_, handle| match handle.status.try_lock() {
            Ok(status) => !status
                .finished_at
                .is_some_and(|finished| now - finished >= retention),
            Err(_) => true,
        });

        let removed = before.saturating_sub(self.jobs.len());
        if removed > 0 {
            tracing::debug!("{} tarefas encerradas descartadas do registro", removed);
        }
        removed
    }

    fn handle(&self, id: Uuid) -> Result<Arc<JobHandle>, AppError> {
        // Clona o Arc para não segurar o shard do DashMap durante o await.
        self.jobs
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::NotFound("Tarefa não encontrada".to_string()))
    }

    pub async fn status(&self, id: Uuid) -> Result<JobStatus, AppError> {
        Ok(self.handle(id)?.snapshot().await)
    }

    /// Pede o cancelamento. Itens já iniciados terminam; os demais são pulados.
    pub async fn cancel(&self, id: Uuid) -> Result<JobStatus, AppError> {
        let handle = self.handle(id)?;
        let snapshot = handle.snapshot().await;
        if snapshot.state == JobState::Running {
            tracing::info!("Cancelamento solicitado para a tarefa {}", id);
            handle.cancel.cancel();
        }
        Ok(snapshot)
    }
}
