// src/models/jobs.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    BulkCharge,
    BulkWhatsapp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Running,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemOutcome {
    Waiting,
    Running,
    Succeeded,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobItem {
    pub reseller_id: String,
    pub reseller_name: String,
    pub outcome: ItemOutcome,

    #[schema(value_type = Option<f64>)]
    pub amount: Option<Decimal>,

    pub charge_id: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    pub id: Uuid,
    pub kind: JobKind,
    pub state: JobState,
    pub total: usize,
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    /// Percentual de itens processados, arredondado
    pub progress: u8,
    pub items: Vec<JobItem>,
    pub message: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl JobStatus {
    pub fn new(kind: JobKind, items: Vec<JobItem>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            state: JobState::Running,
            total: items.len(),
            processed: 0,
            successful: 0,
            failed: 0,
            progress: 0,
            items,
            message: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn recompute_progress(&mut self) {
        self.progress = if self.total == 0 {
            100
        } else {
            ((self.processed as f64 / self.total as f64) * 100.0).round() as u8
        };
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkChargePayload {
    pub reseller_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> JobItem {
        JobItem {
            reseller_id: id.into(),
            reseller_name: id.into(),
            outcome: ItemOutcome::Waiting,
            amount: None,
            charge_id: None,
            error: None,
        }
    }

    #[test]
    fn progress_is_rounded_percentage() {
        let mut status = JobStatus::new(JobKind::BulkCharge, vec![item("a"), item("b"), item("c")]);
        assert_eq!(status.progress, 0);
        status.processed = 1;
        status.recompute_progress();
        assert_eq!(status.progress, 33);
        status.processed = 2;
        status.recompute_progress();
        assert_eq!(status.progress, 67);
        status.processed = 3;
        status.recompute_progress();
        assert_eq!(status.progress, 100);
    }
}
