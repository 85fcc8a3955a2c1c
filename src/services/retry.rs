// src/services/retry.rs

use std::{future::Future, time::Duration};

use crate::common::error::AppError;

/// Novas tentativas com espera exponencial: `min(base * 2^n, max)`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Tentativas extras depois da primeira falha
    pub retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Repete `op` enquanto o erro for transitório e houver tentativas sobrando.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.retries => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        "{} falhou ({}). Nova tentativa {}/{} em {:?}",
                        label,
                        e,
                        attempt + 1,
                        self.retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy(retries: u32) -> RetryPolicy {
        RetryPolicy {
            retries,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        }
    }

    #[test]
    fn delay_doubles_until_the_cap() {
        let p = RetryPolicy {
            retries: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(30000),
        };
        assert_eq!(p.delay_for(0), Duration::from_millis(1000));
        assert_eq!(p.delay_for(1), Duration::from_millis(2000));
        assert_eq!(p.delay_for(2), Duration::from_millis(4000));
        assert_eq!(p.delay_for(10), Duration::from_millis(30000));
        assert_eq!(p.delay_for(40), Duration::from_millis(30000));
    }

    #[tokio::test]
    async fn retries_transient_errors_then_gives_up() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), AppError> = policy(3)
            .run("teste", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AppError::UpstreamStatus { service: "x", status: 503 })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), AppError> = policy(3)
            .run("teste", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AppError::UpstreamStatus { service: "x", status: 400 })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn succeeds_after_a_transient_failure() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let value = policy(3)
            .run("teste", || async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(AppError::UpstreamStatus { service: "x", status: 502 })
                } else {
                    Ok(7)
                }
            })
            .await
            .unwrap();

        assert_eq!(value, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
