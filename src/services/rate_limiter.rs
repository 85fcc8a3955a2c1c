// src/services/rate_limiter.rs

use std::time::Duration;

use tokio::{sync::Mutex, time::Instant};
use tokio_util::sync::CancellationToken;

/// Garante um intervalo mínimo entre o início de duas chamadas ao mesmo serviço.
/// Cada `acquire` reserva o próximo horário livre, então funciona com vários
/// trabalhadores em paralelo.
pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Espera a vez. Retorna `false` se o lote foi cancelado antes disso.
    pub async fn acquire(&self, cancel: &CancellationToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }

        let wait_until = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next {
                Some(at) if at > now => at,
                _ => now,
            };
            *next = Some(slot + self.interval);
            slot
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => false,
            () = tokio::time::sleep_until(wait_until) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_call_is_immediate_and_next_ones_are_spaced() {
        let limiter = RateLimiter::new(Duration::from_millis(60));
        let cancel = CancellationToken::new();
        let start = Instant::now();

        assert!(limiter.acquire(&cancel).await);
        assert!(start.elapsed() < Duration::from_millis(50));

        assert!(limiter.acquire(&cancel).await);
        assert!(limiter.acquire(&cancel).await);
        assert!(start.elapsed() >= Duration::from_millis(120));
    }

    #[tokio::test]
    async fn cancellation_interrupts_the_wait() {
        let limiter = RateLimiter::new(Duration::from_secs(30));
        let cancel = CancellationToken::new();
        assert!(limiter.acquire(&cancel).await);

        let waiter = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            waiter.cancel();
        });

        let start = Instant::now();
        assert!(!limiter.acquire(&cancel).await);
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(!limiter.acquire(&cancel).await);
    }
}
