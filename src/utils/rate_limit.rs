use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio::sync::{Semaphore, SemaphorePermit};

/// Caps the number of in-flight requests to EDGAR.
#[derive(Clone)]
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
}

impl RateLimiter {
    pub fn new(max_concurrent: usize) -> Self {
        RateLimiter {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>> {
        self.semaphore
            .acquire()
            .await
            .map_err(|_| anyhow!("Rate limiter closed"))
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(crate::core::config::DEFAULT_MAX_CONCURRENT) // SEC allows 10 requests per second
    }
}
