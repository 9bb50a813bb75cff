use std::time::Duration;
use tokio::time::sleep;

use crate::config::RpcConfig;
use crate::error::MonitorError;
use crate::logging::{ErrorLogger, LogContext, PerformanceMonitor};

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Initial delay between retries in seconds
    pub initial_delay_seconds: f64,
    /// Maximum delay between retries in seconds
    pub max_delay_seconds: f64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Whether to add jitter to prevent thundering herd
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_seconds: 1.0,
            max_delay_seconds: 8.0,
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// One attempt, no retries
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_delay_seconds: 0.0,
            max_delay_seconds: 0.0,
            backoff_multiplier: 1.0,
            jitter: false,
        }
    }

    pub fn from_rpc_config(rpc: &RpcConfig) -> Self {
        Self {
            max_attempts: rpc.max_retries,
            initial_delay_seconds: rpc.retry_delay_seconds as f64,
            max_delay_seconds: rpc.max_retry_delay_seconds as f64,
            ..Self::default()
        }
    }
}

/// Retry mechanism with exponential backoff and jitter
pub struct RetryManager {
    config: RetryConfig,
    operation_name: String,
}

impl RetryManager {
    pub fn new(operation_name: &str, config: RetryConfig) -> Self {
        Self {
            config,
            operation_name: operation_name.to_string(),
        }
    }

    /// Execute an operation, retrying errors that are worth repeating
    pub async fn execute<T, F, Fut>(&self, operation: F) -> Result<T, MonitorError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, MonitorError>>,
    {
        let monitor = PerformanceMonitor::new(&format!("retry_{}", self.operation_name));
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        ErrorLogger::log_recovery_success(
                            &self.operation_name,
                            attempt,
                            monitor.elapsed_ms(),
                        );
                    }
                    return Ok(result);
                }
                Err(error) => {
                    if !error.is_retryable() {
                        return Err(error);
                    }

                    if attempt >= max_attempts {
                        if max_attempts > 1 {
                            ErrorLogger::log_recovery_attempt(&error, attempt, max_attempts);
                        }
                        return Err(error);
                    }

                    ErrorLogger::log_recovery_attempt(&error, attempt, max_attempts);

                    // a rate limit hint from the node wins over a shorter backoff
                    let requested = Duration::from_secs(error.retry_delay().unwrap_or(0));
                    let delay = self.calculate_delay(attempt).max(requested);
                    LogContext::new("retry", &self.operation_name)
                        .with_retry_count(attempt)
                        .with_metadata("delay_ms", serde_json::json!(delay.as_millis() as u64))
                        .debug(&format!(
                            "Retrying in {:?} (attempt {} of {})",
                            delay, attempt, max_attempts
                        ));

                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Calculate delay for the given attempt number
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let base_delay = self.config.initial_delay_seconds;
        let exponential_delay =
            base_delay * self.config.backoff_multiplier.powi(attempt as i32 - 1);

        let capped_delay = exponential_delay.min(self.config.max_delay_seconds);

        let final_delay = if self.config.jitter {
            let jitter_factor = 0.1;
            let jitter = capped_delay * jitter_factor * (rand::random::<f64>() - 0.5);
            (capped_delay + jitter).max(0.0)
        } else {
            capped_delay
        };

        Duration::from_secs_f64(final_delay)
    }
}
