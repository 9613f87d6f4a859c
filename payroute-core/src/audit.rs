//! Best-effort audit log of completed swaps.
//!
//! `SwapRecorder` writes in a spawned task and returns immediately. A failed
//! write is logged and dropped; it never reaches the caller.

use crate::entities::swap_transaction::InsertSwapTransaction;
use crate::framework::DatabaseProcessor;
use async_trait::async_trait;
use kanau::processor::Processor;
use payroute_sdk::objects::CompletedSwap;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Destination for swap audit records.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record(&self, swap: &CompletedSwap) -> Result<(), AuditError>;
}

/// Writes `swap_transactions` rows.
pub struct DatabaseAuditLog {
    processor: DatabaseProcessor,
}

impl DatabaseAuditLog {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self {
            processor: DatabaseProcessor { pool },
        }
    }
}

#[async_trait]
impl AuditLog for DatabaseAuditLog {
    async fn record(&self, swap: &CompletedSwap) -> Result<(), AuditError> {
        let record = self
            .processor
            .process(InsertSwapTransaction { swap: swap.clone() })
            .await?;
        debug!(id = %record.id, "Swap transaction stored");
        Ok(())
    }
}

/// Used when no database is configured.
pub struct NoopAuditLog;

#[async_trait]
impl AuditLog for NoopAuditLog {
    async fn record(&self, swap: &CompletedSwap) -> Result<(), AuditError> {
        info!(
            chain_id = %swap.chain_id,
            wallet = %swap.wallet_address,
            from_token = %swap.from_token,
            to_token = %swap.to_token,
            "No audit database configured, swap not persisted"
        );
        Ok(())
    }
}

#[derive(Clone)]
pub struct SwapRecorder {
    log: Arc<dyn AuditLog>,
}

impl SwapRecorder {
    pub fn new(log: Arc<dyn AuditLog>) -> Self {
        Self { log }
    }

    /// Record a completed swap in the background.
    ///
    /// The returned handle only needs to be awaited by tests.
    pub fn record_completed(&self, swap: CompletedSwap) -> JoinHandle<()> {
        let log = Arc::clone(&self.log);
        tokio::spawn(async move {
            if let Err(e) = log.record(&swap).await {
                error!(
                    chain_id = %swap.chain_id,
                    wallet = %swap.wallet_address,
                    tx_hash = ?swap.tx_hash,
                    error = %e,
                    "Failed to write swap audit record"
                );
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payroute_sdk::objects::{Address, ChainId};
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakyLog {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl AuditLog for FlakyLog {
        async fn record(&self, _swap: &CompletedSwap) -> Result<(), AuditError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(AuditError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    fn swap() -> CompletedSwap {
        CompletedSwap {
            chain_id: ChainId::BASE_SEPOLIA,
            wallet_address: Address::new("0x00000000000000000000000000000000000000aa"),
            from_token: Address::new("0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE"),
            to_token: Address::new("0x036CbD53842c5426634e7929541eC2318f3dCF7e"),
            input_amount: Decimal::ONE,
            output_amount: Decimal::new(24925, 1),
            tx_hash: Some("0xabc".to_string()),
        }
    }

    #[tokio::test]
    async fn test_write_failure_is_swallowed() {
        let log = Arc::new(FlakyLog {
            attempts: AtomicUsize::new(0),
        });
        let recorder = SwapRecorder::new(log.clone());
        recorder.record_completed(swap()).await.unwrap();
        assert_eq!(log.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_noop_log_accepts() {
        let recorder = SwapRecorder::new(Arc::new(NoopAuditLog));
        recorder.record_completed(swap()).await.unwrap();
    }
}
