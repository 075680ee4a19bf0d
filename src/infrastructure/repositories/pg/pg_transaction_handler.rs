use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, warn};

use crate::application::transactions::transaction_handler::TransactionHandler;
use crate::common::errors::{DomainError, ErrorContext, Result};
use crate::infrastructure::repositories::pg::recycled_item_pg_repository::PgTransaction;

/// Transacciones PostgreSQL sobre el pool compartido con el host
#[derive(Clone)]
pub struct PgTransactionHandler {
    pool: PgPool,
}

impl PgTransactionHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TransactionHandler for PgTransactionHandler {
    type Handle = PgTransaction;

    async fn begin(&self) -> Result<PgTransaction> {
        let tx = self
            .pool
            .begin()
            .await
            .with_context(|| "No se pudo iniciar la transacción")?;
        debug!("Transacción iniciada");
        Ok(tx)
    }

    async fn commit(&self, handle: PgTransaction) -> Result<()> {
        handle
            .commit()
            .await
            .with_context(|| "No se pudo confirmar la transacción")
    }

    async fn rollback(&self, handle: PgTransaction) -> Result<()> {
        if let Err(e) = handle.rollback().await {
            warn!("Error al revertir la transacción: {}", e);
            return Err(DomainError::from(e));
        }
        Ok(())
    }
}
