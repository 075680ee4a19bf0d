use async_trait::async_trait;

use crate::common::errors::Result;

/// Port hacia el gestor de transacciones del host.
///
/// El plugin nunca abre conexiones por su cuenta: cada tarea recibe un
/// `Handle` que el host ha abierto y que este mismo puerto cierra.
#[async_trait]
pub trait TransactionHandler: Send + Sync + 'static {
    type Handle: Send + 'static;

    /// Abre una nueva transacción
    async fn begin(&self) -> Result<Self::Handle>;

    /// Confirma los cambios de la transacción
    async fn commit(&self, handle: Self::Handle) -> Result<()>;

    /// Descarta los cambios de la transacción
    async fn rollback(&self, handle: Self::Handle) -> Result<()>;
}
