use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::application::tasks::task::{execute, Task};
use crate::application::transactions::transaction_handler::TransactionHandler;
use crate::common::errors::RecycleBinError;

/// Ejecuta tareas (o secuencias de tareas) dentro de una transacción del host.
///
/// Confirma si la tarea termina bien y revierte en cualquier otro caso.
pub struct TaskRunner<D: TransactionHandler> {
    transaction_handler: Arc<D>,
}

impl<D: TransactionHandler> Clone for TaskRunner<D> {
    fn clone(&self) -> Self {
        Self {
            transaction_handler: self.transaction_handler.clone(),
        }
    }
}

impl<D: TransactionHandler> TaskRunner<D> {
    pub fn new(transaction_handler: Arc<D>) -> Self {
        Self { transaction_handler }
    }

    pub async fn run_single<T>(&self, mut task: T, input: T::Input) -> Result<T::Output, RecycleBinError>
    where
        T: Task<D::Handle>,
    {
        let mut handle = self.transaction_handler.begin().await?;
        debug!("Ejecutando tarea {}", task.name());

        match execute(&mut task, input, &mut handle).await {
            Ok(output) => {
                self.transaction_handler.commit(handle).await?;
                debug!("Tarea {} completada", task.name());
                Ok(output)
            }
            Err(e) => {
                error!("Tarea {} fallida: {}", task.name(), e);
                if let Err(rollback_error) = self.transaction_handler.rollback(handle).await {
                    warn!("No se pudo revertir la tarea {}: {}", task.name(), rollback_error);
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::tasks::recycled_item_tasks::{CreateRecycledItemTask, IsRecycledTask};
    use crate::application::tasks::task::TaskSequenceExt;
    use crate::test_utils::{create_item, create_member, NoopTransactionHandler, TestHost};

    #[tokio::test]
    async fn test_commits_on_success() {
        let host = TestHost::new();
        let transactions = Arc::new(NoopTransactionHandler::default());
        let runner = TaskRunner::new(transactions.clone());
        let item = host.add_item(create_item("folder", None));

        let task = IsRecycledTask::<()>::new(host.recycled_items.clone(), Some(false));
        let output = runner.run_single(task, item.clone()).await.unwrap();

        assert_eq!(output, item);
        assert_eq!(transactions.begun(), 1);
        assert_eq!(transactions.committed(), 1);
        assert_eq!(transactions.rolled_back(), 0);
    }

    #[tokio::test]
    async fn test_rolls_back_on_error() {
        let host = TestHost::new();
        let transactions = Arc::new(NoopTransactionHandler::default());
        let runner = TaskRunner::new(transactions.clone());
        let actor = create_member("alice");
        let item = host.add_item(create_item("folder", None));

        let sequence = IsRecycledTask::<()>::new(host.recycled_items.clone(), Some(true))
            .then(CreateRecycledItemTask::<()>::new(actor, host.recycled_items.clone(), None));
        let result = runner.run_single(sequence, item.clone()).await;

        assert!(matches!(result, Err(RecycleBinError::InvalidItemStatus { is_recycled: false, .. })));
        assert_eq!(transactions.committed(), 0);
        assert_eq!(transactions.rolled_back(), 1);
        assert!(!host.is_recycled(&item));
    }
}
