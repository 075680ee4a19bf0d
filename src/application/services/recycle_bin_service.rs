use async_trait::async_trait;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::ports::recycle_bin_ports::RecycleBinUseCase;
use crate::application::services::task_manager::RecycledItemTaskManager;
use crate::application::services::task_runner::TaskRunner;
use crate::application::transactions::transaction_handler::TransactionHandler;
use crate::common::errors::RecycleBinError;
use crate::domain::entities::item::Item;
use crate::domain::entities::member::Member;

/// Servicio de aplicación para la papelera
pub struct RecycleBinService<D: TransactionHandler> {
    runner: TaskRunner<D>,
    task_manager: RecycledItemTaskManager<D::Handle>,
}

impl<D: TransactionHandler> RecycleBinService<D> {
    pub fn new(runner: TaskRunner<D>, task_manager: RecycledItemTaskManager<D::Handle>) -> Self {
        Self { runner, task_manager }
    }
}

#[async_trait]
impl<D: TransactionHandler> RecycleBinUseCase for RecycleBinService<D> {
    #[instrument(skip(self, actor), fields(member = %actor.id))]
    async fn get_own_recycled_items(&self, actor: &Member) -> Result<Vec<Item>, RecycleBinError> {
        let task = self.task_manager.create_get_own_task(actor);
        self.runner.run_single(task, ()).await
    }

    #[instrument(skip(self, actor), fields(member = %actor.id))]
    async fn recycle_item(&self, actor: &Member, item_id: &Uuid) -> Result<Item, RecycleBinError> {
        info!("Reciclando elemento {}", item_id);
        let sequence = self.task_manager.create_recycle_sequence(actor);
        self.runner.run_single(sequence, *item_id).await
    }

    /// Sin comprobación de permisos: basta con conocer el id
    #[instrument(skip(self, actor), fields(member = %actor.id))]
    async fn restore_item(&self, actor: &Member, item_id: &Uuid) -> Result<Uuid, RecycleBinError> {
        info!("Restaurando elemento {}", item_id);
        let task = self.task_manager.create_delete_task(actor);
        self.runner.run_single(task, *item_id).await
    }

    #[instrument(skip(self, actor), fields(member = %actor.id))]
    async fn delete_item(&self, actor: &Member, item_id: &Uuid) -> Result<Item, RecycleBinError> {
        info!("Eliminando definitivamente elemento {}", item_id);
        let sequence = self.task_manager.create_delete_sequence(actor);
        self.runner.run_single(sequence, *item_id).await
    }
}
