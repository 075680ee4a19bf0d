use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::tasks::task::{Task, TaskStatus};
use crate::common::errors::{RecycleBinError, Result};
use crate::domain::entities::item::{Item, ItemPath};
use crate::domain::entities::member::Member;
use crate::domain::entities::recycled_item::RecycledItemEntry;
use crate::domain::repositories::recycled_item_repository::RecycledItemRepository;

pub const CREATE_RECYCLED_ITEM_TASK: &str = "CreateRecycledItemTask";
pub const DELETE_RECYCLED_ITEM_TASK: &str = "DeleteRecycledItemTask";
pub const IS_ITEM_RECYCLED_TASK: &str = "IsItemRecycledTask";
pub const GET_OWN_RECYCLED_ITEMS_TASK: &str = "GetOwnRecycledItemsTask";

/// Callback opcional de la plataforma tras reciclar un elemento.
///
/// Corre dentro de la transacción del reciclado: si falla, el vínculo no
/// llega a confirmarse.
#[async_trait]
pub trait RecycleItemPostHook<H: Send>: Send + Sync {
    async fn call(&self, item_path: &ItemPath, actor: &Member, handle: &mut H) -> Result<()>;
}

/// Crea el vínculo elemento-papelera. Devuelve el mismo elemento.
pub struct CreateRecycledItemTask<H: Send + 'static> {
    actor: Member,
    repository: Arc<dyn RecycledItemRepository<H>>,
    post_hook: Option<Arc<dyn RecycleItemPostHook<H>>>,
    result: Option<RecycledItemEntry>,
    status: TaskStatus,
}

impl<H: Send + 'static> CreateRecycledItemTask<H> {
    pub fn new(
        actor: Member,
        repository: Arc<dyn RecycledItemRepository<H>>,
        post_hook: Option<Arc<dyn RecycleItemPostHook<H>>>,
    ) -> Self {
        Self {
            actor,
            repository,
            post_hook,
            result: None,
            status: TaskStatus::New,
        }
    }

    /// Vínculo creado, disponible tras `run`
    pub fn result(&self) -> Option<&RecycledItemEntry> {
        self.result.as_ref()
    }
}

#[async_trait]
impl<H: Send + 'static> Task<H> for CreateRecycledItemTask<H> {
    type Input = Item;
    type Output = Item;

    fn name(&self) -> &str {
        CREATE_RECYCLED_ITEM_TASK
    }

    fn status(&self) -> TaskStatus {
        self.status
    }

    async fn run(&mut self, item: Item, handle: &mut H) -> std::result::Result<Item, RecycleBinError> {
        self.status = TaskStatus::Running;

        let entry = self.repository.create(&item, &self.actor.id, handle).await?;
        info!("Elemento {} reciclado por {}", item.id, self.actor.id);
        self.result = Some(entry);

        self.status = TaskStatus::Ok;
        Ok(item)
    }

    async fn post_hook(&mut self, item: &Item, handle: &mut H) -> std::result::Result<(), RecycleBinError> {
        if let Some(hook) = &self.post_hook {
            hook.call(&item.path, &self.actor, handle).await?;
        }
        Ok(())
    }
}

/// Elimina el vínculo de un elemento (restaurar). Sin vínculo no hace nada.
pub struct DeleteRecycledItemTask<H: Send + 'static> {
    actor: Member,
    repository: Arc<dyn RecycledItemRepository<H>>,
    result: Option<RecycledItemEntry>,
    status: TaskStatus,
}

impl<H: Send + 'static> DeleteRecycledItemTask<H> {
    pub fn new(actor: Member, repository: Arc<dyn RecycledItemRepository<H>>) -> Self {
        Self {
            actor,
            repository,
            result: None,
            status: TaskStatus::New,
        }
    }

    /// Vínculo eliminado, `None` si el elemento no estaba en la papelera
    pub fn result(&self) -> Option<&RecycledItemEntry> {
        self.result.as_ref()
    }
}

#[async_trait]
impl<H: Send + 'static> Task<H> for DeleteRecycledItemTask<H> {
    type Input = Uuid;
    type Output = Uuid;

    fn name(&self) -> &str {
        DELETE_RECYCLED_ITEM_TASK
    }

    fn status(&self) -> TaskStatus {
        self.status
    }

    async fn run(&mut self, item_id: Uuid, handle: &mut H) -> std::result::Result<Uuid, RecycleBinError> {
        self.status = TaskStatus::Running;

        self.result = self.repository.delete(&item_id, handle).await?;
        match &self.result {
            Some(entry) => info!("Elemento {} restaurado por {}", entry.item_id, self.actor.id),
            None => debug!("El elemento {} no estaba en la papelera, nada que restaurar", item_id),
        }

        self.status = TaskStatus::Ok;
        Ok(item_id)
    }
}

/// Comprueba si el elemento está en la papelera (él o algún ancestro).
///
/// Con `expected` fijado, un estado distinto falla con `InvalidItemStatus`.
/// El elemento pasa intacto al siguiente paso.
pub struct IsRecycledTask<H: Send + 'static> {
    repository: Arc<dyn RecycledItemRepository<H>>,
    expected: Option<bool>,
    result: Option<bool>,
    status: TaskStatus,
}

impl<H: Send + 'static> IsRecycledTask<H> {
    pub fn new(repository: Arc<dyn RecycledItemRepository<H>>, expected: Option<bool>) -> Self {
        Self {
            repository,
            expected,
            result: None,
            status: TaskStatus::New,
        }
    }

    pub fn result(&self) -> Option<bool> {
        self.result
    }
}

#[async_trait]
impl<H: Send + 'static> Task<H> for IsRecycledTask<H> {
    type Input = Item;
    type Output = Item;

    fn name(&self) -> &str {
        IS_ITEM_RECYCLED_TASK
    }

    fn status(&self) -> TaskStatus {
        self.status
    }

    async fn run(&mut self, item: Item, handle: &mut H) -> std::result::Result<Item, RecycleBinError> {
        self.status = TaskStatus::Running;

        let is_recycled = self.repository.is_recycled(&item.path, handle).await?;
        if let Some(expected) = self.expected {
            if is_recycled != expected {
                return Err(RecycleBinError::InvalidItemStatus {
                    item_id: item.id,
                    is_recycled,
                });
            }
        }
        self.result = Some(is_recycled);

        self.status = TaskStatus::Ok;
        Ok(item)
    }
}

pub struct GetOwnRecycledItemsTask<H: Send + 'static> {
    actor: Member,
    repository: Arc<dyn RecycledItemRepository<H>>,
    status: TaskStatus,
}

impl<H: Send + 'static> GetOwnRecycledItemsTask<H> {
    pub fn new(actor: Member, repository: Arc<dyn RecycledItemRepository<H>>) -> Self {
        Self {
            actor,
            repository,
            status: TaskStatus::New,
        }
    }
}

#[async_trait]
impl<H: Send + 'static> Task<H> for GetOwnRecycledItemsTask<H> {
    type Input = ();
    type Output = Vec<Item>;

    fn name(&self) -> &str {
        GET_OWN_RECYCLED_ITEMS_TASK
    }

    fn status(&self) -> TaskStatus {
        self.status
    }

    async fn run(&mut self, _input: (), handle: &mut H) -> std::result::Result<Vec<Item>, RecycleBinError> {
        self.status = TaskStatus::Running;

        let items = self.repository.list_own(&self.actor.id, handle).await?;
        debug!("Encontrados {} elementos reciclados de {}", items.len(), self.actor.id);

        self.status = TaskStatus::Ok;
        Ok(items)
    }
}
