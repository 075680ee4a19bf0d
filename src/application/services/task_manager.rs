use std::sync::Arc;

use crate::application::ports::host_ports::{ItemServicePort, ItemTaskPort, MembershipPort};
use crate::application::tasks::item_tasks::{DeleteItemTask, GetItemTask, ValidatePermissionTask};
use crate::application::tasks::recycled_item_tasks::{
    CreateRecycledItemTask, DeleteRecycledItemTask, GetOwnRecycledItemsTask, IsRecycledTask,
    RecycleItemPostHook,
};
use crate::application::tasks::task::{Sequence, TaskSequenceExt};
use crate::domain::entities::item_membership::PermissionLevel;
use crate::domain::entities::member::Member;
use crate::domain::repositories::recycled_item_repository::RecycledItemRepository;

pub const RECYCLE_ITEM_SEQUENCE: &str = "RecycleItemSequence";
pub const DELETE_RECYCLED_ITEM_SEQUENCE: &str = "DeleteRecycledItemSequence";

/// get → validar admin → comprobar que no está reciclado → crear vínculo
pub type RecycleItemSequence<H> = Sequence<
    Sequence<Sequence<GetItemTask<H>, ValidatePermissionTask<H>>, IsRecycledTask<H>>,
    CreateRecycledItemTask<H>,
>;

/// get → comprobar que está reciclado → validar admin → borrar elemento
pub type DeleteRecycledItemSequence<H> = Sequence<
    Sequence<Sequence<GetItemTask<H>, IsRecycledTask<H>>, ValidatePermissionTask<H>>,
    DeleteItemTask<H>,
>;

/// Factoría de tareas y secuencias de la papelera
pub struct RecycledItemTaskManager<H: Send + 'static> {
    repository: Arc<dyn RecycledItemRepository<H>>,
    item_service: Arc<dyn ItemServicePort<H>>,
    item_tasks: Arc<dyn ItemTaskPort<H>>,
    memberships: Arc<dyn MembershipPort<H>>,
    recycle_item_post_hook: Option<Arc<dyn RecycleItemPostHook<H>>>,
}

impl<H: Send + 'static> Clone for RecycledItemTaskManager<H> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            item_service: self.item_service.clone(),
            item_tasks: self.item_tasks.clone(),
            memberships: self.memberships.clone(),
            recycle_item_post_hook: self.recycle_item_post_hook.clone(),
        }
    }
}

impl<H: Send + 'static> RecycledItemTaskManager<H> {
    pub fn new(
        repository: Arc<dyn RecycledItemRepository<H>>,
        item_service: Arc<dyn ItemServicePort<H>>,
        item_tasks: Arc<dyn ItemTaskPort<H>>,
        memberships: Arc<dyn MembershipPort<H>>,
        recycle_item_post_hook: Option<Arc<dyn RecycleItemPostHook<H>>>,
    ) -> Self {
        Self {
            repository,
            item_service,
            item_tasks,
            memberships,
            recycle_item_post_hook,
        }
    }

    pub fn repository(&self) -> Arc<dyn RecycledItemRepository<H>> {
        self.repository.clone()
    }

    pub fn create_get_own_task(&self, actor: &Member) -> GetOwnRecycledItemsTask<H> {
        GetOwnRecycledItemsTask::new(actor.clone(), self.repository.clone())
    }

    pub fn create_create_task(&self, actor: &Member) -> CreateRecycledItemTask<H> {
        CreateRecycledItemTask::new(actor.clone(), self.repository.clone(), self.recycle_item_post_hook.clone())
    }

    pub fn create_delete_task(&self, actor: &Member) -> DeleteRecycledItemTask<H> {
        DeleteRecycledItemTask::new(actor.clone(), self.repository.clone())
    }

    pub fn create_is_recycled_task(&self, expected: Option<bool>) -> IsRecycledTask<H> {
        IsRecycledTask::new(self.repository.clone(), expected)
    }

    pub fn create_get_item_task(&self) -> GetItemTask<H> {
        GetItemTask::new(self.item_service.clone())
    }

    fn create_admin_check_task(&self, actor: &Member) -> ValidatePermissionTask<H> {
        ValidatePermissionTask::new(actor.clone(), self.memberships.clone(), PermissionLevel::Admin)
    }

    pub fn create_recycle_sequence(&self, actor: &Member) -> RecycleItemSequence<H> {
        self.create_get_item_task()
            .then(self.create_admin_check_task(actor))
            .then(self.create_is_recycled_task(Some(false)))
            .then(self.create_create_task(actor))
            .with_name(RECYCLE_ITEM_SEQUENCE)
    }

    pub fn create_delete_sequence(&self, actor: &Member) -> DeleteRecycledItemSequence<H> {
        self.create_get_item_task()
            .then(self.create_is_recycled_task(Some(true)))
            .then(self.create_admin_check_task(actor))
            .then(DeleteItemTask::new(actor.clone(), self.item_tasks.clone()))
            .with_name(DELETE_RECYCLED_ITEM_SEQUENCE)
    }
}
