use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::ports::host_ports::{ItemServicePort, ItemTaskPort, MembershipPort};
use crate::application::tasks::task::{Task, TaskStatus};
use crate::common::errors::{DomainError, RecycleBinError};
use crate::domain::entities::item::Item;
use crate::domain::entities::item_membership::PermissionLevel;
use crate::domain::entities::member::Member;

pub const GET_ITEM_TASK: &str = "GetItemTask";
pub const VALIDATE_PERMISSION_TASK: &str = "ValidatePermissionTask";
pub const DELETE_ITEM_TASK: &str = "DeleteItemTask";

/// Obtiene un elemento directamente del servicio del host.
///
/// No pasa por los post-hooks de `get`, así un elemento reciclado llega a
/// los pasos siguientes en lugar de fallar con `CannotGetRecycledItem`.
pub struct GetItemTask<H: Send + 'static> {
    item_service: Arc<dyn ItemServicePort<H>>,
    status: TaskStatus,
}

impl<H: Send + 'static> GetItemTask<H> {
    pub fn new(item_service: Arc<dyn ItemServicePort<H>>) -> Self {
        Self {
            item_service,
            status: TaskStatus::New,
        }
    }
}

#[async_trait]
impl<H: Send + 'static> Task<H> for GetItemTask<H> {
    type Input = Uuid;
    type Output = Item;

    fn name(&self) -> &str {
        GET_ITEM_TASK
    }

    fn status(&self) -> TaskStatus {
        self.status
    }

    async fn run(&mut self, item_id: Uuid, handle: &mut H) -> Result<Item, RecycleBinError> {
        self.status = TaskStatus::Running;

        let item = self
            .item_service
            .get(&item_id, handle)
            .await?
            .ok_or_else(|| DomainError::not_found("Item", item_id.to_string()))?;

        self.status = TaskStatus::Ok;
        Ok(item)
    }
}

/// Exige que el actor tenga al menos `required` sobre el elemento
pub struct ValidatePermissionTask<H: Send + 'static> {
    actor: Member,
    memberships: Arc<dyn MembershipPort<H>>,
    required: PermissionLevel,
    status: TaskStatus,
}

impl<H: Send + 'static> ValidatePermissionTask<H> {
    pub fn new(actor: Member, memberships: Arc<dyn MembershipPort<H>>, required: PermissionLevel) -> Self {
        Self {
            actor,
            memberships,
            required,
            status: TaskStatus::New,
        }
    }
}

#[async_trait]
impl<H: Send + 'static> Task<H> for ValidatePermissionTask<H> {
    type Input = Item;
    type Output = Item;

    fn name(&self) -> &str {
        VALIDATE_PERMISSION_TASK
    }

    fn status(&self) -> TaskStatus {
        self.status
    }

    async fn run(&mut self, item: Item, handle: &mut H) -> Result<Item, RecycleBinError> {
        self.status = TaskStatus::Running;

        let membership = self
            .memberships
            .get_member_item_membership(&self.actor, &item, handle)
            .await?;

        let allowed = membership
            .as_ref()
            .map_or(false, |membership| membership.allows(self.required));
        if !allowed {
            warn!(
                "Miembro {} sin permiso {} sobre el elemento {}",
                self.actor.id, self.required, item.id
            );
            return Err(DomainError::access_denied(
                "ItemMembership",
                format!("Member {} requires {} permission on item {}", self.actor.id, self.required, item.id),
            )
            .with_id(item.id.to_string())
            .into());
        }
        debug!("Permiso {} validado para {}", self.required, self.actor.id);

        self.status = TaskStatus::Ok;
        Ok(item)
    }
}

/// Borrado definitivo a través de la tarea de borrado del host
pub struct DeleteItemTask<H: Send + 'static> {
    actor: Member,
    item_tasks: Arc<dyn ItemTaskPort<H>>,
    status: TaskStatus,
}

impl<H: Send + 'static> DeleteItemTask<H> {
    pub fn new(actor: Member, item_tasks: Arc<dyn ItemTaskPort<H>>) -> Self {
        Self {
            actor,
            item_tasks,
            status: TaskStatus::New,
        }
    }
}

#[async_trait]
impl<H: Send + 'static> Task<H> for DeleteItemTask<H> {
    type Input = Item;
    type Output = Item;

    fn name(&self) -> &str {
        DELETE_ITEM_TASK
    }

    fn status(&self) -> TaskStatus {
        self.status
    }

    async fn run(&mut self, item: Item, handle: &mut H) -> Result<Item, RecycleBinError> {
        self.status = TaskStatus::Running;

        let deleted = self.item_tasks.delete(&self.actor, item, handle).await?;
        info!("Elemento {} eliminado definitivamente por {}", deleted.id, self.actor.id);

        self.status = TaskStatus::Ok;
        Ok(deleted)
    }
}
