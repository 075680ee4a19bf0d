use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::hooks::registry::{
    HookRegistry, ItemBatchPostHookPoint, ItemListPostHookPoint, ItemPostHookPoint, ItemPreHookPoint,
    ItemResult, MembershipPreHookPoint, PostHook, PreHook,
};
use crate::common::errors::RecycleBinError;
use crate::domain::entities::item::{Item, ItemPath};
use crate::domain::entities::item_membership::ItemMembership;
use crate::domain::entities::member::Member;
use crate::domain::repositories::recycled_item_repository::RecycledItemRepository;

/// Veta la tarea si el elemento (o un ancestro) está en la papelera
pub struct RecycledItemGuard<H: Send + 'static> {
    repository: Arc<dyn RecycledItemRepository<H>>,
    reject: fn(Uuid) -> RecycleBinError,
}

impl<H: Send + 'static> RecycledItemGuard<H> {
    pub fn new(repository: Arc<dyn RecycledItemRepository<H>>, reject: fn(Uuid) -> RecycleBinError) -> Self {
        Self { repository, reject }
    }
}

#[async_trait]
impl<H: Send + 'static> PreHook<Item, H> for RecycledItemGuard<H> {
    async fn call(&self, _actor: &Member, item: &Item, handle: &mut H) -> Result<(), RecycleBinError> {
        if self.repository.is_recycled(&item.path, handle).await? {
            return Err((self.reject)(item.id));
        }
        Ok(())
    }
}

/// Veta cambios de membresía dentro de un subárbol reciclado
pub struct RecycledMembershipGuard<H: Send + 'static> {
    repository: Arc<dyn RecycledItemRepository<H>>,
    reject: fn(Uuid) -> RecycleBinError,
}

impl<H: Send + 'static> RecycledMembershipGuard<H> {
    pub fn new(repository: Arc<dyn RecycledItemRepository<H>>, reject: fn(Uuid) -> RecycleBinError) -> Self {
        Self { repository, reject }
    }
}

#[async_trait]
impl<H: Send + 'static> PreHook<ItemMembership, H> for RecycledMembershipGuard<H> {
    async fn call(&self, _actor: &Member, membership: &ItemMembership, handle: &mut H) -> Result<(), RecycleBinError> {
        if self.repository.is_recycled(&membership.item_path, handle).await? {
            return Err((self.reject)(membership.id));
        }
        Ok(())
    }
}

/// Rechaza la lectura de un elemento reciclado
pub struct RecycledItemGetGuard<H: Send + 'static> {
    repository: Arc<dyn RecycledItemRepository<H>>,
}

impl<H: Send + 'static> RecycledItemGetGuard<H> {
    pub fn new(repository: Arc<dyn RecycledItemRepository<H>>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<H: Send + 'static> PostHook<Item, H> for RecycledItemGetGuard<H> {
    async fn call(&self, _actor: &Member, item: Item, handle: &mut H) -> Result<Item, RecycleBinError> {
        if self.repository.is_recycled(&item.path, handle).await? {
            return Err(RecycleBinError::CannotGetRecycledItem(item.id));
        }
        Ok(item)
    }
}

async fn recycled_among<H: Send + 'static>(
    repository: &Arc<dyn RecycledItemRepository<H>>,
    paths: Vec<ItemPath>,
    handle: &mut H,
) -> Result<HashSet<ItemPath>, RecycleBinError> {
    if paths.is_empty() {
        return Ok(HashSet::new());
    }
    let recycled = repository.recycled_paths(&paths, handle).await?;
    Ok(recycled.into_iter().collect())
}

/// Quita de una lista los elementos reciclados
pub struct RecycledItemsFilter<H: Send + 'static> {
    repository: Arc<dyn RecycledItemRepository<H>>,
}

impl<H: Send + 'static> RecycledItemsFilter<H> {
    pub fn new(repository: Arc<dyn RecycledItemRepository<H>>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<H: Send + 'static> PostHook<Vec<Item>, H> for RecycledItemsFilter<H> {
    async fn call(&self, _actor: &Member, items: Vec<Item>, handle: &mut H) -> Result<Vec<Item>, RecycleBinError> {
        let paths = items.iter().map(|item| item.path.clone()).collect();
        let recycled = recycled_among(&self.repository, paths, handle).await?;
        if recycled.is_empty() {
            return Ok(items);
        }

        let total = items.len();
        let visible: Vec<Item> = items
            .into_iter()
            .filter(|item| !recycled.contains(&item.path))
            .collect();
        debug!("Ocultados {} de {} elementos reciclados", total - visible.len(), total);
        Ok(visible)
    }
}

/// Sustituye cada elemento reciclado de un `get-many` por su error,
/// manteniendo la longitud y el orden
pub struct RecycledItemsMarker<H: Send + 'static> {
    repository: Arc<dyn RecycledItemRepository<H>>,
}

impl<H: Send + 'static> RecycledItemsMarker<H> {
    pub fn new(repository: Arc<dyn RecycledItemRepository<H>>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<H: Send + 'static> PostHook<Vec<ItemResult>, H> for RecycledItemsMarker<H> {
    async fn call(
        &self,
        _actor: &Member,
        results: Vec<ItemResult>,
        handle: &mut H,
    ) -> Result<Vec<ItemResult>, RecycleBinError> {
        let paths = results
            .iter()
            .filter_map(|result| result.as_ref().ok())
            .map(|item| item.path.clone())
            .collect();
        let recycled = recycled_among(&self.repository, paths, handle).await?;

        Ok(results
            .into_iter()
            .map(|result| match result {
                Ok(item) if recycled.contains(&item.path) => Err(RecycleBinError::CannotGetRecycledItem(item.id)),
                other => other,
            })
            .collect())
    }
}

/// Registra los hooks de la papelera sobre las tareas del host
pub fn register_recycle_bin_hooks<H: Send + 'static>(
    registry: &mut HookRegistry<H>,
    repository: Arc<dyn RecycledItemRepository<H>>,
) {
    registry.register_item_pre_hook(
        ItemPreHookPoint::Move,
        Arc::new(RecycledItemGuard::new(repository.clone(), RecycleBinError::CannotMoveRecycledItem)),
    );
    registry.register_item_pre_hook(
        ItemPreHookPoint::Copy,
        Arc::new(RecycledItemGuard::new(repository.clone(), RecycleBinError::CannotCopyRecycledItem)),
    );

    registry.register_membership_pre_hook(
        MembershipPreHookPoint::Create,
        Arc::new(RecycledMembershipGuard::new(
            repository.clone(),
            RecycleBinError::CannotCreateItemMembershipInRecycledItem,
        )),
    );
    registry.register_membership_pre_hook(
        MembershipPreHookPoint::Update,
        Arc::new(RecycledMembershipGuard::new(
            repository.clone(),
            RecycleBinError::CannotUpdateItemMembershipInRecycledItem,
        )),
    );

    registry.register_item_post_hook(ItemPostHookPoint::Get, Arc::new(RecycledItemGetGuard::new(repository.clone())));

    for point in [
        ItemListPostHookPoint::GetOwn,
        ItemListPostHookPoint::GetSharedWith,
        ItemListPostHookPoint::GetChildren,
        ItemListPostHookPoint::GetDescendants,
    ] {
        registry.register_item_list_post_hook(point, Arc::new(RecycledItemsFilter::new(repository.clone())));
    }

    registry.register_item_batch_post_hook(ItemBatchPostHookPoint::GetMany, Arc::new(RecycledItemsMarker::new(repository)));

    info!("Hooks de la papelera registrados");
}
