use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::common::errors::RecycleBinError;
use crate::domain::entities::item::Item;
use crate::domain::entities::item_membership::ItemMembership;
use crate::domain::entities::member::Member;

/// Resultado de cada posición de un `get-many`: el elemento o su error
pub type ItemResult = Result<Item, RecycleBinError>;

/// Tareas de elementos del host que admiten pre-hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemPreHookPoint {
    Move,
    Copy,
}

/// Tareas de membresías del host que admiten pre-hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipPreHookPoint {
    Create,
    Update,
}

/// Lecturas de un único elemento
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemPostHookPoint {
    Get,
}

/// Lecturas de listas de elementos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemListPostHookPoint {
    GetOwn,
    GetSharedWith,
    GetChildren,
    GetDescendants,
}

/// Lecturas por lotes, una posición por id pedido
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemBatchPostHookPoint {
    GetMany,
}

/// Cualquier punto de intercepción del host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    ItemPre(ItemPreHookPoint),
    MembershipPre(MembershipPreHookPoint),
    ItemPost(ItemPostHookPoint),
    ItemListPost(ItemListPostHookPoint),
    ItemBatchPost(ItemBatchPostHookPoint),
}

impl HookPoint {
    /// Todos los puntos que el host expone
    pub fn all() -> Vec<HookPoint> {
        vec![
            ItemPreHookPoint::Move.into(),
            ItemPreHookPoint::Copy.into(),
            MembershipPreHookPoint::Create.into(),
            MembershipPreHookPoint::Update.into(),
            ItemPostHookPoint::Get.into(),
            ItemListPostHookPoint::GetOwn.into(),
            ItemListPostHookPoint::GetSharedWith.into(),
            ItemListPostHookPoint::GetChildren.into(),
            ItemListPostHookPoint::GetDescendants.into(),
            ItemBatchPostHookPoint::GetMany.into(),
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HookPoint::ItemPre(ItemPreHookPoint::Move) => "pre:item:move",
            HookPoint::ItemPre(ItemPreHookPoint::Copy) => "pre:item:copy",
            HookPoint::MembershipPre(MembershipPreHookPoint::Create) => "pre:item-membership:create",
            HookPoint::MembershipPre(MembershipPreHookPoint::Update) => "pre:item-membership:update",
            HookPoint::ItemPost(ItemPostHookPoint::Get) => "post:item:get",
            HookPoint::ItemListPost(ItemListPostHookPoint::GetOwn) => "post:item:get-own",
            HookPoint::ItemListPost(ItemListPostHookPoint::GetSharedWith) => "post:item:get-shared-with",
            HookPoint::ItemListPost(ItemListPostHookPoint::GetChildren) => "post:item:get-children",
            HookPoint::ItemListPost(ItemListPostHookPoint::GetDescendants) => "post:item:get-descendants",
            HookPoint::ItemBatchPost(ItemBatchPostHookPoint::GetMany) => "post:item:get-many",
        }
    }
}

impl From<ItemPreHookPoint> for HookPoint {
    fn from(point: ItemPreHookPoint) -> Self {
        HookPoint::ItemPre(point)
    }
}

impl From<MembershipPreHookPoint> for HookPoint {
    fn from(point: MembershipPreHookPoint) -> Self {
        HookPoint::MembershipPre(point)
    }
}

impl From<ItemPostHookPoint> for HookPoint {
    fn from(point: ItemPostHookPoint) -> Self {
        HookPoint::ItemPost(point)
    }
}

impl From<ItemListPostHookPoint> for HookPoint {
    fn from(point: ItemListPostHookPoint) -> Self {
        HookPoint::ItemListPost(point)
    }
}

impl From<ItemBatchPostHookPoint> for HookPoint {
    fn from(point: ItemBatchPostHookPoint) -> Self {
        HookPoint::ItemBatchPost(point)
    }
}

/// Se ejecuta antes de la tarea del host y puede vetarla devolviendo un error
#[async_trait]
pub trait PreHook<T: Send + Sync, H: Send>: Send + Sync {
    async fn call(&self, actor: &Member, target: &T, handle: &mut H) -> Result<(), RecycleBinError>;
}

/// Se ejecuta tras la tarea del host. Devuelve el nuevo resultado, que
/// sustituye al anterior, o un error que rechaza la tarea.
#[async_trait]
pub trait PostHook<T: Send, H: Send>: Send + Sync {
    async fn call(&self, actor: &Member, value: T, handle: &mut H) -> Result<T, RecycleBinError>;
}

type PreHooks<P, T, H> = HashMap<P, Vec<Arc<dyn PreHook<T, H>>>>;
type PostHooks<P, T, H> = HashMap<P, Vec<Arc<dyn PostHook<T, H>>>>;

/// Tabla tipada de hooks sobre las tareas del host.
///
/// El host la consulta con su propio handle de transacción antes y después
/// de cada tarea interceptable.
pub struct HookRegistry<H: Send + 'static> {
    item_pre_hooks: PreHooks<ItemPreHookPoint, Item, H>,
    membership_pre_hooks: PreHooks<MembershipPreHookPoint, ItemMembership, H>,
    item_post_hooks: PostHooks<ItemPostHookPoint, Item, H>,
    item_list_post_hooks: PostHooks<ItemListPostHookPoint, Vec<Item>, H>,
    item_batch_post_hooks: PostHooks<ItemBatchPostHookPoint, Vec<ItemResult>, H>,
}

impl<H: Send + 'static> Default for HookRegistry<H> {
    fn default() -> Self {
        Self {
            item_pre_hooks: HashMap::new(),
            membership_pre_hooks: HashMap::new(),
            item_post_hooks: HashMap::new(),
            item_list_post_hooks: HashMap::new(),
            item_batch_post_hooks: HashMap::new(),
        }
    }
}

impl<H: Send + 'static> HookRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_item_pre_hook(&mut self, point: ItemPreHookPoint, hook: Arc<dyn PreHook<Item, H>>) {
        debug!("Registrando hook {}", HookPoint::from(point).as_str());
        self.item_pre_hooks.entry(point).or_default().push(hook);
    }

    pub fn register_membership_pre_hook(
        &mut self,
        point: MembershipPreHookPoint,
        hook: Arc<dyn PreHook<ItemMembership, H>>,
    ) {
        debug!("Registrando hook {}", HookPoint::from(point).as_str());
        self.membership_pre_hooks.entry(point).or_default().push(hook);
    }

    pub fn register_item_post_hook(&mut self, point: ItemPostHookPoint, hook: Arc<dyn PostHook<Item, H>>) {
        debug!("Registrando hook {}", HookPoint::from(point).as_str());
        self.item_post_hooks.entry(point).or_default().push(hook);
    }

    pub fn register_item_list_post_hook(
        &mut self,
        point: ItemListPostHookPoint,
        hook: Arc<dyn PostHook<Vec<Item>, H>>,
    ) {
        debug!("Registrando hook {}", HookPoint::from(point).as_str());
        self.item_list_post_hooks.entry(point).or_default().push(hook);
    }

    pub fn register_item_batch_post_hook(
        &mut self,
        point: ItemBatchPostHookPoint,
        hook: Arc<dyn PostHook<Vec<ItemResult>, H>>,
    ) {
        debug!("Registrando hook {}", HookPoint::from(point).as_str());
        self.item_batch_post_hooks.entry(point).or_default().push(hook);
    }

    /// Hay al menos un hook registrado en `point`
    pub fn is_intercepted<P: Into<HookPoint>>(&self, point: P) -> bool {
        fn registered<K: Eq + std::hash::Hash, V>(hooks: &HashMap<K, Vec<V>>, key: &K) -> bool {
            hooks.get(key).map_or(false, |hooks| !hooks.is_empty())
        }

        match point.into() {
            HookPoint::ItemPre(p) => registered(&self.item_pre_hooks, &p),
            HookPoint::MembershipPre(p) => registered(&self.membership_pre_hooks, &p),
            HookPoint::ItemPost(p) => registered(&self.item_post_hooks, &p),
            HookPoint::ItemListPost(p) => registered(&self.item_list_post_hooks, &p),
            HookPoint::ItemBatchPost(p) => registered(&self.item_batch_post_hooks, &p),
        }
    }

    pub async fn run_item_pre_hooks(
        &self,
        point: ItemPreHookPoint,
        actor: &Member,
        item: &Item,
        handle: &mut H,
    ) -> Result<(), RecycleBinError> {
        run_pre(self.item_pre_hooks.get(&point), actor, item, handle).await
    }

    pub async fn run_membership_pre_hooks(
        &self,
        point: MembershipPreHookPoint,
        actor: &Member,
        membership: &ItemMembership,
        handle: &mut H,
    ) -> Result<(), RecycleBinError> {
        run_pre(self.membership_pre_hooks.get(&point), actor, membership, handle).await
    }

    pub async fn run_item_post_hooks(
        &self,
        point: ItemPostHookPoint,
        actor: &Member,
        item: Item,
        handle: &mut H,
    ) -> Result<Item, RecycleBinError> {
        run_post(self.item_post_hooks.get(&point), actor, item, handle).await
    }

    pub async fn run_item_list_post_hooks(
        &self,
        point: ItemListPostHookPoint,
        actor: &Member,
        items: Vec<Item>,
        handle: &mut H,
    ) -> Result<Vec<Item>, RecycleBinError> {
        run_post(self.item_list_post_hooks.get(&point), actor, items, handle).await
    }

    pub async fn run_item_batch_post_hooks(
        &self,
        point: ItemBatchPostHookPoint,
        actor: &Member,
        results: Vec<ItemResult>,
        handle: &mut H,
    ) -> Result<Vec<ItemResult>, RecycleBinError> {
        run_post(self.item_batch_post_hooks.get(&point), actor, results, handle).await
    }
}

async fn run_pre<T, H>(
    hooks: Option<&Vec<Arc<dyn PreHook<T, H>>>>,
    actor: &Member,
    target: &T,
    handle: &mut H,
) -> Result<(), RecycleBinError>
where
    T: Send + Sync,
    H: Send,
{
    for hook in hooks.into_iter().flatten() {
        hook.call(actor, target, handle).await?;
    }
    Ok(())
}

async fn run_post<T, H>(
    hooks: Option<&Vec<Arc<dyn PostHook<T, H>>>>,
    actor: &Member,
    mut value: T,
    handle: &mut H,
) -> Result<T, RecycleBinError>
where
    T: Send,
    H: Send,
{
    for hook in hooks.into_iter().flatten() {
        value = hook.call(actor, value, handle).await?;
    }
    Ok(value)
}
