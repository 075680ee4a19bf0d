use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::application::ports::host_ports::{ItemServicePort, ItemTaskPort, MembershipPort};
use crate::application::services::recycle_bin_service::RecycleBinService;
use crate::application::services::task_manager::RecycledItemTaskManager;
use crate::application::services::task_runner::TaskRunner;
use crate::application::tasks::recycled_item_tasks::RecycleItemPostHook;
use crate::application::transactions::transaction_handler::TransactionHandler;
use crate::common::errors::{DomainError, Result};
use crate::domain::entities::item::{Item, ItemPath};
use crate::domain::entities::item_membership::{ItemMembership, PermissionLevel};
use crate::domain::entities::member::Member;
use crate::domain::entities::recycled_item::RecycledItemEntry;
use crate::domain::repositories::recycled_item_repository::RecycledItemRepository;

/// Logs de las pruebas por el writer de test. Filtra con `RUST_LOG`; se
/// puede llamar desde cada prueba.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `ancestor` es ancestro de `path` o el mismo camino (lo que `ltree @>` resuelve en SQL)
pub fn contains(ancestor: &ItemPath, path: &ItemPath) -> bool {
    let ancestor = ancestor.as_str();
    let path = path.as_str();
    path == ancestor || (path.starts_with(ancestor) && path[ancestor.len()..].starts_with('.'))
}

pub fn create_member(name: &str) -> Member {
    Member::new(Uuid::new_v4(), name, format!("{}@example.com", name))
}

pub fn create_item(name: &str, parent: Option<&Item>) -> Item {
    let id = Uuid::new_v4();
    let path = match parent {
        Some(parent) => parent.path.child(&id),
        None => ItemPath::root(&id),
    };
    Item {
        id,
        name: name.to_string(),
        description: None,
        item_type: "folder".to_string(),
        path,
        extra: serde_json::json!({}),
        creator: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Transacciones de mentira: sólo cuentan cuántas se abren y cómo acaban
#[derive(Default)]
pub struct NoopTransactionHandler {
    begun: AtomicUsize,
    committed: AtomicUsize,
    rolled_back: AtomicUsize,
}

impl NoopTransactionHandler {
    pub fn begun(&self) -> usize {
        self.begun.load(Ordering::SeqCst)
    }

    pub fn committed(&self) -> usize {
        self.committed.load(Ordering::SeqCst)
    }

    pub fn rolled_back(&self) -> usize {
        self.rolled_back.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionHandler for NoopTransactionHandler {
    type Handle = ();

    async fn begin(&self) -> Result<()> {
        self.begun.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn commit(&self, _handle: ()) -> Result<()> {
        self.committed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(&self, _handle: ()) -> Result<()> {
        self.rolled_back.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Elementos del host en memoria
#[derive(Default)]
pub struct InMemoryItemHost {
    items: Mutex<HashMap<Uuid, Item>>,
}

impl InMemoryItemHost {
    pub fn insert(&self, item: Item) {
        self.items.lock().unwrap().insert(item.id, item);
    }

    pub fn all(&self) -> Vec<Item> {
        self.items.lock().unwrap().values().cloned().collect()
    }

    pub fn contains(&self, item_id: &Uuid) -> bool {
        self.items.lock().unwrap().contains_key(item_id)
    }
}

#[async_trait]
impl ItemServicePort<()> for InMemoryItemHost {
    async fn get(&self, item_id: &Uuid, _handle: &mut ()) -> Result<Option<Item>> {
        Ok(self.items.lock().unwrap().get(item_id).cloned())
    }
}

#[async_trait]
impl ItemTaskPort<()> for InMemoryItemHost {
    async fn delete(&self, _actor: &Member, item: Item, _handle: &mut ()) -> Result<Item> {
        let mut items = self.items.lock().unwrap();
        if !items.contains_key(&item.id) {
            return Err(DomainError::not_found("Item", item.id.to_string()));
        }
        items.retain(|_, candidate| !contains(&item.path, &candidate.path));
        Ok(item)
    }
}

/// Membresías del host en memoria
#[derive(Default)]
pub struct InMemoryMembershipHost {
    memberships: Mutex<Vec<ItemMembership>>,
}

impl InMemoryMembershipHost {
    pub fn insert(&self, membership: ItemMembership) {
        self.memberships.lock().unwrap().push(membership);
    }

    fn covering(&self, member_id: &Uuid, path: &ItemPath) -> Vec<ItemMembership> {
        self.memberships
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.member_id == *member_id && contains(&m.item_path, path))
            .cloned()
            .collect()
    }

    /// Membresía de mayor rango: la del ancestro más alto
    pub fn top_ranked(&self, member_id: &Uuid, path: &ItemPath) -> Option<ItemMembership> {
        self.covering(member_id, path)
            .into_iter()
            .min_by_key(|m| m.item_path.as_str().len())
    }

    /// Membresía más cercana al elemento, la que decide sus permisos
    pub fn closest(&self, member_id: &Uuid, path: &ItemPath) -> Option<ItemMembership> {
        self.covering(member_id, path)
            .into_iter()
            .max_by_key(|m| m.item_path.as_str().len())
    }
}

#[async_trait]
impl MembershipPort<()> for InMemoryMembershipHost {
    async fn get_member_item_membership(
        &self,
        actor: &Member,
        item: &Item,
        _handle: &mut (),
    ) -> Result<Option<ItemMembership>> {
        Ok(self.closest(&actor.id, &item.path))
    }
}

/// Papelera en memoria sobre los elementos y membresías anteriores
pub struct InMemoryRecycledItemRepository {
    entries: Mutex<HashMap<Uuid, RecycledItemEntry>>,
    items: Arc<InMemoryItemHost>,
    memberships: Arc<InMemoryMembershipHost>,
}

impl InMemoryRecycledItemRepository {
    pub fn new() -> Self {
        Self::with_host(Arc::default(), Arc::default())
    }

    pub fn with_host(items: Arc<InMemoryItemHost>, memberships: Arc<InMemoryMembershipHost>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            items,
            memberships,
        }
    }

    pub fn contains_path(&self, path: &ItemPath) -> bool {
        self.entries
            .lock()
            .unwrap()
            .values()
            .any(|entry| contains(&entry.item_path, path))
    }

    pub fn bond_count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[async_trait]
impl RecycledItemRepository<()> for InMemoryRecycledItemRepository {
    async fn create(&self, item: &Item, creator: &Uuid, _handle: &mut ()) -> Result<RecycledItemEntry> {
        let mut entries = self.entries.lock().unwrap();
        if entries.contains_key(&item.id) {
            return Err(DomainError::already_exists("RecycledItem", item.id.to_string()));
        }
        let entry = RecycledItemEntry {
            id: Uuid::new_v4(),
            item_id: item.id,
            item_path: item.path.clone(),
            creator: Some(*creator),
            created_at: Utc::now(),
        };
        entries.insert(item.id, entry.clone());
        Ok(entry)
    }

    async fn delete(&self, item_id: &Uuid, _handle: &mut ()) -> Result<Option<RecycledItemEntry>> {
        Ok(self.entries.lock().unwrap().remove(item_id))
    }

    async fn is_recycled(&self, item_path: &ItemPath, _handle: &mut ()) -> Result<bool> {
        Ok(self.contains_path(item_path))
    }

    async fn recycled_paths(&self, item_paths: &[ItemPath], _handle: &mut ()) -> Result<Vec<ItemPath>> {
        Ok(item_paths
            .iter()
            .filter(|path| self.contains_path(path))
            .cloned()
            .collect())
    }

    async fn list_own(&self, member_id: &Uuid, _handle: &mut ()) -> Result<Vec<Item>> {
        let entries: Vec<RecycledItemEntry> = self.entries.lock().unwrap().values().cloned().collect();
        Ok(self
            .items
            .all()
            .into_iter()
            .filter(|item| {
                entries
                    .iter()
                    .any(|entry| entry.item_id == item.id && entry.creator == Some(*member_id))
            })
            .filter(|item| {
                self.memberships
                    .top_ranked(member_id, &item.path)
                    .map_or(false, |m| m.item_path == item.path && m.permission == PermissionLevel::Admin)
            })
            .collect())
    }
}

/// Plataforma anfitriona completa en memoria
pub struct TestHost {
    pub items: Arc<InMemoryItemHost>,
    pub memberships: Arc<InMemoryMembershipHost>,
    pub recycled_items: Arc<InMemoryRecycledItemRepository>,
    pub transactions: Arc<NoopTransactionHandler>,
}

impl TestHost {
    pub fn new() -> Self {
        init_tracing();
        let items = Arc::new(InMemoryItemHost::default());
        let memberships = Arc::new(InMemoryMembershipHost::default());
        let recycled_items = Arc::new(InMemoryRecycledItemRepository::with_host(
            items.clone(),
            memberships.clone(),
        ));
        Self {
            items,
            memberships,
            recycled_items,
            transactions: Arc::new(NoopTransactionHandler::default()),
        }
    }

    pub fn add_item(&self, item: Item) -> Item {
        self.items.insert(item.clone());
        item
    }

    pub fn has_item(&self, item_id: &Uuid) -> bool {
        self.items.contains(item_id)
    }

    pub fn grant(&self, member: &Member, item: &Item, permission: PermissionLevel) {
        self.memberships.insert(ItemMembership {
            id: Uuid::new_v4(),
            member_id: member.id,
            item_path: item.path.clone(),
            permission,
            creator: None,
            created_at: Utc::now(),
        });
    }

    pub fn is_recycled(&self, item: &Item) -> bool {
        self.recycled_items.contains_path(&item.path)
    }

    pub fn task_manager(&self, post_hook: Option<Arc<dyn RecycleItemPostHook<()>>>) -> RecycledItemTaskManager<()> {
        RecycledItemTaskManager::<()>::new(
            self.recycled_items.clone(),
            self.items.clone(),
            self.items.clone(),
            self.memberships.clone(),
            post_hook,
        )
    }

    pub fn service(&self) -> RecycleBinService<NoopTransactionHandler> {
        self.service_with_post_hook(None)
    }

    pub fn service_with_post_hook(
        &self,
        post_hook: Option<Arc<dyn RecycleItemPostHook<()>>>,
    ) -> RecycleBinService<NoopTransactionHandler> {
        RecycleBinService::new(TaskRunner::new(self.transactions.clone()), self.task_manager(post_hook))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice_keeps_first_subscriber() {
        init_tracing();
        init_tracing();
        assert!(tracing_subscriber::fmt().with_test_writer().try_init().is_err());
    }

    #[test]
    fn test_contains_matches_whole_labels() {
        let parent = create_item("parent", None);
        let child = create_item("child", Some(&parent));
        let prefix = ItemPath::new(format!("{}x", parent.path.as_str()));

        assert!(contains(&parent.path, &child.path));
        assert!(contains(&parent.path, &parent.path));
        assert!(!contains(&child.path, &parent.path));
        assert!(!contains(&parent.path, &prefix));
    }
}
