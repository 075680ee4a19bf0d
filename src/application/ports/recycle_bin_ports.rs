use async_trait::async_trait;
use uuid::Uuid;

use crate::common::errors::RecycleBinError;
use crate::domain::entities::item::Item;
use crate::domain::entities::member::Member;

/// Puerto para los casos de uso de la papelera
#[async_trait]
pub trait RecycleBinUseCase: Send + Sync {
    /// Elementos que el miembro recicló y todavía administra
    async fn get_own_recycled_items(&self, actor: &Member) -> Result<Vec<Item>, RecycleBinError>;

    /// Borrado lógico de un elemento y, con él, de todo su subárbol
    async fn recycle_item(&self, actor: &Member, item_id: &Uuid) -> Result<Item, RecycleBinError>;

    /// Quita el vínculo de papelera de un elemento
    async fn restore_item(&self, actor: &Member, item_id: &Uuid) -> Result<Uuid, RecycleBinError>;

    /// Borra definitivamente un elemento reciclado
    async fn delete_item(&self, actor: &Member, item_id: &Uuid) -> Result<Item, RecycleBinError>;
}
