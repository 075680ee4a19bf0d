use async_trait::async_trait;
use uuid::Uuid;

use crate::common::errors::Result;
use crate::domain::entities::item::{Item, ItemPath};
use crate::domain::entities::recycled_item::RecycledItemEntry;

/// Almacén de vínculos de papelera (tabla `recycled_item`).
///
/// Cada operación corre dentro de la transacción `H` que pasa quien llama;
/// el almacén nunca abre ni confirma transacciones por su cuenta.
#[async_trait]
pub trait RecycledItemRepository<H: Send>: Send + Sync {
    /// Inserta el vínculo de `item`. Falla si el elemento ya tiene uno.
    async fn create(&self, item: &Item, creator: &Uuid, handle: &mut H) -> Result<RecycledItemEntry>;

    /// Quita el vínculo de `item_id` y lo devuelve si existía
    async fn delete(&self, item_id: &Uuid, handle: &mut H) -> Result<Option<RecycledItemEntry>>;

    /// Cierto si la ruta de algún vínculo es ancestro de `item_path` o igual a ella
    async fn is_recycled(&self, item_path: &ItemPath, handle: &mut H) -> Result<bool>;

    /// Subconjunto de `item_paths` que está en la papelera, con el mismo criterio que `is_recycled`
    async fn recycled_paths(&self, item_paths: &[ItemPath], handle: &mut H) -> Result<Vec<ItemPath>>;

    /// Elementos vinculados por `member_id` cuya membresía de mayor rango
    /// sobre el elemento es `admin` y está en el propio elemento
    async fn list_own(&self, member_id: &Uuid, handle: &mut H) -> Result<Vec<Item>>;
}
