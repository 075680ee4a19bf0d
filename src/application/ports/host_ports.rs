use async_trait::async_trait;
use uuid::Uuid;

use crate::common::errors::Result;
use crate::domain::entities::item::Item;
use crate::domain::entities::item_membership::ItemMembership;
use crate::domain::entities::member::Member;

// Puertos de salida hacia la plataforma anfitriona. El plugin no posee ni
// los elementos ni las membresías, sólo los consulta dentro de la
// transacción `H` que recibe.

/// Lectura directa de elementos, sin pasar por los hooks `get` del host
#[async_trait]
pub trait ItemServicePort<H: Send>: Send + Sync {
    async fn get(&self, item_id: &Uuid, handle: &mut H) -> Result<Option<Item>>;
}

/// Tareas de elementos del host que el plugin encadena en sus secuencias
#[async_trait]
pub trait ItemTaskPort<H: Send>: Send + Sync {
    /// Borrado definitivo del elemento y de su subárbol
    async fn delete(&self, actor: &Member, item: Item, handle: &mut H) -> Result<Item>;
}

#[async_trait]
pub trait MembershipPort<H: Send>: Send + Sync {
    /// Membresía más cercana (la de mayor rango) del miembro sobre el elemento
    async fn get_member_item_membership(
        &self,
        actor: &Member,
        item: &Item,
        handle: &mut H,
    ) -> Result<Option<ItemMembership>>;
}
