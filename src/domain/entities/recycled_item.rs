use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::item::ItemPath;

/// Vínculo que marca un elemento (y con él su subárbol) como reciclado por
/// `creator` en `created_at`. Los descendientes nunca tienen vínculo propio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecycledItemEntry {
    pub id: Uuid,
    pub item_id: Uuid,
    pub item_path: ItemPath,
    pub creator: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
