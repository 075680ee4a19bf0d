use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ruta materializada de un elemento en el árbol, p. ej. `3f0c_..._a1.9b2e_..._07`.
///
/// Cada etiqueta es el id de un ancestro (guiones cambiados por guiones bajos)
/// y la última es el propio elemento. Las consultas de ancestros las resuelve
/// la base de datos (`ltree`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemPath(String);

impl ItemPath {
    pub fn new<S: Into<String>>(path: S) -> Self {
        Self(path.into())
    }

    /// Etiqueta de ruta para un id de elemento
    pub fn label(id: &Uuid) -> String {
        id.to_string().replace('-', "_")
    }

    /// Ruta de un elemento raíz
    pub fn root(id: &Uuid) -> Self {
        Self(Self::label(id))
    }

    /// Ruta de un hijo directo de este elemento
    pub fn child(&self, id: &Uuid) -> Self {
        Self(format!("{}.{}", self.0, Self::label(id)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ItemPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<String> for ItemPath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

/// Elemento de la plataforma anfitriona. La papelera sólo usa `id` y `path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub item_type: String,
    pub path: ItemPath,
    #[serde(default)]
    pub extra: serde_json::Value,
    pub creator: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn path(&self) -> &ItemPath {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_use_underscored_labels() {
        let parent = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let child = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap();

        let root = ItemPath::root(&parent);
        assert_eq!(root.as_str(), "550e8400_e29b_41d4_a716_446655440000");
        assert_eq!(
            root.child(&child).as_str(),
            "550e8400_e29b_41d4_a716_446655440000.550e8400_e29b_41d4_a716_446655440001"
        );
    }

    #[test]
    fn test_item_serializes_like_the_host() {
        let id = Uuid::new_v4();
        let item = Item {
            id,
            name: "folder".to_string(),
            description: None,
            item_type: "folder".to_string(),
            path: ItemPath::root(&id),
            extra: serde_json::json!({}),
            creator: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "folder");
        assert_eq!(json["path"], ItemPath::label(&id));
        assert!(json.get("createdAt").is_some());
    }
}
