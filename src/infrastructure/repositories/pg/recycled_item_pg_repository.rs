use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, Row, Transaction};
use uuid::Uuid;

use crate::common::errors::{DomainError, ErrorKind, Result};
use crate::domain::entities::item::{Item, ItemPath};
use crate::domain::entities::recycled_item::RecycledItemEntry;
use crate::domain::repositories::recycled_item_repository::RecycledItemRepository;

/// Transacción con la que trabaja el almacén PostgreSQL
pub type PgTransaction = Transaction<'static, Postgres>;

/// Vínculos de la papelera guardados en PostgreSQL. La contención de rutas
/// usa el operador `@>` de `ltree`.
#[derive(Debug, Default, Clone)]
pub struct RecycledItemPgRepository;

impl RecycledItemPgRepository {
    pub fn new() -> Self {
        Self
    }

    // Método auxiliar para mapear errores SQL a errores de dominio
    fn map_sqlx_error(err: sqlx::Error) -> DomainError {
        let unique_violation = matches!(
            &err,
            sqlx::Error::Database(db_err) if db_err.code().map_or(false, |code| code == "23505")
        );

        if unique_violation {
            // Violación de unicidad: el elemento ya está en la papelera
            DomainError::new(
                ErrorKind::AlreadyExists,
                "RecycledItem",
                "El elemento ya está en la papelera",
            )
            .with_source(err)
        } else {
            DomainError::from(err)
        }
    }

    fn entry_from_row(row: &PgRow) -> RecycledItemEntry {
        RecycledItemEntry {
            id: row.get("id"),
            item_id: row.get("item_id"),
            item_path: ItemPath::new(row.get::<String, _>("item_path")),
            creator: row.get("creator"),
            created_at: row.get("created_at"),
        }
    }

    fn item_from_row(row: &PgRow) -> Item {
        Item {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            item_type: row.get("type"),
            path: ItemPath::new(row.get::<String, _>("path")),
            extra: row.get("extra"),
            creator: row.get("creator"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl RecycledItemRepository<PgTransaction> for RecycledItemPgRepository {
    /// Crea el vínculo elemento-papelera
    async fn create(&self, item: &Item, creator: &Uuid, handle: &mut PgTransaction) -> Result<RecycledItemEntry> {
        let row = sqlx::query(
            r#"
            INSERT INTO recycled_item (item_id, item_path, creator)
            VALUES ($1, $2::ltree, $3)
            RETURNING id, item_id, item_path::text AS item_path, creator, created_at
            "#
        )
        .bind(item.id)
        .bind(item.path.as_str())
        .bind(creator)
        .fetch_one(&mut **handle)
        .await
        .map_err(|e| Self::map_sqlx_error(e).with_id(item.id.to_string()))?;

        Ok(Self::entry_from_row(&row))
    }

    /// Elimina el vínculo elemento-papelera
    async fn delete(&self, item_id: &Uuid, handle: &mut PgTransaction) -> Result<Option<RecycledItemEntry>> {
        let row = sqlx::query(
            r#"
            DELETE FROM recycled_item
            WHERE item_id = $1
            RETURNING id, item_id, item_path::text AS item_path, creator, created_at
            "#
        )
        .bind(item_id)
        .fetch_optional(&mut **handle)
        .await
        .map_err(Self::map_sqlx_error)?;

        Ok(row.as_ref().map(Self::entry_from_row))
    }

    async fn is_recycled(&self, item_path: &ItemPath, handle: &mut PgTransaction) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM recycled_item
                WHERE item_path @> $1::ltree
            ) AS recycled
            "#
        )
        .bind(item_path.as_str())
        .fetch_one(&mut **handle)
        .await
        .map_err(Self::map_sqlx_error)?;

        Ok(row.get("recycled"))
    }

    async fn recycled_paths(&self, item_paths: &[ItemPath], handle: &mut PgTransaction) -> Result<Vec<ItemPath>> {
        if item_paths.is_empty() {
            return Ok(Vec::new());
        }

        let paths: Vec<String> = item_paths.iter().map(|path| path.as_str().to_string()).collect();
        let rows = sqlx::query(
            r#"
            SELECT candidate.path
            FROM unnest($1::text[]) AS candidate(path)
            WHERE EXISTS (
                SELECT 1 FROM recycled_item
                WHERE recycled_item.item_path @> candidate.path::ltree
            )
            "#
        )
        .bind(paths)
        .fetch_all(&mut **handle)
        .await
        .map_err(Self::map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| ItemPath::new(row.get::<String, _>("path")))
            .collect())
    }

    /// Elementos propios en la papelera: vinculados por el miembro y donde su
    /// membresía de mayor rango sobre el elemento es `admin` y está en el
    /// propio elemento. Sólo cuentan las membresías que contienen su ruta.
    async fn list_own(&self, member_id: &Uuid, handle: &mut PgTransaction) -> Result<Vec<Item>> {
        let rows = sqlx::query(
            r#"
            SELECT
                item.id, item.name, item.description, item.type,
                item.path::text AS path, item.extra, item.creator,
                item.created_at, item.updated_at
            FROM recycled_item
            INNER JOIN item ON item.id = recycled_item.item_id
            INNER JOIN LATERAL (
                SELECT item_membership.item_path, item_membership.permission
                FROM item_membership
                WHERE item_membership.member_id = $1
                  AND item_membership.item_path @> item.path
                ORDER BY nlevel(item_membership.item_path) ASC
                LIMIT 1
            ) AS top_membership ON TRUE
            WHERE recycled_item.creator = $1
              AND top_membership.item_path = item.path
              AND top_membership.permission = 'admin'
            ORDER BY recycled_item.created_at DESC
            "#
        )
        .bind(member_id)
        .fetch_all(&mut **handle)
        .await
        .map_err(Self::map_sqlx_error)?;

        Ok(rows.iter().map(Self::item_from_row).collect())
    }
}
