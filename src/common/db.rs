use sqlx::PgPool;

use crate::common::errors::{ErrorContext, Result};

/// Crea la tabla `recycled_item` junto a la tabla `item` del host, que
/// debe existir de antemano. Se puede llamar en cada arranque.
pub async fn ensure_recycled_item_schema(pool: &PgPool) -> Result<()> {
    tracing::info!("Verificando el esquema de recycled_item...");

    // Una sentencia por query: el protocolo extendido no admite varias
    let statements = [
        "CREATE EXTENSION IF NOT EXISTS ltree",
        r#"
        CREATE TABLE IF NOT EXISTS recycled_item (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            item_id UUID NOT NULL UNIQUE REFERENCES item(id) ON DELETE CASCADE,
            item_path LTREE NOT NULL UNIQUE,
            creator UUID,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        "CREATE INDEX IF NOT EXISTS recycled_item_item_path_idx ON recycled_item USING GIST (item_path)",
    ];

    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| "Error al crear el esquema de recycled_item")?;
    }

    tracing::info!("Esquema de recycled_item listo");
    Ok(())
}
