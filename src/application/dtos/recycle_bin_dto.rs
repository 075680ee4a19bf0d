use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::config::RecycleBinConfig;
use crate::common::errors::{DomainError, ErrorBody, RecycleBinError};

/// Query `?id=<uuid>&id=<uuid>...` de los endpoints por lotes
#[derive(Debug, Default, Deserialize)]
pub struct IdsQuery {
    #[serde(default)]
    pub id: Vec<String>,
}

impl IdsQuery {
    /// Valida la lista de ids: al menos uno, no más de los que admite
    /// `config`, todos UUID y sin repetir
    pub fn parse(&self, config: &RecycleBinConfig) -> Result<Vec<Uuid>, RecycleBinError> {
        if self.id.is_empty() {
            return Err(DomainError::validation_error("Request", "At least one id is required").into());
        }
        if config.exceeds_request_limit(self.id.len()) {
            return Err(DomainError::validation_error(
                "Request",
                format!("Too many ids: {} (max {})", self.id.len(), config.max_items_in_request),
            )
            .into());
        }

        let mut seen = HashSet::with_capacity(self.id.len());
        let mut ids = Vec::with_capacity(self.id.len());
        for raw in &self.id {
            let id = parse_item_id(raw)?;
            if !seen.insert(id) {
                return Err(DomainError::validation_error("Request", format!("Duplicated id: {}", id))
                    .with_id(id.to_string())
                    .into());
            }
            ids.push(id);
        }
        Ok(ids)
    }
}

/// Id de elemento recibido en la ruta o en la query
pub fn parse_item_id(raw: &str) -> Result<Uuid, RecycleBinError> {
    Uuid::parse_str(raw).map_err(|e| {
        RecycleBinError::from(
            DomainError::validation_error("Item", format!("Invalid item id '{}': {}", raw, e))
                .with_id(raw)
                .with_source(e),
        )
    })
}

/// Posición de una respuesta por lotes: el valor o el error de ese id
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchItemResult<T> {
    Ok(T),
    Err(ErrorBody),
}

impl<T> From<Result<T, RecycleBinError>> for BatchItemResult<T> {
    fn from(result: Result<T, RecycleBinError>) -> Self {
        match result {
            Ok(value) => BatchItemResult::Ok(value),
            Err(e) => BatchItemResult::Err(e.to_body()),
        }
    }
}
