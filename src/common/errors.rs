use std::fmt::{Display, Formatter, Result as FmtResult};
use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

/// Origen que se informa en cada error serializado del plugin
pub const PLUGIN_NAME: &str = "plugin-recycle-bin";

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Tipos de errores comunes en toda la aplicación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Entidad no encontrada
    NotFound,
    /// Entidad ya existe
    AlreadyExists,
    /// Entrada inválida o validación fallida
    InvalidInput,
    /// Error de acceso o permisos
    AccessDenied,
    /// Error interno del sistema
    InternalError,
}

impl ErrorKind {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::AlreadyExists => StatusCode::CONFLICT,
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::AccessDenied => StatusCode::FORBIDDEN,
            ErrorKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::AlreadyExists => "ALREADY_EXISTS",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::AccessDenied => "ACCESS_DENIED",
            ErrorKind::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ErrorKind::NotFound => write!(f, "Not Found"),
            ErrorKind::AlreadyExists => write!(f, "Already Exists"),
            ErrorKind::InvalidInput => write!(f, "Invalid Input"),
            ErrorKind::AccessDenied => write!(f, "Access Denied"),
            ErrorKind::InternalError => write!(f, "Internal Error"),
        }
    }
}

/// Error base de dominio que proporciona contexto detallado
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct DomainError {
    /// Tipo de error
    pub kind: ErrorKind,
    /// Tipo de entidad afectada (ej: "Item", "RecycledItem")
    pub entity_type: &'static str,
    /// Identificador de la entidad si está disponible
    pub entity_id: Option<String>,
    /// Mensaje descriptivo del error
    pub message: String,
    /// Error fuente (opcional)
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl DomainError {
    /// Crea un nuevo error de dominio
    pub fn new<S: Into<String>>(
        kind: ErrorKind,
        entity_type: &'static str,
        message: S,
    ) -> Self {
        Self {
            kind,
            entity_type,
            entity_id: None,
            message: message.into(),
            source: None,
        }
    }

    /// Crea un error de entidad no encontrada
    pub fn not_found<S: Into<String>>(entity_type: &'static str, entity_id: S) -> Self {
        let id = entity_id.into();
        Self {
            kind: ErrorKind::NotFound,
            entity_type,
            entity_id: Some(id.clone()),
            message: format!("{} not found: {}", entity_type, id),
            source: None,
        }
    }

    /// Crea un error de entidad ya existente
    pub fn already_exists<S: Into<String>>(entity_type: &'static str, entity_id: S) -> Self {
        let id = entity_id.into();
        Self {
            kind: ErrorKind::AlreadyExists,
            entity_type,
            entity_id: Some(id.clone()),
            message: format!("{} already exists: {}", entity_type, id),
            source: None,
        }
    }

    /// Crea un error de acceso denegado
    pub fn access_denied<S: Into<String>>(entity_type: &'static str, message: S) -> Self {
        Self {
            kind: ErrorKind::AccessDenied,
            entity_type,
            entity_id: None,
            message: message.into(),
            source: None,
        }
    }

    /// Crea un error de validación
    pub fn validation_error<S: Into<String>>(entity_type: &'static str, message: S) -> Self {
        Self {
            kind: ErrorKind::InvalidInput,
            entity_type,
            entity_id: None,
            message: message.into(),
            source: None,
        }
    }

    /// Establece el ID de la entidad
    pub fn with_id<S: Into<String>>(mut self, entity_id: S) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Establece el error fuente
    pub fn with_source<E: StdError + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

/// Trait para añadir contexto a los errores
pub trait ErrorContext<T, E> {
    fn with_context<C, F>(self, context: F) -> std::result::Result<T, DomainError>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E: StdError + Send + Sync + 'static> ErrorContext<T, E> for std::result::Result<T, E> {
    fn with_context<C, F>(self, context: F) -> std::result::Result<T, DomainError>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            DomainError {
                kind: ErrorKind::InternalError,
                entity_type: "Unknown",
                entity_id: None,
                message: context().into(),
                source: Some(Box::new(e)),
            }
        })
    }
}

/// Macro para convertir errores específicos a DomainError
#[macro_export]
macro_rules! impl_from_error {
    ($error_type:ty, $entity_type:expr) => {
        impl From<$error_type> for DomainError {
            fn from(err: $error_type) -> Self {
                DomainError {
                    kind: ErrorKind::InternalError,
                    entity_type: $entity_type,
                    entity_id: None,
                    message: format!("{}", err),
                    source: Some(Box::new(err)),
                }
            }
        }
    };
}

impl_from_error!(sqlx::Error, "Database");
impl_from_error!(serde_json::Error, "Serialization");

/// Errores de la papelera: violaciones de estado propias o un error de
/// dominio envuelto que viene del almacén o del host.
#[derive(Error, Debug)]
pub enum RecycleBinError {
    #[error("Cannot copy recycled item")]
    CannotCopyRecycledItem(Uuid),

    #[error("Cannot move recycled item")]
    CannotMoveRecycledItem(Uuid),

    #[error("Cannot create membership in recycled item")]
    CannotCreateItemMembershipInRecycledItem(Uuid),

    #[error("Cannot update membership in recycled item")]
    CannotUpdateItemMembershipInRecycledItem(Uuid),

    #[error("Cannot get recycled item")]
    CannotGetRecycledItem(Uuid),

    #[error("Invalid item status")]
    InvalidItemStatus { item_id: Uuid, is_recycled: bool },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl RecycleBinError {
    pub fn code(&self) -> &'static str {
        match self {
            RecycleBinError::CannotCopyRecycledItem(_) => "GRBERR002",
            RecycleBinError::CannotMoveRecycledItem(_) => "GRBERR003",
            RecycleBinError::CannotCreateItemMembershipInRecycledItem(_) => "GRBERR005",
            RecycleBinError::CannotUpdateItemMembershipInRecycledItem(_) => "GRBERR006",
            RecycleBinError::CannotGetRecycledItem(_) => "GRBERR007",
            RecycleBinError::InvalidItemStatus { .. } => "GRBERR008",
            RecycleBinError::Domain(e) => e.kind.code(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RecycleBinError::Domain(e) => e.kind.status_code(),
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RecycleBinError::CannotCopyRecycledItem(_) => "CannotCopyRecycledItem",
            RecycleBinError::CannotMoveRecycledItem(_) => "CannotMoveRecycledItem",
            RecycleBinError::CannotCreateItemMembershipInRecycledItem(_) => {
                "CannotCreateItemMembershipInRecycledItem"
            }
            RecycleBinError::CannotUpdateItemMembershipInRecycledItem(_) => {
                "CannotUpdateItemMembershipInRecycledItem"
            }
            RecycleBinError::CannotGetRecycledItem(_) => "CannotGetRecycledItem",
            RecycleBinError::InvalidItemStatus { .. } => "InvalidItemStatus",
            RecycleBinError::Domain(_) => "DomainError",
        }
    }

    fn data(&self) -> serde_json::Value {
        match self {
            RecycleBinError::CannotCopyRecycledItem(id)
            | RecycleBinError::CannotMoveRecycledItem(id)
            | RecycleBinError::CannotCreateItemMembershipInRecycledItem(id)
            | RecycleBinError::CannotUpdateItemMembershipInRecycledItem(id)
            | RecycleBinError::CannotGetRecycledItem(id) => serde_json::json!(id),
            RecycleBinError::InvalidItemStatus { item_id, is_recycled } => serde_json::json!({
                "itemId": item_id,
                "isRecycled": is_recycled,
            }),
            RecycleBinError::Domain(e) => match &e.entity_id {
                Some(id) => serde_json::json!(id),
                None => serde_json::Value::Null,
            },
        }
    }

    /// Forma serializable que recibe el cliente; también es el valor de cada
    /// posición en las respuestas por lotes
    pub fn to_body(&self) -> ErrorBody {
        let message = match self {
            // El detalle de la base de datos se queda en el log
            RecycleBinError::Domain(e) if e.kind == ErrorKind::InternalError => {
                error!("Error interno: {}", e);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            RecycleBinError::Domain(e) => e.message.clone(),
            other => other.to_string(),
        };
        ErrorBody {
            name: self.name().to_string(),
            code: self.code().to_string(),
            status_code: self.status_code().as_u16(),
            message,
            origin: PLUGIN_NAME.to_string(),
            data: self.data(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub name: String,
    pub code: String,
    pub status_code: u16,
    pub message: String,
    pub origin: String,
    pub data: serde_json::Value,
}

impl IntoResponse for RecycleBinError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_body())).into_response()
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recycle_bin_errors_are_bad_requests() {
        let id = Uuid::new_v4();
        let errors = [
            RecycleBinError::CannotCopyRecycledItem(id),
            RecycleBinError::CannotMoveRecycledItem(id),
            RecycleBinError::CannotCreateItemMembershipInRecycledItem(id),
            RecycleBinError::CannotUpdateItemMembershipInRecycledItem(id),
            RecycleBinError::CannotGetRecycledItem(id),
            RecycleBinError::InvalidItemStatus { item_id: id, is_recycled: true },
        ];
        for err in errors {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{} should be a 400", err.name());
            assert!(err.code().starts_with("GRBERR"));
        }
    }

    #[test]
    fn test_error_body_serialization() {
        let id = Uuid::new_v4();
        let body = RecycleBinError::CannotGetRecycledItem(id).to_body();
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["code"], "GRBERR007");
        assert_eq!(json["statusCode"], 400);
        assert_eq!(json["message"], "Cannot get recycled item");
        assert_eq!(json["origin"], PLUGIN_NAME);
        assert_eq!(json["data"], serde_json::json!(id));
    }

    #[test]
    fn test_domain_error_keeps_kind_status() {
        let err: RecycleBinError = DomainError::not_found("Item", "abc").into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.to_body().message, "Item not found: abc");

        let err: RecycleBinError = DomainError::access_denied("ItemMembership", "nope").into();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_with_context_preserves_source() {
        let io: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        let err = io.with_context(|| "Could not begin transaction").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InternalError);
        assert_eq!(err.message, "Could not begin transaction");
        assert_eq!(err.source.as_ref().map(|e| e.to_string()), Some("boom".to_string()));
    }

    #[test]
    fn test_internal_error_body_hides_database_message() {
        let database = sqlx::Error::Protocol("relation \"item\" does not exist".to_string());
        let err: RecycleBinError = DomainError::from(database).into();
        assert!(err.to_string().contains("relation"));

        let body = err.to_body();
        assert_eq!(body.status_code, 500);
        assert_eq!(body.message, INTERNAL_ERROR_MESSAGE);
        assert!(!body.message.contains("relation"));
        assert_eq!(body.name, "DomainError");
    }
}
