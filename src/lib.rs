// Exportar los módulos principales del proyecto
pub mod common;
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod interfaces;

#[cfg(test)]
mod test_utils;

// Re-exportaciones públicas comunes
pub use application::hooks::registry::{HookPoint, HookRegistry, PostHook, PreHook};
pub use application::services::recycle_bin_service::RecycleBinService;
pub use common::config::{AppConfig, RecycleBinConfig};
pub use common::di::{register_pg_recycle_bin, register_recycle_bin, AppState, HostServices, RecycleBinOptions};
pub use common::errors::{DomainError, ErrorBody, RecycleBinError};
pub use infrastructure::repositories::pg::{PgTransactionHandler, RecycledItemPgRepository};
