// Repositorios PostgreSQL
pub mod pg;

pub use pg::{PgTransactionHandler, RecycledItemPgRepository};
