pub mod pg_transaction_handler;
pub mod recycled_item_pg_repository;

pub use pg_transaction_handler::PgTransactionHandler;
pub use recycled_item_pg_repository::{PgTransaction, RecycledItemPgRepository};
