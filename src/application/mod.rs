pub mod dtos;
pub mod hooks;
pub mod ports;
pub mod services;
pub mod tasks;
pub mod transactions;

// Re-exportaciones para facilitar el acceso a los principales puertos
pub use ports::host_ports::{ItemServicePort, ItemTaskPort, MembershipPort};
pub use ports::recycle_bin_ports::RecycleBinUseCase;
pub use transactions::transaction_handler::TransactionHandler;
