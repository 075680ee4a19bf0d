pub mod recycle_bin_service;
pub mod task_manager;
pub mod task_runner;


// Re-exportar para facilitar acceso
pub use recycle_bin_service::RecycleBinService;
pub use task_manager::RecycledItemTaskManager;
pub use task_runner::TaskRunner;
