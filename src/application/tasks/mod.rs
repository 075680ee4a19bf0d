pub mod item_tasks;
pub mod recycled_item_tasks;
pub mod task;
