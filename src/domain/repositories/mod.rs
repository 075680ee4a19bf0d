pub mod recycled_item_repository;
