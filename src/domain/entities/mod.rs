pub mod item;
pub mod item_membership;
pub mod member;
pub mod recycled_item;
