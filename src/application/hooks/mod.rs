pub mod recycle_bin_hooks;
pub mod registry;
