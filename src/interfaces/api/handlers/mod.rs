pub mod recycle_bin_handler;
