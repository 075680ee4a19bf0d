pub mod host_ports;
pub mod recycle_bin_ports;
