pub mod recycle_bin_dto;
