//! Data source implementations

pub mod data_source_shared_line_group;

pub use data_source_shared_line_group::SharedLineGroupDataSource;
