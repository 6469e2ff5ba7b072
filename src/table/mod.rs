pub mod error;
pub mod measurement_table;
