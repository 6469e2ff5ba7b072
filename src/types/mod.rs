pub mod chart;
pub mod group_key;
pub mod group_value;
pub mod measurement;
