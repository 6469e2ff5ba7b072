pub mod correlation;
pub mod error;
pub mod grouped_means;
