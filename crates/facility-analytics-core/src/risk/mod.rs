pub mod classifier;
pub mod summary;
