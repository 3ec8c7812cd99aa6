pub mod lifecycle;
pub mod projector;
