pub mod bubble;
pub mod matrix;
pub mod normalize;
