pub mod macros;
pub mod matrix;

pub use matrix::Matrix;
