pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding when setting current piece")]
pub struct PieceCollisionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("matrix preset of {rows} rows by {cols} columns exceeds 40x10")]
pub struct MatrixSizeError {
    pub rows: usize,
    pub cols: usize,
}
