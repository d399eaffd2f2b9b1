//! Row and column models

mod column;
mod row;

pub use column::*;
pub use row::*;
