//! Model module - Change records and change-sets.

mod change;
mod changed;

pub use change::*;
pub use changed::*;
