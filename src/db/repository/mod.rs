//! Repository layer: entity-scoped database operations.
//!
//! Function-based: each call takes the connection it runs on.

mod balance;
mod batch;

pub use balance::*;
pub use batch::*;
