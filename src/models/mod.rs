pub mod enums;
pub mod ledger;

pub use ledger::*;
