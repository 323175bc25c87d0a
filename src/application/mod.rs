// Application layer: use cases built on top of the ledger that front ends share.

pub mod error;
pub mod reporting;

pub use error::*;
pub use reporting::*;
