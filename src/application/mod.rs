// Application layer - the ledger engine and statement builder, plus the
// error taxonomy exposed to adapters.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
