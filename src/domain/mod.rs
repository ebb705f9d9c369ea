mod account;
mod money;
mod statement;
mod transaction;

pub use account::*;
pub use money::*;
pub use statement::*;
pub use transaction::*;
