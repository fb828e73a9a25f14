mod transaction;

pub use transaction::{Kind, Transaction, MAX_AMOUNT};
