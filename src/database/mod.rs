pub mod db;
pub mod store;
pub mod transaction;

pub use store::CardStore;
pub use transaction::with_transaction;
