//! Batch assembly: wire operations, endpoint resolution, and the transaction
//! builder.

pub mod operation;
pub mod resolver;
pub mod transaction;

pub use operation::{BatchOperation, Method, OperationResult};
pub use transaction::BatchTransaction;
