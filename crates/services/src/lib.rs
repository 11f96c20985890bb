pub mod backend;
pub mod stock;
pub mod storage;
pub mod tasks;

pub use backend::{BackendError, HttpBackend, PersistenceBackend};
pub use stock::{StockDownloadService, StockRetrievalService};
pub use storage::MediaStore;
pub use tasks::{TaskRegistry, workflow};
