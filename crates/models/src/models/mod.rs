pub mod generation_task;
pub mod retrieval;
pub mod stock_asset;
pub mod wire;

pub use generation_task::{GenerationTask, ParseStatusError, TaskStatus, TaskUpdate};
pub use retrieval::{FailureKind, RetrievalMode, RetrievalOutcome};
pub use stock_asset::{StockAssetReference, StockSource};
