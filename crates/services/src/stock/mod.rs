pub mod classify;
pub mod downloader;
pub mod filename;
pub mod migration;
pub mod retrieval;

pub use classify::{STOCK_HOSTS, infer_source, is_stock_url};
pub use downloader::{DownloadError, StockDownloadService};
pub use filename::generate_filename;
pub use migration::{MigrationReport, MigrationStatus};
pub use retrieval::{Progress, ProgressFn, StockRetrievalService};
