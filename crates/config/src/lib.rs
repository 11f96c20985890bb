pub mod settings;

pub use settings::{AppSettings, BackendSettings, Settings, StorageSettings};
