pub mod registry;
pub mod workflow;

pub use registry::{RegistryError, RegistryResult, TaskRegistry};
pub use workflow::{STAGES, WorkflowStage, progress_label};
