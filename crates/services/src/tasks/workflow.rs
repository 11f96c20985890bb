use reelforge_models::TaskStatus;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkflowStage {
    pub status: TaskStatus,
    pub label: &'static str,
    pub progress: u8,
}

pub const UNKNOWN_LABEL: &str = "Unknown";

/// Pipeline stages in execution order, followed by the failure state.
pub static STAGES: [WorkflowStage; 6] = [
    WorkflowStage {
        status: TaskStatus::Pending,
        label: "Queued",
        progress: 0,
    },
    WorkflowStage {
        status: TaskStatus::GeneratingImage,
        label: "Generating image",
        progress: 25,
    },
    WorkflowStage {
        status: TaskStatus::GeneratingVideo,
        label: "Generating video",
        progress: 60,
    },
    WorkflowStage {
        status: TaskStatus::Downloading,
        label: "Saving video",
        progress: 90,
    },
    WorkflowStage {
        status: TaskStatus::Complete,
        label: "Complete",
        progress: 100,
    },
    WorkflowStage {
        status: TaskStatus::Failed,
        label: "Failed",
        progress: 0,
    },
];

pub fn stage(status: TaskStatus) -> &'static WorkflowStage {
    // STAGES lists every variant, in declaration order.
    &STAGES[status as usize]
}

/// Display label for a raw status string.
pub fn progress_label(status: &str) -> &'static str {
    STAGES
        .iter()
        .find(|stage| stage.status.as_str() == status)
        .map_or(UNKNOWN_LABEL, |stage| stage.label)
}
