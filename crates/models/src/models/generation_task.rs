use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One attempt at producing content for an asset slot through the
/// image → video → download pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationTask {
    pub id: Uuid,
    pub asset_id: String,
    #[serde(default)]
    pub status: TaskStatus,
    pub image_task_id: Option<String>,
    pub video_task_id: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub error: Option<String>,
    #[serde(default)]
    pub progress: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GenerationTask {
    pub fn new(asset_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            asset_id: asset_id.into(),
            status: TaskStatus::Pending,
            image_task_id: None,
            video_task_id: None,
            image_url: None,
            video_url: None,
            error: None,
            progress: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Status of a generation task.
///
/// Forward path: `Pending` → `GeneratingImage` → `GeneratingVideo` →
/// `Downloading` → `Complete`. `Failed` is reachable from every
/// non-terminal state. `Complete` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    GeneratingImage,
    GeneratingVideo,
    Downloading,
    Complete,
    Failed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 6] = [
        TaskStatus::Pending,
        TaskStatus::GeneratingImage,
        TaskStatus::GeneratingVideo,
        TaskStatus::Downloading,
        TaskStatus::Complete,
        TaskStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::GeneratingImage => "generating_image",
            TaskStatus::GeneratingVideo => "generating_video",
            TaskStatus::Downloading => "downloading",
            TaskStatus::Complete => "complete",
            TaskStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Complete | TaskStatus::Failed)
    }

    /// The next stage on the forward path, if any.
    pub fn next(&self) -> Option<TaskStatus> {
        match self {
            TaskStatus::Pending => Some(TaskStatus::GeneratingImage),
            TaskStatus::GeneratingImage => Some(TaskStatus::GeneratingVideo),
            TaskStatus::GeneratingVideo => Some(TaskStatus::Downloading),
            TaskStatus::Downloading => Some(TaskStatus::Complete),
            TaskStatus::Complete | TaskStatus::Failed => None,
        }
    }

    /// Whether `self → to` is a legal change. Staying in the same
    /// non-terminal stage counts as legal.
    pub fn can_transition_to(&self, to: TaskStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == *self || to == TaskStatus::Failed || self.next() == Some(to)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for TaskStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// Partial set of fields to merge into a stored task. `None` leaves the
/// stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub status: Option<TaskStatus>,
    pub image_task_id: Option<String>,
    pub video_task_id: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub error: Option<String>,
    pub progress: Option<u8>,
}

impl TaskUpdate {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == TaskUpdate::default()
    }
}
