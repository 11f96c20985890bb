use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use reelforge_models::{GenerationTask, TaskStatus, TaskUpdate};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::workflow;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Task not found: {0}")]
    NotFound(Uuid),
    #[error("Task {id} is already {status}")]
    Terminal { id: Uuid, status: TaskStatus },
    #[error("Illegal transition {from} -> {to}")]
    IllegalTransition { from: TaskStatus, to: TaskStatus },
    #[error("Invalid progress {requested} (current {current})")]
    InvalidProgress { current: u8, requested: u8 },
    #[error("An error message requires status failed, got {0}")]
    ErrorWithoutFailure(TaskStatus),
    #[error("Asset {asset_id} already has in-flight task {task_id}")]
    AssetBusy { asset_id: String, task_id: Uuid },
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// In-memory store of generation tasks.
///
/// Every mutation of a record runs while holding that record's shard
/// lock, so concurrent updates to one task are serialized. The asset
/// index points at the current task for each asset.
#[derive(Default)]
pub struct TaskRegistry {
    tasks: DashMap<Uuid, GenerationTask>,
    by_asset: DashMap<String, Uuid>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a task even if the asset already has one in flight. The
    /// asset index keeps pointing at an in-flight task when there is one.
    pub fn create(&self, asset_id: &str) -> GenerationTask {
        let task = GenerationTask::new(asset_id);
        // Lock order: asset index first, then the task map.
        match self.by_asset.entry(asset_id.to_string()) {
            Entry::Occupied(mut entry) => {
                let indexed_in_flight = self
                    .tasks
                    .get(entry.get())
                    .is_some_and(|current| !current.is_terminal());
                self.tasks.insert(task.id, task.clone());
                if !indexed_in_flight {
                    entry.insert(task.id);
                }
            }
            Entry::Vacant(entry) => {
                self.tasks.insert(task.id, task.clone());
                entry.insert(task.id);
            }
        }
        info!(task_id = %task.id, asset_id, "Generation task created");
        task
    }

    /// Creates a task unless the asset already has one in flight.
    pub fn try_create(&self, asset_id: &str) -> RegistryResult<GenerationTask> {
        // Lock order: asset index first, then the task map.
        match self.by_asset.entry(asset_id.to_string()) {
            Entry::Occupied(mut entry) => {
                let current = *entry.get();
                if let Some(task) = self.tasks.get(&current) {
                    if !task.is_terminal() {
                        return Err(RegistryError::AssetBusy {
                            asset_id: asset_id.to_string(),
                            task_id: current,
                        });
                    }
                }
                let task = GenerationTask::new(asset_id);
                self.tasks.insert(task.id, task.clone());
                entry.insert(task.id);
                info!(task_id = %task.id, asset_id, "Generation task created");
                Ok(task)
            }
            Entry::Vacant(entry) => {
                let task = GenerationTask::new(asset_id);
                self.tasks.insert(task.id, task.clone());
                entry.insert(task.id);
                info!(task_id = %task.id, asset_id, "Generation task created");
                Ok(task)
            }
        }
    }

    /// Validates `update` against the stored record, then merges it and
    /// bumps `updated_at`. Nothing is written when validation fails.
    pub fn update(&self, id: Uuid, update: TaskUpdate) -> RegistryResult<GenerationTask> {
        let mut entry = self.tasks.get_mut(&id).ok_or(RegistryError::NotFound(id))?;
        let task = entry.value_mut();

        let merged = merge(task, update)?;
        debug!(
            task_id = %id,
            status = %merged.status,
            progress = merged.progress,
            "Generation task updated"
        );
        *task = merged.clone();
        Ok(merged)
    }

    pub fn get(&self, id: Uuid) -> Option<GenerationTask> {
        self.tasks.get(&id).map(|task| task.clone())
    }

    /// The in-flight task for `asset_id`, if any. Falls back to a scan when
    /// the indexed task has finished, since `create` allows several
    /// in-flight tasks per asset.
    pub fn get_by_asset_id(&self, asset_id: &str) -> Option<GenerationTask> {
        let indexed = self.by_asset.get(asset_id).map(|id| *id)?;
        if let Some(task) = self.tasks.get(&indexed).filter(|task| !task.is_terminal()) {
            return Some(task.clone());
        }
        self.tasks
            .iter()
            .filter(|entry| entry.asset_id == asset_id && !entry.is_terminal())
            .max_by_key(|entry| entry.created_at)
            .map(|entry| entry.value().clone())
    }

    /// Snapshot of every task, oldest first.
    pub fn get_all(&self) -> Vec<GenerationTask> {
        let mut tasks: Vec<GenerationTask> =
            self.tasks.iter().map(|entry| entry.value().clone()).collect();
        tasks.sort_by_key(|task| task.created_at);
        tasks
    }

    pub fn complete(&self, id: Uuid, video_url: Option<String>) -> RegistryResult<GenerationTask> {
        self.update(
            id,
            TaskUpdate {
                status: Some(TaskStatus::Complete),
                video_url,
                ..Default::default()
            },
        )
    }

    pub fn fail(&self, id: Uuid, error: impl Into<String>) -> RegistryResult<GenerationTask> {
        let task = self.update(
            id,
            TaskUpdate {
                status: Some(TaskStatus::Failed),
                error: Some(error.into()),
                ..Default::default()
            },
        )?;
        warn!(
            task_id = %id,
            error = task.error.as_deref().unwrap_or_default(),
            "Generation task failed"
        );
        Ok(task)
    }

    /// Stops tracking a task as in flight. Generation stages have no
    /// cancellation of their own, so this only records the outcome.
    pub fn cancel(&self, id: Uuid, reason: &str) -> RegistryResult<GenerationTask> {
        self.fail(id, format!("Cancelled: {reason}"))
    }

    /// Drops terminal tasks last touched more than `max_age` ago.
    /// Returns how many were removed.
    pub fn prune_finished(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let before = self.tasks.len();
        self.tasks
            .retain(|_, task| !(task.is_terminal() && task.updated_at < cutoff));
        self.by_asset.retain(|_, id| self.tasks.contains_key(id));
        let removed = before.saturating_sub(self.tasks.len());
        if removed > 0 {
            info!(removed, "Pruned finished generation tasks");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

fn merge(current: &GenerationTask, update: TaskUpdate) -> RegistryResult<GenerationTask> {
    if current.is_terminal() {
        return Err(RegistryError::Terminal {
            id: current.id,
            status: current.status,
        });
    }

    let status = update.status.unwrap_or(current.status);
    if !current.status.can_transition_to(status) {
        return Err(RegistryError::IllegalTransition {
            from: current.status,
            to: status,
        });
    }

    if let Some(requested) = update.progress {
        if requested < current.progress || requested > 100 {
            return Err(RegistryError::InvalidProgress {
                current: current.progress,
                requested,
            });
        }
    }

    if update.error.is_some() && status != TaskStatus::Failed {
        return Err(RegistryError::ErrorWithoutFailure(status));
    }

    let mut merged = current.clone();
    merged.status = status;
    if let Some(v) = update.image_task_id {
        merged.image_task_id = Some(v);
    }
    if let Some(v) = update.video_task_id {
        merged.video_task_id = Some(v);
    }
    if let Some(v) = update.image_url {
        merged.image_url = Some(v);
    }
    if let Some(v) = update.video_url {
        merged.video_url = Some(v);
    }
    if let Some(v) = update.error {
        merged.error = Some(v);
    }
    if let Some(v) = update.progress {
        merged.progress = v;
    }
    if status != current.status && status != TaskStatus::Failed {
        merged.progress = merged.progress.max(workflow::stage(status).progress);
    }
    merged.updated_at = next_timestamp(current.updated_at);

    Ok(merged)
}

/// `now`, nudged forward when the clock has not moved past `previous`.
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
