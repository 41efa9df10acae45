//! Task queue: two-tier tasks and subtasks, flattened into work units.
//!
//! Nesting is exactly one level deep. A task that has subtasks contributes
//! no units of its own; its subtasks are flattened in order instead. This is
//! a fixed constraint of the data model, not a general recursive tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A second-tier work item. Same counters as a task, no further nesting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub name: String,
    /// Estimated work units.
    pub estimated: u32,
    /// Completed work units. Advances while the timer runs; may exceed
    /// `estimated` only through manual edits.
    pub completed: u32,
    /// Done flag, set by user action.
    pub checked: bool,
}

impl Subtask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id("sub"),
            name: name.into(),
            estimated: 1,
            completed: 0,
            checked: false,
        }
    }
}

/// A top-level work item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub estimated: u32,
    pub completed: u32,
    pub checked: bool,
    /// Subtasks, one level only. When non-empty, the task's own
    /// estimated/completed are ignored for unit generation.
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    /// Optional color tag for rendering.
    #[serde(default)]
    pub color: Option<String>,
    /// Optional category reference, used for the per-category summary.
    #[serde(default)]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id("task"),
            name: name.into(),
            estimated: 1,
            completed: 0,
            checked: false,
            subtasks: Vec::new(),
            color: None,
            category: None,
            created_at: Utc::now(),
        }
    }

    /// Number of work units this (sub)task-shaped pair of counters yields.
    fn unit_count(estimated: u32, completed: u32) -> u32 {
        estimated.saturating_sub(completed).max(1)
    }
}

fn new_id(prefix: &str) -> String {
    format!("{}-{}-{}", prefix, Utc::now().timestamp(), uuid::Uuid::new_v4())
}

/// One work-duration-sized slot, derived from the queue. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkUnit {
    pub task_id: String,
    pub subtask_id: Option<String>,
    /// Display label: the subtask name when present, else the task name.
    pub label: String,
    pub color: Option<String>,
    pub category: Option<String>,
}

/// Identifies the owner of a completed unit, for log entries.
#[derive(Debug, Clone)]
pub struct UnitOwner {
    pub task_id: String,
    pub subtask_id: Option<String>,
    pub name: String,
    pub color: Option<String>,
}

/// Ordered collection of tasks. Queue order is unit order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskQueue {
    tasks: Vec<Task>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn add(&mut self, name: impl Into<String>) -> &Task {
        self.tasks.push(Task::new(name));
        self.tasks.last().unwrap()
    }

    pub fn add_subtask(
        &mut self,
        task_id: &str,
        name: impl Into<String>,
    ) -> Result<&Subtask, ValidationError> {
        let task = self.task_mut(task_id)?;
        task.subtasks.push(Subtask::new(name));
        Ok(task.subtasks.last().unwrap())
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn rename(&mut self, id: &str, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        if let Ok(task) = self.task_mut(id) {
            task.name = name;
            return Ok(());
        }
        self.subtask_mut(id)?.name = name;
        Ok(())
    }

    /// Set the estimate. Negative inputs are clamped to zero; the caller is
    /// expected to have already dropped non-numeric edits.
    pub fn set_estimate(&mut self, id: &str, estimated: i64) -> Result<(), ValidationError> {
        let estimated = estimated.max(0) as u32;
        if let Ok(task) = self.task_mut(id) {
            task.estimated = estimated;
            return Ok(());
        }
        self.subtask_mut(id)?.estimated = estimated;
        Ok(())
    }

    /// Manual override of the completed counter. This is the only path that
    /// may push `completed` past `estimated`.
    pub fn set_completed(&mut self, id: &str, completed: i64) -> Result<(), ValidationError> {
        let completed = completed.max(0) as u32;
        if let Ok(task) = self.task_mut(id) {
            task.completed = completed;
            return Ok(());
        }
        self.subtask_mut(id)?.completed = completed;
        Ok(())
    }

    pub fn set_color(&mut self, id: &str, color: Option<String>) -> Result<(), ValidationError> {
        self.task_mut(id)?.color = color;
        Ok(())
    }

    pub fn set_category(
        &mut self,
        id: &str,
        category: Option<String>,
    ) -> Result<(), ValidationError> {
        self.task_mut(id)?.category = category;
        Ok(())
    }

    /// Set the done flag. Returns the owner info when a task or subtask was
    /// newly checked, so the caller can append a task-complete log entry.
    pub fn set_checked(
        &mut self,
        id: &str,
        checked: bool,
    ) -> Result<Option<UnitOwner>, ValidationError> {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            let newly = checked && !task.checked;
            task.checked = checked;
            return Ok(newly.then(|| UnitOwner {
                task_id: task.id.clone(),
                subtask_id: None,
                name: task.name.clone(),
                color: task.color.clone(),
            }));
        }
        for task in &mut self.tasks {
            if let Some(sub) = task.subtasks.iter_mut().find(|s| s.id == id) {
                let newly = checked && !sub.checked;
                sub.checked = checked;
                let owner = newly.then(|| UnitOwner {
                    task_id: task.id.clone(),
                    subtask_id: Some(sub.id.clone()),
                    name: sub.name.clone(),
                    color: task.color.clone(),
                });
                return Ok(owner);
            }
        }
        Err(ValidationError::UnknownTask { id: id.to_string() })
    }

    /// Divide a task into two, redistributing the estimate. Completed units
    /// stay with the first half. Tasks with subtasks cannot be split.
    pub fn split(&mut self, id: &str, first_estimate: u32) -> Result<&Task, ValidationError> {
        let index = self.task_index(id)?;
        let task = &self.tasks[index];
        if !task.subtasks.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "split".into(),
                message: "cannot split a task with subtasks".into(),
            });
        }
        if first_estimate == 0 || first_estimate >= task.estimated {
            return Err(ValidationError::InvalidValue {
                field: "first_estimate".into(),
                message: format!("must be between 1 and {}", task.estimated.saturating_sub(1)),
            });
        }

        let mut second = Task::new(task.name.clone());
        second.estimated = task.estimated - first_estimate;
        second.color = task.color.clone();
        second.category = task.category.clone();

        self.tasks[index].estimated = first_estimate;
        self.tasks.insert(index + 1, second);
        Ok(&self.tasks[index + 1])
    }

    /// Move a task (or subtask, within its parent) to a new position in its
    /// sibling list. The drag target's index determines the new position.
    pub fn reorder(&mut self, id: &str, new_index: usize) -> Result<(), ValidationError> {
        if let Ok(index) = self.task_index(id) {
            let task = self.tasks.remove(index);
            let target = new_index.min(self.tasks.len());
            self.tasks.insert(target, task);
            return Ok(());
        }
        for task in &mut self.tasks {
            if let Some(pos) = task.subtasks.iter().position(|s| s.id == id) {
                let sub = task.subtasks.remove(pos);
                let target = new_index.min(task.subtasks.len());
                task.subtasks.insert(target, sub);
                return Ok(());
            }
        }
        Err(ValidationError::UnknownTask { id: id.to_string() })
    }

    /// Remove a task and all its subtasks, or a single subtask.
    pub fn remove(&mut self, id: &str) -> Result<(), ValidationError> {
        if let Ok(index) = self.task_index(id) {
            self.tasks.remove(index);
            return Ok(());
        }
        for task in &mut self.tasks {
            if let Some(pos) = task.subtasks.iter().position(|s| s.id == id) {
                task.subtasks.remove(pos);
                return Ok(());
            }
        }
        Err(ValidationError::UnknownTask { id: id.to_string() })
    }

    /// Flatten the queue into the ordered work units the timer consumes and
    /// the schedule generator projects. Unchecked items only; a task with
    /// subtasks is represented by its subtasks.
    pub fn work_units(&self) -> Vec<WorkUnit> {
        let mut units = Vec::new();
        for task in &self.tasks {
            if task.checked {
                continue;
            }
            if task.subtasks.is_empty() {
                let count = Task::unit_count(task.estimated, task.completed);
                for _ in 0..count {
                    units.push(WorkUnit {
                        task_id: task.id.clone(),
                        subtask_id: None,
                        label: task.name.clone(),
                        color: task.color.clone(),
                        category: task.category.clone(),
                    });
                }
            } else {
                for sub in task.subtasks.iter().filter(|s| !s.checked) {
                    let count = Task::unit_count(sub.estimated, sub.completed);
                    for _ in 0..count {
                        units.push(WorkUnit {
                            task_id: task.id.clone(),
                            subtask_id: Some(sub.id.clone()),
                            label: sub.name.clone(),
                            color: task.color.clone(),
                            category: task.category.clone(),
                        });
                    }
                }
            }
        }
        units
    }

    /// Advance the completed counter of the first pending unit's owner.
    /// Caps at the estimate; only manual edits go past it.
    pub fn record_completed_unit(&mut self) -> Option<UnitOwner> {
        for task in &mut self.tasks {
            if task.checked {
                continue;
            }
            if task.subtasks.is_empty() {
                task.completed = (task.completed + 1).min(task.estimated.max(task.completed));
                return Some(UnitOwner {
                    task_id: task.id.clone(),
                    subtask_id: None,
                    name: task.name.clone(),
                    color: task.color.clone(),
                });
            }
            if let Some(sub) = task.subtasks.iter_mut().find(|s| !s.checked) {
                sub.completed = (sub.completed + 1).min(sub.estimated.max(sub.completed));
                return Some(UnitOwner {
                    task_id: task.id.clone(),
                    subtask_id: Some(sub.id.clone()),
                    name: sub.name.clone(),
                    color: task.color.clone(),
                });
            }
        }
        None
    }

    /// Category of the named task, for the per-category summary.
    pub fn category_of(&self, task_name: &str) -> Option<String> {
        self.tasks
            .iter()
            .find(|t| t.name == task_name || t.subtasks.iter().any(|s| s.name == task_name))
            .and_then(|t| t.category.clone())
    }

    /// Reset completion state for a new session. Queue contents and order
    /// survive; checked flags and counters start over.
    pub fn reset_for_new_session(&mut self) {
        for task in &mut self.tasks {
            task.checked = false;
            task.completed = 0;
            for sub in &mut task.subtasks {
                sub.checked = false;
                sub.completed = 0;
            }
        }
    }

    fn task_index(&self, id: &str) -> Result<usize, ValidationError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ValidationError::UnknownTask { id: id.to_string() })
    }

    fn task_mut(&mut self, id: &str) -> Result<&mut Task, ValidationError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ValidationError::UnknownTask { id: id.to_string() })
    }

    fn subtask_mut(&mut self, id: &str) -> Result<&mut Subtask, ValidationError> {
        self.tasks
            .iter_mut()
            .flat_map(|t| t.subtasks.iter_mut())
            .find(|s| s.id == id)
            .ok_or_else(|| ValidationError::UnknownTask { id: id.to_string() })
    }
}
