//! The task store: canonical collection, view state and edit tracking.
//!
//! `TaskStore` is the only owner of the task collection. Every mutation is
//! mirrored to the persistence backend immediately, and every mutation or view
//! change recomputes the derived list that the presentation layer renders.

use chrono::Utc;
use log::{debug, info};
use uuid::Uuid;

use crate::db::{load_tasks, save_tasks, KeyValueStore, LoadStatus, SaveStatus};
use crate::fields::{Category, SortDirection, SortField, StatusFilter};
use crate::task::{NewTask, Task, TaskId};
use crate::view::{derive_view, ViewState};

/// Minimum length of an id prefix accepted by `resolve`.
pub const MIN_ID_PREFIX: usize = 4;

/// Why an identifier could not be resolved to a single task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    NotFound(String),
    Ambiguous { identifier: String, matches: Vec<(TaskId, String)> },
}

pub struct TaskStore {
    tasks: Vec<Task>,
    view: ViewState,
    editing: Option<TaskId>,
    visible: Vec<TaskId>,
    backend: Box<dyn KeyValueStore>,
    load_status: LoadStatus,
    last_save: Option<SaveStatus>,
}

impl TaskStore {
    /// Hydrate a store from `backend`. Load faults leave the store empty.
    pub fn open(backend: Box<dyn KeyValueStore>) -> Self {
        let outcome = load_tasks(backend.as_ref());
        info!(
            "event=store_open status={:?} count={}",
            outcome.status,
            outcome.tasks.len()
        );
        let mut store = TaskStore {
            tasks: outcome.tasks,
            view: ViewState::default(),
            editing: None,
            visible: Vec::new(),
            backend,
            load_status: outcome.status,
            last_save: None,
        };
        store.refresh_view();
        store
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn editing(&self) -> Option<TaskId> {
        self.editing
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    /// Status of the most recent save, `None` before the first mutation.
    pub fn last_save(&self) -> Option<&SaveStatus> {
        self.last_save.as_ref()
    }

    /// Ids of the derived list, in display order.
    pub fn visible_ids(&self) -> &[TaskId] {
        &self.visible
    }

    /// The derived list, in display order.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.visible.iter().filter_map(|&id| self.get(id)).collect()
    }

    /// Append a new task with a fresh id and creation time.
    pub fn add(&mut self, new_task: NewTask) -> TaskId {
        let id = Uuid::new_v4();
        let task = new_task.into_task(id, Utc::now());
        info!("event=task_add id={} category={}", id, task.category);
        self.tasks.push(task);
        self.after_mutation();
        id
    }

    /// Replace the task with the same id in place. Unknown ids are ignored.
    /// Always ends any edit in progress.
    pub fn update(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => {
                info!("event=task_update id={}", task.id);
                *slot = task;
            }
            None => debug!("event=task_update status=missing id={}", task.id),
        }
        self.editing = None;
        self.after_mutation();
    }

    /// Remove the task with `id`, if present.
    pub fn delete(&mut self, id: TaskId) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() < before {
            info!("event=task_delete id={id}");
        } else {
            debug!("event=task_delete status=missing id={id}");
        }
        if self.editing == Some(id) {
            self.editing = None;
        }
        self.after_mutation();
    }

    /// Flip the completion flag of the task with `id`, if present.
    pub fn toggle_completion(&mut self, id: TaskId) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.completed = !task.completed;
            info!("event=task_toggle id={} completed={}", id, task.completed);
        }
        self.after_mutation();
    }

    /// Switch category tab. Filter, sort and search reset for the new tab and
    /// any edit in progress is dropped.
    pub fn set_active_category(&mut self, category: Category) {
        self.view = ViewState::for_category(category);
        self.editing = None;
        self.refresh_view();
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.view.status_filter = filter;
        self.refresh_view();
    }

    /// Select a sort; reselecting the active one turns sorting off.
    pub fn set_sort(&mut self, field: Option<SortField>, direction: Option<SortDirection>) {
        self.view.select_sort(field, direction);
        self.refresh_view();
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.view.search_text = text.into();
        self.refresh_view();
    }

    /// Mark `id` as the task being edited and show its category.
    /// Returns false when no such task exists.
    pub fn begin_edit(&mut self, id: TaskId) -> bool {
        let Some(category) = self.get(id).map(|t| t.category) else {
            return false;
        };
        if category != self.view.active_category {
            self.set_active_category(category);
        }
        self.editing = Some(id);
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Find a task by full id, unique id prefix, or unique description
    /// (case-insensitive).
    pub fn resolve(&self, identifier: &str) -> Result<TaskId, ResolveError> {
        let ident = identifier.trim();
        if let Ok(id) = Uuid::parse_str(ident) {
            return self
                .get(id)
                .map(|t| t.id)
                .ok_or_else(|| ResolveError::NotFound(ident.to_string()));
        }

        let lower = ident.to_lowercase();
        let by_prefix: Vec<&Task> = if lower.len() >= MIN_ID_PREFIX
            && lower.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
        {
            self.tasks
                .iter()
                .filter(|t| t.id.to_string().starts_with(&lower))
                .collect()
        } else {
            Vec::new()
        };

        let matches: Vec<&Task> = if by_prefix.is_empty() {
            self.tasks
                .iter()
                .filter(|t| t.description.to_lowercase() == lower)
                .collect()
        } else {
            by_prefix
        };

        match matches.as_slice() {
            [] => Err(ResolveError::NotFound(ident.to_string())),
            [only] => Ok(only.id),
            many => Err(ResolveError::Ambiguous {
                identifier: ident.to_string(),
                matches: many.iter().map(|t| (t.id, t.description.clone())).collect(),
            }),
        }
    }

    fn after_mutation(&mut self) {
        self.last_save = Some(save_tasks(self.backend.as_mut(), &self.tasks));
        self.refresh_view();
    }

    /// Recompute the derived list from the collection and view state.
    fn refresh_view(&mut self) {
        self.visible = derive_view(&self.tasks, &self.view)
            .into_iter()
            .map(|t| t.id)
            .collect();
    }
}
