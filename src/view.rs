//! Derivation of the displayed task list.
//!
//! `derive_view` turns the full collection plus the transient `ViewState` into
//! the ordered sequence the user sees. It is a pure function of its inputs and
//! is cheap enough to rerun on every keystroke.

use std::cmp::Ordering;

use crate::fields::{Category, SortDirection, SortField, SortSpec, StatusFilter};
use crate::task::Task;

/// Ephemeral selection driving the task list. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub active_category: Category,
    pub status_filter: StatusFilter,
    pub sort: Option<SortSpec>,
    pub search_text: String,
}

impl ViewState {
    /// Fresh view for `category`: filter `All`, unsorted, empty search.
    pub fn for_category(category: Category) -> Self {
        ViewState {
            active_category: category,
            ..ViewState::default()
        }
    }

    /// Apply a sort selection. Reselecting the active pair clears sorting;
    /// a selection with a missing half also clears it.
    pub fn select_sort(&mut self, field: Option<SortField>, direction: Option<SortDirection>) {
        let requested = SortSpec::from_parts(field, direction);
        self.sort = if requested.is_some() && requested == self.sort {
            None
        } else {
            requested
        };
    }

    fn matches(&self, task: &Task, needle: Option<&str>) -> bool {
        task.category == self.active_category
            && self.status_filter.accepts(task.completed)
            && needle.map_or(true, |n| task.description.to_lowercase().contains(n))
    }
}

/// Filter and order `tasks` for display.
///
/// Steps, in order: category, status, case-insensitive description search,
/// then a stable sort putting incomplete tasks first and, when a sort is set,
/// ordering by due date within each group.
pub fn derive_view<'a>(tasks: &'a [Task], view: &ViewState) -> Vec<&'a Task> {
    let needle = view.search_text.trim().to_lowercase();
    let needle = (!needle.is_empty()).then_some(needle.as_str());

    let mut out: Vec<&Task> = tasks.iter().filter(|t| view.matches(t, needle)).collect();
    out.sort_by(|a, b| compare(a, b, view.sort));
    out
}

fn compare(a: &Task, b: &Task, sort: Option<SortSpec>) -> Ordering {
    let by_completion = a.completed.cmp(&b.completed);
    match sort {
        Some(SortSpec {
            field: SortField::DueDate,
            direction,
        }) => by_completion.then_with(|| match direction {
            SortDirection::Asc => a.due_date.cmp(&b.due_date),
            SortDirection::Desc => b.due_date.cmp(&a.due_date),
        }),
        None => by_completion,
    }
}
