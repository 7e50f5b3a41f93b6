//! Enumerations used to categorise tasks and drive the task list view.
//!
//! This module defines the task categories, status filters and the sort
//! specification used by both the CLI and the TUI.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The two fixed groupings a task belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    #[serde(alias = "personal")]
    Personal,
    #[serde(alias = "work")]
    Work,
}

impl Category {
    /// All categories in tab order.
    pub const ALL: [Category; 2] = [Category::Personal, Category::Work];

    /// The other category, used by the tab switcher.
    pub fn other(self) -> Category {
        match self {
            Category::Personal => Category::Work,
            Category::Work => Category::Personal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Personal => "Personal",
            Category::Work => "Work",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Completion status filter applied to the task list.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [StatusFilter::All, StatusFilter::Pending, StatusFilter::Completed];

    /// Whether a task with the given completion flag passes this filter.
    pub fn accepts(self, completed: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => !completed,
            StatusFilter::Completed => completed,
        }
    }

    /// Next filter in the All → Pending → Completed → All cycle.
    pub fn next(self) -> StatusFilter {
        match self {
            StatusFilter::All => StatusFilter::Pending,
            StatusFilter::Pending => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Pending => "Pending",
            StatusFilter::Completed => "Completed",
        }
    }
}

/// Field a task list can be sorted by.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SortField {
    DueDate,
}

/// Sort direction for the secondary sort key.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn label(self) -> &'static str {
        match self {
            SortDirection::Asc => "Asc",
            SortDirection::Desc => "Desc",
        }
    }
}

/// An active sort: field and direction are always set together.
///
/// "Unsorted" is represented by `Option::<SortSpec>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn due_date(direction: SortDirection) -> Self {
        SortSpec {
            field: SortField::DueDate,
            direction,
        }
    }

    /// Build a spec from the two optional halves; a missing half means unsorted.
    pub fn from_parts(field: Option<SortField>, direction: Option<SortDirection>) -> Option<Self> {
        match (field, direction) {
            (Some(field), Some(direction)) => Some(SortSpec { field, direction }),
            _ => None,
        }
    }
}
