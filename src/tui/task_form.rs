//! Task form handling for the terminal user interface.
//!
//! This module provides the `TaskForm` structure used both for adding a new
//! task and for editing an existing one. The form only collects raw input;
//! `TaskDraft::validate` decides whether it can reach the store.

use crate::{
    fields::Category,
    task::{Task, TaskDraft, TaskId},
    tui::{enums::FormField, input::InputField},
};

/// Entry form for creating or editing a task.
pub struct TaskForm {
    pub description: InputField,
    pub category: Category,
    pub due: InputField,
    pub current_field: FormField,
    /// Task being edited, `None` when adding.
    pub editing: Option<TaskId>,
}

impl TaskForm {
    /// Create an empty add form preselecting `category`.
    pub fn new(category: Category) -> Self {
        Self {
            description: InputField::new(),
            category,
            due: InputField::new(),
            current_field: FormField::Description,
            editing: None,
        }
    }

    /// Create an edit form populated from an existing task.
    pub fn from_task(task: &Task) -> Self {
        Self {
            description: InputField::with_value(&task.description),
            category: task.category,
            due: InputField::with_value(&task.due_date.to_string()),
            current_field: FormField::Description,
            editing: Some(task.id),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }

    /// Raw values as a draft for validation.
    pub fn draft(&self) -> TaskDraft {
        TaskDraft {
            description: self.description.value.clone(),
            category: self.category,
            due: self.due.value.clone(),
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = self.current_field.next();
    }

    pub fn prev_field(&mut self) {
        self.current_field = self.current_field.prev();
    }

    /// The text input under focus; `None` on the category selector.
    pub fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            FormField::Description => Some(&mut self.description),
            FormField::DueDate => Some(&mut self.due),
            FormField::Category => None,
        }
    }

    /// Handle character input for the currently active field.
    pub fn handle_char(&mut self, c: char) {
        if self.current_field == FormField::Category {
            match c {
                'p' | 'P' => self.category = Category::Personal,
                'w' | 'W' => self.category = Category::Work,
                ' ' => self.category = self.category.other(),
                _ => {}
            }
        } else if let Some(field) = self.active_input() {
            field.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_delete();
        }
    }

    /// Left/right move the cursor in text fields or flip the category selector.
    pub fn handle_left_right(&mut self, right: bool) {
        if self.current_field == FormField::Category {
            self.category = self.category.other();
        } else if let Some(field) = self.active_input() {
            if right {
                field.move_cursor_right();
            } else {
                field.move_cursor_left();
            }
        }
    }

    /// Reset to an empty add form, keeping the selected category.
    pub fn reset(&mut self) {
        *self = TaskForm::new(self.category);
    }
}
