//! Enumerations for TUI state management.

/// Screen currently handling input.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    TaskList,
    AddTask,
    EditTask,
    Help,
    Confirm,
}

/// Entry form fields in tab order.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FormField {
    Description,
    Category,
    DueDate,
}

impl FormField {
    pub const ORDER: [FormField; 3] = [FormField::Description, FormField::Category, FormField::DueDate];

    pub fn next(self) -> FormField {
        match self {
            FormField::Description => FormField::Category,
            FormField::Category => FormField::DueDate,
            FormField::DueDate => FormField::Description,
        }
    }

    pub fn prev(self) -> FormField {
        match self {
            FormField::Description => FormField::DueDate,
            FormField::Category => FormField::Description,
            FormField::DueDate => FormField::Category,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FormField::Description => "Task Description *",
            FormField::Category => "Category",
            FormField::DueDate => "Due Date *",
        }
    }
}
