//! Color constants for the terminal user interface.

use ratatui::style::{Color, Modifier, Style};

use crate::dates::DueState;

/// Accent for the active tab, focused field and status bar.
pub const INDIGO: Color = Color::Rgb(79, 70, 229);
/// Used for completed rows
pub const DONE_GREEN: Color = Color::Rgb(22, 101, 52);
/// Used for overdue rows
pub const OVERDUE_RED: Color = Color::Rgb(153, 27, 27);
/// Used for rows due within two days
pub const SOON_YELLOW: Color = Color::Rgb(234, 179, 8);
/// Confirmation dialog background
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);

/// Row style for a task in the given due state.
pub fn row_style(state: DueState) -> Style {
    match state {
        DueState::Completed => Style::default().fg(DONE_GREEN).add_modifier(Modifier::CROSSED_OUT),
        DueState::Overdue => Style::default().fg(OVERDUE_RED).add_modifier(Modifier::BOLD),
        DueState::DueSoon => Style::default().fg(SOON_YELLOW),
        DueState::Upcoming => Style::default().fg(Color::White),
    }
}
