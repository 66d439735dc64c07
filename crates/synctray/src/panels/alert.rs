//! Modal alert popup.

use std::collections::VecDeque;

use ratatui::{
    layout::Flex,
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Queue of error messages, shown one at a time.
#[derive(Debug, Default)]
pub struct AlertPopup {
    queue: VecDeque<String>,
}

impl AlertPopup {
    pub fn push(&mut self, message: String) {
        self.queue.push_back(message);
    }

    /// Drop the message currently shown.
    pub fn dismiss(&mut self) {
        self.queue.pop_front();
    }

    pub fn current(&self) -> Option<&str> {
        self.queue.front().map(String::as_str)
    }

    pub fn is_open(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(message) = self.current() else {
            return;
        };

        let popup = centered(area, 60, 7);
        let waiting = self.queue.len() - 1;
        let footer = if waiting > 0 {
            format!(" Enter/Esc to dismiss ({waiting} more) ")
        } else {
            " Enter/Esc to dismiss ".to_string()
        };

        let body = Paragraph::new(message)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::White))
            .block(
                Block::default()
                    .title(" Syncthing ")
                    .title_bottom(footer)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            );
        frame.render_widget(Clear, popup);
        frame.render_widget(body, popup);
    }
}

/// A `width`% wide, `height`-row box centred in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(width)])
        .flex(Flex::Center)
        .areas(row);
    popup
}
