//! Menu panel: the tray menu rendered as a selectable list.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState},
};
use synctray_core::menu::ACTIONS;
use synctray_core::{ActionEvent, MenuState};

/// Tracks which action entry is selected.
pub struct MenuPanel {
    /// Index into [`ACTIONS`].
    selected: usize,
}

impl MenuPanel {
    pub fn new() -> Self {
        Self { selected: 0 }
    }

    pub fn selected_action(&self) -> ActionEvent {
        ACTIONS[self.selected].0
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % ACTIONS.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + ACTIONS.len() - 1) % ACTIONS.len();
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &MenuState) {
        let entries = state.build_menu();
        let rule = "─".repeat(area.width.saturating_sub(2) as usize);

        let mut list_state = ListState::default();
        let items: Vec<ListItem> = entries
            .iter()
            .enumerate()
            .map(|(row, item)| {
                if item.is_separator() {
                    return ListItem::new(rule.as_str()).style(Style::default().fg(Color::DarkGray));
                }
                let Some(action) = item.action else {
                    return ListItem::new(item.label.as_str()).style(Style::default().fg(Color::Gray));
                };
                if action == self.selected_action() {
                    list_state.select(Some(row));
                }
                let key = ACTIONS
                    .iter()
                    .find(|(a, _, _)| *a == action)
                    .map(|(_, _, k)| *k)
                    .unwrap_or(' ');
                ListItem::new(Line::from(vec![
                    Span::styled(format!("[{key}] "), Style::default().fg(Color::Cyan)),
                    Span::raw(item.label.as_str()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title(" Menu ").borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, area, &mut list_state);
    }
}

impl Default for MenuPanel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_selection_wraps() {
        let mut panel = MenuPanel::new();
        assert_eq!(panel.selected_action(), ActionEvent::OpenUi);

        panel.select_prev();
        assert_eq!(panel.selected_action(), ActionEvent::Quit);

        panel.select_next();
        panel.select_next();
        assert_eq!(panel.selected_action(), ActionEvent::Restart);
    }

    #[test]
    fn test_full_cycle_returns_to_start() {
        let mut panel = MenuPanel::new();
        for _ in 0..ACTIONS.len() {
            panel.select_next();
        }
        assert_eq!(panel.selected_action(), ActionEvent::OpenUi);
    }
}
