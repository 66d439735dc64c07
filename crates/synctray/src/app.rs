//! Terminal frontend state and event handling.
//!
//! The [`App`] never talks to the daemon. It forwards menu actions to the
//! dispatch loop and, on every tick, folds the loop's [`TrayUpdate`]s into
//! what it renders.

use std::sync::mpsc::{Receiver, TryRecvError};

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use synctray_core::{ActionEvent, ActionSender, ActivityReader, MenuState, TrayUpdate};
use tracing::warn;

use crate::keymap::{Action, KeyMapper};
use crate::panels::{ActivityPanel, AlertPopup, MenuPanel};

const MENU_WIDTH: u16 = 32;
const PAGE: usize = 10;

/// Terminal UI state.
pub struct App {
    pub should_quit: bool,
    /// Set once Quit has been sent; the UI closes when the loop confirms.
    pub quitting: bool,
    pub keymap: KeyMapper,
    pub menu_state: MenuState,
    pub menu: MenuPanel,
    pub activity: ActivityPanel,
    pub alerts: AlertPopup,
    actions: ActionSender,
    updates: Receiver<TrayUpdate>,
}

impl App {
    pub fn new(actions: ActionSender, updates: Receiver<TrayUpdate>, reader: ActivityReader) -> Self {
        Self {
            should_quit: false,
            quitting: false,
            keymap: KeyMapper::new(),
            menu_state: MenuState::default(),
            menu: MenuPanel::new(),
            activity: ActivityPanel::new(reader),
            alerts: AlertPopup::default(),
            actions,
            updates,
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        // An open alert is modal: only dismissing it (or quitting) gets through.
        if self.alerts.is_open() {
            match action {
                Action::Activate | Action::Dismiss => self.alerts.dismiss(),
                Action::Dispatch(ActionEvent::Quit) => self.dispatch(ActionEvent::Quit),
                _ => {}
            }
            return;
        }

        match action {
            Action::Dispatch(event) => self.dispatch(event),
            Action::Activate => self.dispatch(self.menu.selected_action()),
            Action::SelectNext => self.menu.select_next(),
            Action::SelectPrev => self.menu.select_prev(),
            Action::ScrollUp => self.activity.scroll_up(PAGE),
            Action::ScrollDown => self.activity.scroll_down(PAGE),
            Action::ScrollToTop => self.activity.scroll_to_top(),
            Action::ScrollToBottom => self.activity.scroll_to_bottom(),
            Action::Dismiss | Action::None => {}
        }
    }

    fn dispatch(&mut self, event: ActionEvent) {
        if self.quitting {
            return;
        }
        if event == ActionEvent::Quit {
            self.quitting = true;
        }
        if self.actions.send(event).is_err() {
            warn!(?event, "dispatch loop is gone, closing");
            self.should_quit = true;
        }
    }

    /// Apply pending updates from the dispatch loop and refresh the
    /// activity snapshot.
    pub fn tick(&mut self) {
        loop {
            match self.updates.try_recv() {
                Ok(TrayUpdate::Alert(message)) => self.alerts.push(message),
                Ok(update) => {
                    if !update.apply(&mut self.menu_state) {
                        self.should_quit = true;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.should_quit = true;
                    break;
                }
            }
        }
        self.activity.refresh();
    }

    pub fn render(&self, frame: &mut Frame) {
        let [header, body, status] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .areas(frame.area());

        let title = Line::from(vec![
            Span::styled(
                "synctray",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::raw(self.menu_state.version_label.as_str()),
        ]);
        frame.render_widget(
            Paragraph::new(title).block(Block::default().borders(Borders::BOTTOM)),
            header,
        );

        let [menu, activity] =
            Layout::horizontal([Constraint::Length(MENU_WIDTH), Constraint::Min(1)]).areas(body);
        self.menu.render(frame, menu, &self.menu_state);
        self.activity.render(frame, activity);

        frame.render_widget(
            Paragraph::new(self.status_line())
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::TOP)),
            status,
        );

        self.alerts.render(frame, frame.area());
    }

    pub fn status_line(&self) -> String {
        if self.quitting {
            return " Quitting...".to_string();
        }
        " o:open  r:restart  s:shutdown  q:quit  j/k:select  Enter:run  PgUp/PgDn/gg/G:activity"
            .to_string()
    }
}
