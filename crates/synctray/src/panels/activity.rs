//! Activity panel: scrollable view of what the dispatch loop has logged.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use synctray_core::ActivityReader;
use tracing::Level;

/// Scrollable activity log with auto-follow.
pub struct ActivityPanel {
    reader: ActivityReader,
    /// Snapshot refreshed on tick.
    lines: Vec<ActivityLine>,
    /// Lines scrolled up from the bottom (0 = latest).
    scroll_offset: usize,
    auto_follow: bool,
}

struct ActivityLine {
    elapsed: String,
    level: Level,
    target: String,
    text: String,
}

impl ActivityPanel {
    pub fn new(reader: ActivityReader) -> Self {
        Self {
            reader,
            lines: Vec::new(),
            scroll_offset: 0,
            auto_follow: true,
        }
    }

    pub fn refresh(&mut self) {
        self.lines = self
            .reader
            .entries()
            .into_iter()
            .map(|e| ActivityLine {
                elapsed: format!("{:>8.2}s", e.elapsed_secs),
                level: e.level,
                text: e.to_string(),
                target: e.target,
            })
            .collect();

        if self.auto_follow {
            self.scroll_offset = 0;
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if self.lines.is_empty() {
            let empty = Paragraph::new("  (no activity yet)")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().title(" Activity ").borders(Borders::ALL));
            frame.render_widget(empty, area);
            return;
        }

        let visible = area.height.saturating_sub(2) as usize;
        let total = self.lines.len();
        let skip = total.saturating_sub(visible + self.scroll_offset);

        let items: Vec<ListItem> = self
            .lines
            .iter()
            .skip(skip)
            .take(visible)
            .map(|line| {
                let level_style = match line.level {
                    Level::ERROR => Style::default().fg(Color::Red),
                    Level::WARN => Style::default().fg(Color::Yellow),
                    Level::INFO => Style::default().fg(Color::Green),
                    Level::DEBUG => Style::default().fg(Color::Blue),
                    Level::TRACE => Style::default().fg(Color::DarkGray),
                };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{} ", line.elapsed),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(format!("{:>5} ", line.level), level_style),
                    Span::styled(
                        format!("{}: ", line.target),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::raw(&line.text),
                ]))
            })
            .collect();

        let follow = if self.auto_follow { " [follow]" } else { "" };
        let title = format!(" Activity ({total}){follow} ");
        let list = List::new(items).block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    pub fn scroll_down(&mut self, n: usize) {
        if self.scroll_offset > n {
            self.scroll_offset -= n;
        } else {
            self.scroll_to_bottom();
        }
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.auto_follow = false;
        let max_offset = self.lines.len().saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + n).min(max_offset);
    }

    pub fn scroll_to_top(&mut self) {
        self.auto_follow = false;
        self.scroll_offset = self.lines.len().saturating_sub(1);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
        self.auto_follow = true;
    }
}
