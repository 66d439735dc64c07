//! Terminal UI panels.

mod activity;
mod alert;
mod menu;

pub use activity::ActivityPanel;
pub use alert::AlertPopup;
pub use menu::MenuPanel;
