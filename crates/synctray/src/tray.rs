//! Native system tray frontend (Windows and macOS).
//!
//! winit owns the main thread. The dispatch loop reaches it through an
//! [`EventLoopProxy`], and menu clicks arrive through the same proxy, so
//! every UI change happens inside [`ApplicationHandler::user_event`].

use anyhow::Result;
use rfd::{MessageButtons, MessageDialog, MessageLevel};
use synctray_config::ConfigResolver;
use synctray_core::dispatch::EventLoop as DispatchLoop;
use synctray_core::{
    ActionEvent, ActionSender, Frontend, MenuState, SystemOpener, TrayUpdate, action_channel,
};
use tracing::{debug, error, info, warn};
use tray_icon::menu::{Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};
use winit::application::ApplicationHandler;
use winit::event::{StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::WindowId;

const TOOLTIP: &str = "Syncthing";
const ICON_SIZE: u32 = 32;

/// Events delivered to the winit loop.
#[derive(Debug)]
pub enum TrayMessage {
    Update(TrayUpdate),
    Menu(MenuId),
}

/// [`Frontend`] that posts updates to the winit loop.
struct ProxyFrontend {
    proxy: EventLoopProxy<TrayMessage>,
}

impl ProxyFrontend {
    fn post(&self, update: TrayUpdate) {
        if self.proxy.send_event(TrayMessage::Update(update)).is_err() {
            debug!("tray event loop closed, update dropped");
        }
    }
}

impl Frontend for ProxyFrontend {
    fn set_version_label(&mut self, label: &str) {
        self.post(TrayUpdate::VersionLabel(label.to_string()));
    }

    fn alert(&mut self, message: &str) {
        self.post(TrayUpdate::Alert(message.to_string()));
    }

    fn quit(&mut self) {
        self.post(TrayUpdate::Quit);
    }
}

struct TrayApp {
    actions: ActionSender,
    state: MenuState,
    tray: Option<TrayIcon>,
    version_item: Option<MenuItem>,
    bindings: Vec<(MenuId, ActionEvent)>,
}

impl TrayApp {
    fn new(actions: ActionSender) -> Self {
        Self {
            actions,
            state: MenuState::default(),
            tray: None,
            version_item: None,
            bindings: Vec::new(),
        }
    }

    fn build(&mut self) -> Result<()> {
        let menu = Menu::new();
        for entry in self.state.build_menu() {
            if entry.is_separator() {
                menu.append(&PredefinedMenuItem::separator())?;
                continue;
            }
            let item = MenuItem::new(&entry.label, entry.enabled, None);
            menu.append(&item)?;
            match entry.action {
                Some(action) => self.bindings.push((item.id().clone(), action)),
                None => self.version_item = Some(item),
            }
        }

        let tray = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_tooltip(TOOLTIP)
            .with_icon(tray_icon()?)
            .build()?;
        self.tray = Some(tray);
        info!("system tray ready");
        Ok(())
    }

    fn on_update(&mut self, event_loop: &ActiveEventLoop, update: TrayUpdate) {
        match update {
            TrayUpdate::Alert(message) => show_alert(&message),
            update => {
                if !update.apply(&mut self.state) {
                    info!("removing tray icon");
                    self.tray = None;
                    event_loop.exit();
                    return;
                }
                if let Some(item) = &self.version_item {
                    item.set_text(&self.state.version_label);
                }
            }
        }
    }

    fn on_menu(&mut self, event_loop: &ActiveEventLoop, id: MenuId) {
        let Some(action) = self
            .bindings
            .iter()
            .find(|(bound, _)| *bound == id)
            .map(|(_, action)| *action)
        else {
            return;
        };
        debug!(?action, "menu clicked");
        if self.actions.send(action).is_err() {
            warn!("dispatch loop is gone, closing tray");
            event_loop.exit();
        }
    }
}

impl ApplicationHandler<TrayMessage> for TrayApp {
    fn new_events(&mut self, event_loop: &ActiveEventLoop, cause: StartCause) {
        // The icon must be created once the platform loop is running.
        if cause == StartCause::Init {
            if let Err(e) = self.build() {
                error!(error = %e, "failed to create tray icon");
                event_loop.exit();
            }
        }
    }

    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, _: WindowEvent) {}

    fn user_event(&mut self, event_loop: &ActiveEventLoop, message: TrayMessage) {
        match message {
            TrayMessage::Update(update) => self.on_update(event_loop, update),
            TrayMessage::Menu(id) => self.on_menu(event_loop, id),
        }
    }
}

fn show_alert(message: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(TOOLTIP)
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}

/// A filled circle in Syncthing blue.
fn tray_icon() -> Result<Icon> {
    let centre = ICON_SIZE as f32 / 2.0;
    let radius = centre - 1.0;
    let mut rgba = Vec::with_capacity((ICON_SIZE * ICON_SIZE * 4) as usize);
    for y in 0..ICON_SIZE {
        for x in 0..ICON_SIZE {
            let dx = x as f32 + 0.5 - centre;
            let dy = y as f32 + 0.5 - centre;
            let alpha = if dx * dx + dy * dy <= radius * radius { 255 } else { 0 };
            rgba.extend_from_slice(&[0x00, 0x89, 0xd1, alpha]);
        }
    }
    Ok(Icon::from_rgba(rgba, ICON_SIZE, ICON_SIZE)?)
}

/// Run the native tray on the current (main) thread until Quit.
pub fn run(resolver: ConfigResolver) -> Result<()> {
    let event_loop = EventLoop::<TrayMessage>::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let menu_proxy = event_loop.create_proxy();
    MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
        let _ = menu_proxy.send_event(TrayMessage::Menu(event.id));
    }));

    let (actions, actions_rx) = action_channel();
    let frontend = ProxyFrontend {
        proxy: event_loop.create_proxy(),
    };
    let mut dispatch = DispatchLoop::new(resolver, frontend, SystemOpener, actions_rx);
    tokio::spawn(async move { dispatch.run().await });

    let mut app = TrayApp::new(actions);
    event_loop.run_app(&mut app)?;
    info!("tray closed");
    Ok(())
}
