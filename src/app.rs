use std::path::PathBuf;
use std::time::Instant;

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::session::editor::{ClickTarget, Editor, EditorEvent};
use crate::session::settings::Settings;
use crate::surface::{Mark, Surface};
use crate::ui::components::typing_area::Viewport;
use crate::ui::theme::Theme;

/// Where each pane was drawn on the last frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct Regions {
    pub header: Rect,
    pub target: Viewport,
    pub input: Rect,
    pub footer: Rect,
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

pub struct App {
    pub editor: Editor,
    pub config: Config,
    pub theme: Theme,
    pub should_quit: bool,
    pub regions: Regions,
    pub last_error: Option<String>,
    config_path: PathBuf,
    chrome: Surface,
    controls: Surface,
    key_release_reported: bool,
}

impl App {
    /// `key_release_reported` is whether the terminal sends key release
    /// events; without them every press is followed by a synthetic release.
    pub fn new(
        config: Config,
        config_path: PathBuf,
        theme: Theme,
        key_release_reported: bool,
    ) -> Self {
        let mut editor = Editor::new(config.settings());
        editor.mount();
        Self {
            editor,
            config,
            theme,
            should_quit: false,
            regions: Regions::default(),
            last_error: None,
            config_path,
            chrome: Surface::with_root_marks(vec![Mark::Chrome]),
            controls: Surface::with_root_marks(vec![Mark::NoFocusSteal]),
            key_release_reported,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            if self.key_release_reported {
                self.editor.dispatch(EditorEvent::KeyUp(key));
            }
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::F(2) => self.toggle_setting(|s| s.autocorrect = !s.autocorrect),
            KeyCode::F(3) => self.toggle_setting(|s| s.ignore_punctuation = !s.ignore_punctuation),
            KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                info!("target text discarded");
                self.editor.set_target_text(None);
            }
            _ => {
                self.editor.dispatch(EditorEvent::KeyDown(key));
                if !self.key_release_reported {
                    self.editor.dispatch(EditorEvent::KeyUp(key));
                }
            }
        }
    }

    pub fn handle_paste(&mut self, text: String) {
        self.editor.dispatch(EditorEvent::Paste(text));
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if let Some(target) = self.click_target(mouse.column, mouse.row) {
            debug!(?target, column = mouse.column, row = mouse.row, "click");
            self.editor.dispatch(EditorEvent::Click(target));
        }
    }

    /// Resolves a screen cell to what was drawn there on the last frame.
    pub fn click_target(&self, column: u16, row: u16) -> Option<ClickTarget> {
        let regions = &self.regions;
        if contains(regions.header, column, row) {
            return Some(ClickTarget::resolve(&self.chrome, Some(self.chrome.root())));
        }
        if contains(regions.footer, column, row) {
            return Some(ClickTarget::resolve(&self.controls, Some(self.controls.root())));
        }
        if contains(regions.target.inner, column, row) {
            let surface = self.editor.target_view();
            let hit = regions.target.hit_test(surface, column, row);
            return Some(ClickTarget::resolve(surface, hit));
        }
        if contains(regions.input, column, row) {
            return Some(ClickTarget::Elsewhere);
        }
        None
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.editor.run_deferred(now);
    }

    fn toggle_setting(&mut self, change: impl FnOnce(&mut Settings)) {
        let mut settings = self.editor.settings();
        change(&mut settings);
        self.editor.set_settings(settings);
        self.config.apply_settings(settings);
        match self.config.save_to(&self.config_path) {
            Ok(()) => self.last_error = None,
            Err(err) => {
                warn!(%err, "failed to save config");
                self.last_error = Some(format!("could not save settings: {err}"));
            }
        }
    }

    /// Tears down the editor's bindings at the end of the session.
    pub fn shutdown(&mut self) {
        self.editor.unmount();
        info!("session ended");
    }
}
