use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use tracing::{debug, trace};

use crate::engine::align::{previous_word_boundary, would_create_consecutive_space};
use crate::engine::autocorrect::autocorrect;
use crate::engine::highlight;
use crate::engine::paste::normalize_pasted;
use crate::engine::position::{caret_offset, place_cursor_at_end};
use crate::engine::punctuation::ignore_punctuation;
use crate::session::input::{self, insert_line_breaks, is_shortcut};
use crate::session::listeners::{Dependencies, EventKind, Listeners};
use crate::session::settings::Settings;
use crate::session::target::TargetText;
use crate::surface::{Mark, NodeId, Surface, set_content};

/// Delay before the input surface takes focus after a content paste.
pub const REFOCUS_DELAY: Duration = Duration::from_millis(100);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// No target yet: the next paste becomes the target text.
    AwaitingText,
    Practicing(TargetText),
}

/// What a click landed on, resolved from the node under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    /// A rendered word of the target text, by token index.
    Word(usize),
    /// Chrome or a no-focus-steal region.
    Ignored,
    Elsewhere,
}

impl ClickTarget {
    pub fn resolve(surface: &Surface, node: Option<NodeId>) -> Self {
        let Some(node) = node else {
            return ClickTarget::Elsewhere;
        };
        if surface
            .closest(node, |m| matches!(m, Mark::Chrome | Mark::NoFocusSteal))
            .is_some()
        {
            return ClickTarget::Ignored;
        }
        match surface.closest(node, |m| matches!(m, Mark::Word(_))) {
            Some((_, Mark::Word(index))) => ClickTarget::Word(index),
            _ => ClickTarget::Elsewhere,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorEvent {
    Paste(String),
    Click(ClickTarget),
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
}

impl EditorEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            EditorEvent::Paste(_) => EventKind::Paste,
            EditorEvent::Click(_) => EventKind::Click,
            EditorEvent::KeyDown(_) => EventKind::KeyDown,
            EditorEvent::KeyUp(_) => EventKind::KeyUp,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handled {
    /// A handler acted and the default action was suppressed.
    Intercepted,
    /// The default action ran.
    PassedThrough,
    /// No live listener, or the event does not apply in the current mode.
    Ignored,
}

/// One editing session: the target text, the input and highlight surfaces,
/// and the handlers that tie keyboard, mouse and clipboard events to them.
pub struct Editor {
    mode: Mode,
    settings: Settings,
    generation: u64,
    mounted: bool,
    input: Surface,
    highlight: Surface,
    target_view: Surface,
    listeners: Listeners,
    refocus_at: Option<Instant>,
}

impl Editor {
    pub fn new(settings: Settings) -> Self {
        Self {
            mode: Mode::AwaitingText,
            settings,
            generation: 0,
            mounted: false,
            input: Surface::new(),
            highlight: Surface::new(),
            target_view: Surface::new(),
            listeners: Listeners::new(),
            refocus_at: None,
        }
    }

    /// Binds the event handlers for the current target and settings.
    pub fn mount(&mut self) {
        self.mounted = true;
        self.listeners.bind(self.dependencies());
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
        self.listeners.unbind();
    }

    fn dependencies(&self) -> Dependencies {
        Dependencies {
            target_generation: self.generation,
            settings: self.settings,
        }
    }

    fn resync(&mut self) {
        if self.mounted {
            self.listeners.sync(self.dependencies());
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn target(&self) -> Option<&TargetText> {
        match &self.mode {
            Mode::Practicing(target) => Some(target),
            Mode::AwaitingText => None,
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.resync();
    }

    pub fn input(&self) -> &Surface {
        &self.input
    }

    pub fn highlight(&self) -> &Surface {
        &self.highlight
    }

    pub fn target_view(&self) -> &Surface {
        &self.target_view
    }

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    pub fn typed_text(&self) -> String {
        self.input.text_content(self.input.root())
    }

    pub fn caret_offset(&self) -> Option<usize> {
        caret_offset(&self.input)
    }

    pub fn pending_refocus(&self) -> Option<Instant> {
        self.refocus_at
    }

    /// Replaces the target text wholesale. `None` returns to awaiting a paste.
    pub fn set_target_text(&mut self, text: Option<&str>) {
        match text {
            Some(text) => {
                self.load_target_text(text.to_string());
                self.focus_input();
            }
            None => {
                self.reset_surfaces();
                self.mode = Mode::AwaitingText;
                self.generation += 1;
                self.refocus_at = None;
                debug!("target text cleared");
                self.resync();
            }
        }
    }

    /// The single transition into practice: a fresh session on `text`.
    pub fn load_target_text(&mut self, text: String) {
        self.reset_surfaces();
        let target = TargetText::new(text);
        build_target_view(&mut self.target_view, &target);
        debug!(chars = target.len(), "target text loaded");
        self.mode = Mode::Practicing(target);
        self.generation += 1;
        self.resync();
    }

    fn reset_surfaces(&mut self) {
        self.input.clear();
        self.input.blur();
        self.highlight.clear();
        self.target_view.clear();
        place_cursor_at_end(&mut self.input);
    }

    fn focus_input(&mut self) {
        self.input.focus();
        place_cursor_at_end(&mut self.input);
    }

    /// Fires the deferred refocus once its deadline has passed.
    pub fn run_deferred(&mut self, now: Instant) {
        if let Some(at) = self.refocus_at {
            if now >= at {
                self.refocus_at = None;
                self.focus_input();
                trace!("deferred refocus fired");
            }
        }
    }

    pub fn dispatch(&mut self, event: EditorEvent) -> Handled {
        let kind = event.kind();
        if !self.listeners.is_listening(kind) {
            trace!(?kind, "no listener bound");
            return Handled::Ignored;
        }
        match event {
            EditorEvent::Paste(text) => self.on_paste(&text),
            EditorEvent::Click(target) => self.on_click(target),
            EditorEvent::KeyDown(key) => {
                let handled = self.on_key_down(&key);
                if handled == Handled::PassedThrough {
                    input::apply_default(&mut self.input, &key);
                }
                handled
            }
            EditorEvent::KeyUp(_) => self.on_key_up(),
        }
    }

    fn on_paste(&mut self, text: &str) -> Handled {
        if self.target().is_some() {
            debug!(len = text.len(), "paste discarded during practice");
            return Handled::Intercepted;
        }
        let normalized = normalize_pasted(text);
        if normalized.is_empty() {
            debug!("paste empty after normalization");
            return Handled::Intercepted;
        }
        self.load_target_text(normalized);
        self.refocus_at = Some(Instant::now() + REFOCUS_DELAY);
        Handled::Intercepted
    }

    fn on_click(&mut self, target: ClickTarget) -> Handled {
        match target {
            ClickTarget::Ignored => Handled::Ignored,
            ClickTarget::Word(index) => {
                let Some(start) = self.target().and_then(|t| t.word_start(index)) else {
                    self.focus_input();
                    return Handled::Intercepted;
                };
                let prefix = self.target().map(|t| t.prefix(start)).unwrap_or_default();
                set_content(&mut self.input, &prefix);
                self.focus_input();
                debug!(index, start, "rewound to clicked word");
                Handled::Intercepted
            }
            ClickTarget::Elsewhere => {
                self.focus_input();
                Handled::Intercepted
            }
        }
    }

    fn on_key_down(&mut self, key: &KeyEvent) -> Handled {
        let Mode::Practicing(target) = &self.mode else {
            return Handled::Ignored;
        };
        if !self.input.is_focused() {
            return Handled::Ignored;
        }
        if is_shortcut(key) {
            return Handled::PassedThrough;
        }
        let settings = self.settings;
        let surface = &mut self.input;

        match key.code {
            KeyCode::Enter => {
                if settings.autocorrect {
                    if let Some(offset) = caret_offset(surface) {
                        let typed: Vec<char> = surface.text_content(surface.root()).chars().collect();
                        if offset > previous_word_boundary(&typed, offset) {
                            autocorrect(key, target.chars(), surface, false);
                        }
                    }
                }
                let Some(offset) = caret_offset(surface) else {
                    return Handled::Intercepted;
                };
                let chars = target.chars();
                let double = chars.get(offset) == Some(&'\n') && chars.get(offset + 1) == Some(&'\n');
                insert_line_breaks(surface, if double { 2 } else { 1 });
                Handled::Intercepted
            }
            KeyCode::Char(' ') => {
                if surface.text_len(surface.root()) == 0 || would_create_consecutive_space(surface) {
                    trace!("space dropped");
                    return Handled::Intercepted;
                }
                if settings.ignore_punctuation && ignore_punctuation(key, target.as_str(), surface) {
                    return Handled::Intercepted;
                }
                if settings.autocorrect && autocorrect(key, target.chars(), surface, true) {
                    return Handled::Intercepted;
                }
                Handled::PassedThrough
            }
            _ => {
                if settings.ignore_punctuation && ignore_punctuation(key, target.as_str(), surface) {
                    return Handled::Intercepted;
                }
                Handled::PassedThrough
            }
        }
    }

    fn on_key_up(&mut self) -> Handled {
        let Mode::Practicing(target) = &self.mode else {
            return Handled::Ignored;
        };
        let typed = self.input.text_content(self.input.root());
        highlight::render(&mut self.highlight, &typed, target.as_str());
        Handled::PassedThrough
    }
}

/// One `Word` element per word token; whitespace runs stay plain text.
fn build_target_view(surface: &mut Surface, target: &TargetText) {
    surface.clear();
    let root = surface.root();
    for token in target.tokens() {
        if token.is_whitespace {
            surface.append_text(root, token.text);
        } else if let Some(word) = surface.append_element(root, vec![Mark::Word(token.index)]) {
            surface.append_text(word, token.text);
        }
    }
}
