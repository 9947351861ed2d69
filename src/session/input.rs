use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::engine::position::{RenderedText, caret_offset, insert_text_at_caret};
use crate::surface::{SelectionProvider, Surface, set_content};

/// Modifiers that make a key a shortcut rather than text.
pub fn is_shortcut(key: &KeyEvent) -> bool {
    key.modifiers.intersects(
        KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER | KeyModifiers::META,
    )
}

/// What the editable surface does with a key nobody intercepted.
/// Returns whether the surface changed or the caret moved.
pub fn apply_default(surface: &mut Surface, key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            delete_word_back(surface)
        }
        KeyCode::Char(ch) if !is_shortcut(key) => insert_text_at_caret(surface, &ch.to_string()),
        KeyCode::Backspace
            if key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            delete_word_back(surface)
        }
        KeyCode::Backspace => delete_char_back(surface),
        KeyCode::Left => move_caret(surface, |text, offset| offset.saturating_sub(1).min(text.len())),
        KeyCode::Right => move_caret(surface, |text, offset| (offset + 1).min(text.len())),
        KeyCode::Home => move_caret(surface, |text, offset| line_start(text, offset)),
        KeyCode::End => move_caret(surface, |text, offset| line_end(text, offset)),
        _ => false,
    }
}

/// Inserts `count` newlines at the caret, each in its own node, and places
/// the caret after them.
pub fn insert_line_breaks(surface: &mut Surface, count: usize) -> bool {
    edit(surface, |text, offset| {
        let breaks = std::iter::repeat_n('\n', count);
        text.splice(offset..offset, breaks);
        Some(offset + count)
    })
}

fn delete_char_back(surface: &mut Surface) -> bool {
    edit(surface, |text, offset| {
        if offset == 0 {
            return None;
        }
        text.remove(offset - 1);
        Some(offset - 1)
    })
}

/// Unix word rubout: skip whitespace, then non-whitespace.
fn delete_word_back(surface: &mut Surface) -> bool {
    edit(surface, |text, offset| {
        if offset == 0 {
            return None;
        }
        let mut pos = offset;
        while pos > 0 && text[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && !text[pos - 1].is_whitespace() {
            pos -= 1;
        }
        text.drain(pos..offset);
        Some(pos)
    })
}

fn line_start(text: &[char], offset: usize) -> usize {
    text[..offset.min(text.len())]
        .iter()
        .rposition(|&c| c == '\n')
        .map(|i| i + 1)
        .unwrap_or(0)
}

fn line_end(text: &[char], offset: usize) -> usize {
    let offset = offset.min(text.len());
    text[offset..]
        .iter()
        .position(|&c| c == '\n')
        .map(|i| offset + i)
        .unwrap_or(text.len())
}

fn move_caret(surface: &mut Surface, to: impl Fn(&[char], usize) -> usize) -> bool {
    let Some(offset) = caret_offset(surface) else {
        return false;
    };
    let text: Vec<char> = surface.text_content(surface.root()).chars().collect();
    let target = to(&text, offset);
    if target == offset {
        return false;
    }
    match surface.position_at(target) {
        Some(caret) => {
            surface.collapse(caret);
            true
        }
        None => false,
    }
}

/// Applies a linear edit to the rendered text, rebuilds the canonical node
/// layout and restores the caret at the returned offset.
fn edit(surface: &mut Surface, f: impl FnOnce(&mut Vec<char>, usize) -> Option<usize>) -> bool {
    let Some(offset) = caret_offset(surface) else {
        return false;
    };
    let mut text: Vec<char> = surface.text_content(surface.root()).chars().collect();
    let offset = offset.min(text.len());
    let Some(new_offset) = f(&mut text, offset) else {
        return false;
    };
    let rebuilt: String = text.into_iter().collect();
    set_content(surface, &rebuilt);
    if let Some(caret) = surface.position_at(new_offset) {
        surface.collapse(caret);
    }
    true
}
