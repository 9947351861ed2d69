use crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;

use crate::engine::align::{line_and_column, line_at};
use crate::engine::position::insert_text_at_caret;
use crate::surface::{SelectionProvider, Surface};

/// Punctuation the user may skip: anything visible that is neither a letter,
/// a digit nor whitespace.
pub fn is_skippable(ch: char) -> bool {
    !ch.is_alphanumeric() && !ch.is_whitespace() && !ch.is_control()
}

/// The target character expected at the caret, looked up by visual line and
/// column. `None` at the end of a line or past the end of the target.
pub fn expected_char(target: &str, surface: &Surface) -> Option<char> {
    let caret = surface.selection()?.anchor;
    if surface.is_text(caret.node) {
        return line_at(target, surface, caret.node).chars().nth(caret.offset);
    }
    let (line, column) = line_and_column(surface, caret);
    target.split('\n').nth(line)?.chars().nth(column)
}

/// Inserts the expected punctuation character when the user typed something
/// else in its place. The typed key is absorbed: returns true so the caller
/// suppresses it. A space is always typed as itself.
pub fn ignore_punctuation(key: &KeyEvent, target: &str, surface: &mut Surface) -> bool {
    let KeyCode::Char(typed) = key.code else {
        return false;
    };
    if typed == ' ' {
        return false;
    }
    let Some(expected) = expected_char(target, surface) else {
        return false;
    };
    if !is_skippable(expected) || typed == expected {
        return false;
    }
    if !insert_text_at_caret(surface, &expected.to_string()) {
        return false;
    }
    debug!(%expected, %typed, "inserted skipped punctuation");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::position::{caret_offset, place_cursor_at_end};
    use crate::surface::set_content;
    use crossterm::event::KeyModifiers;

    fn key(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE)
    }

    fn surface(typed: &str) -> Surface {
        let mut s = Surface::new();
        set_content(&mut s, typed);
        place_cursor_at_end(&mut s);
        s
    }

    #[test]
    fn inserts_skipped_comma() {
        let mut s = surface("a");
        assert!(ignore_punctuation(&key('b'), "a,b", &mut s));
        assert_eq!(s.text_content(s.root()), "a,");
        assert_eq!(caret_offset(&s), Some(2));
    }

    #[test]
    fn typing_the_punctuation_itself_passes_through() {
        let mut s = surface("a");
        assert!(!ignore_punctuation(&key(','), "a,b", &mut s));
        assert_eq!(s.text_content(s.root()), "a");
    }

    #[test]
    fn letters_and_spaces_expected_are_not_touched() {
        let mut s = surface("a");
        assert!(!ignore_punctuation(&key('x'), "ab", &mut s));
        assert!(!ignore_punctuation(&key('x'), "a b", &mut s));
        assert_eq!(s.text_content(s.root()), "a");
    }

    #[test]
    fn end_of_line_declines() {
        let mut s = surface("ab");
        assert!(!ignore_punctuation(&key('.'), "ab\ncd", &mut s));
        assert!(!ignore_punctuation(&key('.'), "ab", &mut s));
    }

    #[test]
    fn uses_line_and_column_on_later_lines() {
        let mut s = surface("ab\ncd");
        assert!(ignore_punctuation(&key('e'), "ab\ncd. ef", &mut s));
        assert_eq!(s.text_content(s.root()), "ab\ncd.");
    }

    #[test]
    fn space_is_never_absorbed() {
        let mut s = surface("cd");
        assert!(!ignore_punctuation(&key(' '), "cd. ef", &mut s));
        assert_eq!(s.text_content(s.root()), "cd");
        assert_eq!(caret_offset(&s), Some(2));
    }

    #[test]
    fn expected_char_follows_paragraph_breaks() {
        let s = surface("ab\n\ncd");
        assert_eq!(expected_char("ab\n\ncd!", &s), Some('!'));
        let s = surface("ab\n\n");
        assert_eq!(expected_char("ab\n\n\"x\"", &s), Some('"'));
    }

    #[test]
    fn start_of_new_line() {
        let mut s = surface("ab\n");
        assert!(ignore_punctuation(&key('q'), "ab\n\"quote\"", &mut s));
        assert_eq!(s.text_content(s.root()), "ab\n\"");
    }

    #[test]
    fn modified_keys_other_than_chars_decline() {
        let mut s = surface("a");
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert!(!ignore_punctuation(&enter, "a,b", &mut s));
    }
}
