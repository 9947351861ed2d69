use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;

use retype::engine::highlight::{ErrorRun, rendered_runs};
use retype::session::editor::{ClickTarget, Editor, EditorEvent, Handled, Mode};
use retype::session::settings::Settings;
use retype::surface::Mark;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn practicing(text: &str, settings: Settings) -> Editor {
    let mut editor = Editor::new(settings);
    editor.mount();
    editor.set_target_text(Some(text));
    editor
}

fn type_keys(editor: &mut Editor, text: &str) {
    for ch in text.chars() {
        let k = key(KeyCode::Char(ch));
        editor.dispatch(EditorEvent::KeyDown(k));
        editor.dispatch(EditorEvent::KeyUp(k));
    }
}

/// Token index of the `n`th rendered word (zero based) in the target view.
fn rendered_word(editor: &Editor, n: usize) -> ClickTarget {
    let view = editor.target_view();
    let node = view
        .descendants(view.root())
        .into_iter()
        .filter(|&id| matches!(view.marks(id).first(), Some(Mark::Word(_))))
        .nth(n)
        .and_then(|el| view.children(el).first().copied());
    ClickTarget::resolve(view, node)
}

#[test]
fn autocorrect_fixes_word_on_space() {
    let mut editor = practicing(
        "the quick fox",
        Settings {
            autocorrect: true,
            ignore_punctuation: false,
        },
    );
    type_keys(&mut editor, "teh");
    let handled = editor.dispatch(EditorEvent::KeyDown(key(KeyCode::Char(' '))));

    assert_eq!(handled, Handled::Intercepted);
    assert_eq!(editor.typed_text(), "the ");
    assert_eq!(editor.caret_offset(), Some(4));
}

#[test]
fn without_autocorrect_the_typo_stays() {
    let mut editor = practicing("the quick fox", Settings::default());
    type_keys(&mut editor, "teh ");
    assert_eq!(editor.typed_text(), "teh ");
    assert_eq!(
        rendered_runs(editor.highlight()),
        vec![ErrorRun { start: 1, end: 3 }]
    );
}

#[test]
fn punctuation_is_inserted_for_the_user() {
    let mut editor = practicing(
        "a,b",
        Settings {
            autocorrect: false,
            ignore_punctuation: true,
        },
    );
    type_keys(&mut editor, "a");
    let handled = editor.dispatch(EditorEvent::KeyDown(key(KeyCode::Char('b'))));

    assert_eq!(handled, Handled::Intercepted);
    assert_eq!(editor.typed_text(), "a,");
}

#[test]
fn clicking_third_word_rewinds_to_it() {
    let mut editor = practicing("one two three four", Settings::default());
    type_keys(&mut editor, "one two three fo");

    let third = rendered_word(&editor, 2);
    assert_eq!(third, ClickTarget::Word(4));
    assert_eq!(editor.dispatch(EditorEvent::Click(third)), Handled::Intercepted);
    assert_eq!(editor.typed_text(), "one two ");
    assert_eq!(editor.caret_offset(), Some(8));
    assert!(editor.input().is_focused());
}

#[test]
fn clicking_ahead_skips_forward() {
    let mut editor = practicing("one two three four", Settings::default());
    let last = rendered_word(&editor, 3);
    editor.dispatch(EditorEvent::Click(last));
    assert_eq!(editor.typed_text(), "one two three ");
}

#[test]
fn first_paste_becomes_the_target() {
    let mut editor = Editor::new(Settings::default());
    editor.mount();
    let handled = editor.dispatch(EditorEvent::Paste("Hello   world\n\n\n\nbye".into()));

    assert_eq!(handled, Handled::Intercepted);
    assert_eq!(editor.target().map(|t| t.as_str()), Some("Hello world\n\nbye"));
    assert_eq!(editor.typed_text(), "");
}

#[test]
fn paste_during_practice_is_discarded() {
    let mut editor = practicing("abc", Settings::default());
    type_keys(&mut editor, "ab");
    let handled = editor.dispatch(EditorEvent::Paste("zzz".into()));

    assert_eq!(handled, Handled::Intercepted);
    assert_eq!(editor.typed_text(), "ab");
    assert_eq!(editor.target().map(|t| t.as_str()), Some("abc"));
}

#[test]
fn whitespace_paste_keeps_waiting() {
    let mut editor = Editor::new(Settings::default());
    editor.mount();
    editor.dispatch(EditorEvent::Paste(" \n\t ".into()));
    assert_eq!(editor.mode(), &Mode::AwaitingText);
}

#[test]
fn input_takes_focus_after_refocus_delay() {
    let mut editor = Editor::new(Settings::default());
    editor.mount();
    editor.dispatch(EditorEvent::Paste("abc".into()));
    assert!(!editor.input().is_focused());
    assert!(editor.pending_refocus().is_some());

    // Typing before the deferred focus lands goes nowhere.
    let handled = editor.dispatch(EditorEvent::KeyDown(key(KeyCode::Char('a'))));
    assert_eq!(handled, Handled::Ignored);

    editor.run_deferred(Instant::now() + Duration::from_secs(1));
    assert!(editor.input().is_focused());
    assert!(editor.pending_refocus().is_none());

    type_keys(&mut editor, "a");
    assert_eq!(editor.typed_text(), "a");
}

#[test]
fn listeners_are_rebound_not_duplicated() {
    let mut editor = Editor::new(Settings::default());
    assert!(editor.listeners().is_empty());
    editor.mount();
    assert_eq!(editor.listeners().len(), 4);
    let first = editor.listeners().ids();

    editor.set_target_text(Some("one"));
    editor.set_target_text(Some("two"));
    editor.set_settings(Settings {
        autocorrect: true,
        ignore_punctuation: true,
    });
    assert_eq!(editor.listeners().len(), 4);
    assert!(editor.listeners().ids().iter().all(|id| !first.contains(id)));

    let before = editor.listeners().ids();
    editor.set_settings(editor.settings());
    assert_eq!(editor.listeners().ids(), before);

    editor.unmount();
    assert!(editor.listeners().is_empty());
    assert_eq!(
        editor.dispatch(EditorEvent::KeyDown(key(KeyCode::Char('t')))),
        Handled::Ignored
    );
}

#[test]
fn enter_matches_paragraph_breaks() {
    let mut editor = practicing("ab\n\ncd", Settings::default());
    type_keys(&mut editor, "ab");
    editor.dispatch(EditorEvent::KeyDown(key(KeyCode::Enter)));
    assert_eq!(editor.typed_text(), "ab\n\n");
    type_keys(&mut editor, "cd");
    assert_eq!(editor.typed_text(), "ab\n\ncd");
    assert!(rendered_runs(editor.highlight()).is_empty());
}

#[test]
fn space_is_not_doubled_or_leading() {
    let mut editor = practicing("a b", Settings::default());
    type_keys(&mut editor, " a  ");
    assert_eq!(editor.typed_text(), "a ");
}

#[test]
fn clearing_target_returns_to_awaiting() {
    let mut editor = practicing("abc", Settings::default());
    type_keys(&mut editor, "ab");
    editor.set_target_text(None);
    assert_eq!(editor.mode(), &Mode::AwaitingText);
    assert_eq!(editor.typed_text(), "");
    assert_eq!(editor.target_view().text_content(editor.target_view().root()), "");

    editor.dispatch(EditorEvent::Paste("next".into()));
    assert_eq!(editor.target().map(|t| t.as_str()), Some("next"));
}

#[test]
fn autocorrect_runs_before_enter() {
    let mut editor = practicing(
        "the\nfox",
        Settings {
            autocorrect: true,
            ignore_punctuation: false,
        },
    );
    type_keys(&mut editor, "teh");
    let handled = editor.dispatch(EditorEvent::KeyDown(key(KeyCode::Enter)));

    assert_eq!(handled, Handled::Intercepted);
    assert_eq!(editor.typed_text(), "the\n");
    assert_eq!(editor.caret_offset(), Some(4));
}

#[test]
fn space_is_typed_plainly_with_only_punctuation_skipping() {
    let mut editor = practicing(
        "cd. ef",
        Settings {
            autocorrect: false,
            ignore_punctuation: true,
        },
    );
    type_keys(&mut editor, "cd");
    let handled = editor.dispatch(EditorEvent::KeyDown(key(KeyCode::Char(' '))));

    assert_eq!(handled, Handled::PassedThrough);
    assert_eq!(editor.typed_text(), "cd ");
}

#[test]
fn space_falls_through_punctuation_to_autocorrect() {
    let mut editor = practicing(
        "cd. ef",
        Settings {
            autocorrect: true,
            ignore_punctuation: true,
        },
    );
    type_keys(&mut editor, "cd");
    let handled = editor.dispatch(EditorEvent::KeyDown(key(KeyCode::Char(' '))));

    assert_eq!(handled, Handled::Intercepted);
    assert_eq!(editor.typed_text(), "cd. ");
    assert_eq!(editor.caret_offset(), Some(4));
}

#[test]
fn modified_keys_skip_punctuation() {
    let mut editor = practicing(
        "a,b",
        Settings {
            autocorrect: false,
            ignore_punctuation: true,
        },
    );
    type_keys(&mut editor, "a");

    let ctrl_b = KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL);
    assert_eq!(editor.dispatch(EditorEvent::KeyDown(ctrl_b)), Handled::PassedThrough);
    assert_eq!(editor.typed_text(), "a");

    let alt_backspace = KeyEvent::new(KeyCode::Backspace, KeyModifiers::ALT);
    assert_eq!(
        editor.dispatch(EditorEvent::KeyDown(alt_backspace)),
        Handled::PassedThrough
    );
    assert_eq!(editor.typed_text(), "");
}
