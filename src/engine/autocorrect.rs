use crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;

use crate::engine::align::{next_word_boundary, previous_word_boundary};
use crate::engine::position::{RenderedText, place_cursor_after_inserted_text};
use crate::surface::{Caret, NodeId, SelectionProvider, Surface, is_line_break};

/// Replaces the word just typed with the target word at the same offsets.
///
/// Only fires once the word is finished: the key is space, or the caret
/// already sits at the end of the target word. Returns true when the surface
/// was rewritten and the key's default action must be suppressed.
pub fn autocorrect(key: &KeyEvent, target: &[char], surface: &mut Surface, trailing_space: bool) -> bool {
    let Some(selection) = surface.selection() else {
        return false;
    };
    let offset = surface.offset_at(selection.anchor);
    let root = surface.root();
    let typed: Vec<char> = surface.text_content(root).chars().collect();

    let start = previous_word_boundary(&typed, offset);
    let end = next_word_boundary(target, offset);
    if offset > typed.len() || start > end || end > target.len() {
        return false;
    }

    let entered = &typed[start..offset];
    let expected = &target[start..end];
    if entered == expected {
        return false;
    }

    let is_space = key.code == KeyCode::Char(' ');
    if !(offset > start && (is_space || offset == end)) {
        return false;
    }

    let Some((node, node_start)) = text_node_spanning(surface, start) else {
        return false;
    };
    let Some(current) = surface.text(node) else {
        return false;
    };
    let chars: Vec<char> = current.chars().collect();
    let local_start = start - node_start;
    let local_end = (end - node_start).min(chars.len()).max(local_start);

    let mut replaced: String = chars[..local_start].iter().collect();
    replaced.extend(expected.iter());
    if trailing_space {
        replaced.push(' ');
    }
    replaced.extend(chars[local_end..].iter());
    surface.set_text(node, replaced);

    let inserted = expected.len() + usize::from(trailing_space);
    place_cursor_after_inserted_text(surface, Caret::new(node, local_start), inserted);

    debug!(
        entered = %entered.iter().collect::<String>(),
        expected = %expected.iter().collect::<String>(),
        "autocorrected word"
    );
    true
}

/// The line text node under `root` that contains `offset`, with the offset at
/// which that node starts.
fn text_node_spanning(surface: &Surface, offset: usize) -> Option<(NodeId, usize)> {
    let root = surface.root();
    let mut acc = 0;
    for &child in surface.children(root) {
        let len = surface.text_len(child);
        if surface.text(child).is_some()
            && !is_line_break(surface, child)
            && offset >= acc
            && offset < acc + len
        {
            return Some((child, acc));
        }
        acc += len;
    }
    None
}
