use crate::surface::{Caret, NodeId, SelectionProvider, Surface, is_line_break};

/// Maps between carets in a node tree and linear char offsets into its
/// rendered text.
pub trait RenderedText {
    fn offset_at(&self, caret: Caret) -> usize;
    fn position_at(&self, offset: usize) -> Option<Caret>;
}

impl RenderedText for Surface {
    fn offset_at(&self, caret: Caret) -> usize {
        linear_offset(self, self.root(), caret.node, caret.offset)
    }

    fn position_at(&self, offset: usize) -> Option<Caret> {
        caret_at_offset(self, self.root(), offset)
    }
}

/// Linear offset of (`node`, `node_offset`) within the rendered text of `root`.
///
/// A caret anchored on `root` itself counts as the end of the text. A node
/// that is not below `root` maps to 0.
pub fn linear_offset(surface: &Surface, root: NodeId, node: NodeId, node_offset: usize) -> usize {
    if node == root {
        return surface.text_len(root);
    }
    let mut acc = 0;
    for id in surface.descendants(root) {
        if id == node {
            return match surface.text(id) {
                Some(text) => acc + node_offset.min(text.chars().count()),
                None => {
                    let children = surface.children(id);
                    acc + children
                        .iter()
                        .take(node_offset)
                        .map(|&c| surface.text_len(c))
                        .sum::<usize>()
                }
            };
        }
        if let Some(text) = surface.text(id) {
            acc += text.chars().count();
        }
    }
    0
}

/// Caret for a linear offset. Offsets inside or at the edge of a line's text
/// resolve into that text node; an offset right after a newline with no text
/// following resolves onto the container.
pub fn caret_at_offset(surface: &Surface, root: NodeId, offset: usize) -> Option<Caret> {
    let mut acc = 0;
    let mut after_break = None;
    for id in surface.text_nodes(root) {
        let len = surface.text_len(id);
        if is_line_break(surface, id) {
            if offset == acc + len {
                let parent = surface.parent(id)?;
                let index = surface.index_in_parent(id)?;
                after_break = Some(Caret::new(parent, index + 1));
            }
        } else if offset >= acc && offset <= acc + len {
            return Some(Caret::new(id, offset - acc));
        }
        acc += len;
    }
    if after_break.is_some() {
        return after_break;
    }
    (offset == acc).then(|| Caret::new(root, surface.children(root).len()))
}

/// Current caret as a linear offset into the surface's rendered text.
pub fn caret_offset(surface: &Surface) -> Option<usize> {
    let selection = surface.selection()?;
    Some(surface.offset_at(selection.anchor))
}

/// Collapses the selection to just after `len` chars inserted at `at`.
pub fn place_cursor_after_inserted_text(surface: &mut Surface, at: Caret, len: usize) {
    surface.collapse(Caret::new(at.node, at.offset + len));
}

/// Collapses the selection at the end of the rendered text.
pub fn place_cursor_at_end(surface: &mut Surface) {
    let root = surface.root();
    let end = surface.text_len(root);
    let caret = caret_at_offset(surface, root, end).unwrap_or(Caret::new(root, 0));
    surface.collapse(caret);
}

/// Inserts `text` (no newlines) at the caret and moves the caret after it.
/// Returns false when there is no selection.
pub fn insert_text_at_caret(surface: &mut Surface, text: &str) -> bool {
    let Some(selection) = surface.selection() else {
        return false;
    };
    let caret = selection.anchor;
    let inserted = text.chars().count();

    if let Some(current) = surface.text(caret.node) {
        if !is_line_break(surface, caret.node) {
            let mut chars: Vec<char> = current.chars().collect();
            let at = caret.offset.min(chars.len());
            chars.splice(at..at, text.chars());
            surface.set_text(caret.node, chars.into_iter().collect());
            place_cursor_after_inserted_text(surface, Caret::new(caret.node, at), inserted);
            return true;
        }
        // Caret on a newline node: move onto the container after it.
        let Some(parent) = surface.parent(caret.node) else {
            return false;
        };
        let index = surface.index_in_parent(caret.node).unwrap_or(0) + 1;
        return insert_into_container(surface, Caret::new(parent, index), text);
    }
    insert_into_container(surface, caret, text)
}

fn insert_into_container(surface: &mut Surface, caret: Caret, text: &str) -> bool {
    let children = surface.children(caret.node).to_vec();
    let index = caret.offset.min(children.len());
    let inserted = text.chars().count();

    // Extend the text run ending right before the caret, when there is one.
    if let Some(&prev) = index.checked_sub(1).and_then(|i| children.get(i)) {
        if let Some(prev_text) = surface.text(prev) {
            if !is_line_break(surface, prev) {
                let len = prev_text.chars().count();
                let joined = format!("{prev_text}{text}");
                surface.set_text(prev, joined);
                place_cursor_after_inserted_text(surface, Caret::new(prev, len), inserted);
                return true;
            }
        }
    }
    let Some(node) = surface.insert_text(caret.node, index, text) else {
        return false;
    };
    place_cursor_after_inserted_text(surface, Caret::new(node, 0), inserted);
    true
}
