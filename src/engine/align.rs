use crate::surface::{Caret, NodeId, SelectionProvider, Surface};

/// Characters that end a word. Spaces are the tokenizer's boundary; a newline
/// also ends a word because every line is rendered as its own node.
pub fn is_word_break(ch: char) -> bool {
    ch == ' ' || ch == '\n'
}

/// Index right after the nearest word break before `offset`, or 0.
pub fn previous_word_boundary(text: &[char], offset: usize) -> usize {
    let offset = offset.min(text.len());
    text[..offset]
        .iter()
        .rposition(|&ch| is_word_break(ch))
        .map(|i| i + 1)
        .unwrap_or(0)
}

/// Index of the nearest word break at or after `offset`, or `text.len()`.
pub fn next_word_boundary(text: &[char], offset: usize) -> usize {
    if offset >= text.len() {
        return text.len();
    }
    text[offset..]
        .iter()
        .position(|&ch| is_word_break(ch))
        .map(|i| offset + i)
        .unwrap_or(text.len())
}

/// Visual line index of `node`: the number of line breaks rendered by the
/// siblings before it. Adjacent newline nodes each end one visual line, so a
/// paragraph break maps onto the empty line it leaves in the target text.
pub fn line_index(surface: &Surface, node: NodeId) -> usize {
    let Some(parent) = surface.parent(node) else {
        return 0;
    };
    let position = surface.index_in_parent(node).unwrap_or(0);
    count_breaks(surface, &surface.children(parent)[..position])
}

fn count_breaks(surface: &Surface, nodes: &[NodeId]) -> usize {
    nodes
        .iter()
        .map(|&n| surface.text_content(n).matches('\n').count())
        .sum()
}

/// The target line corresponding to the visual line `node` sits on, or `""`.
pub fn line_at<'a>(target: &'a str, surface: &Surface, node: NodeId) -> &'a str {
    target.split('\n').nth(line_index(surface, node)).unwrap_or("")
}

/// Resolves a caret to (line index, column). A caret anchored on a container
/// sits at the start of the line after its preceding children.
pub fn line_and_column(surface: &Surface, caret: Caret) -> (usize, usize) {
    if surface.is_text(caret.node) {
        (line_index(surface, caret.node), caret.offset)
    } else {
        let children = surface.children(caret.node);
        let before = &children[..caret.offset.min(children.len())];
        let line = count_breaks(surface, before);
        // Text after the last break on this line still counts as column.
        let column = before
            .iter()
            .rev()
            .take_while(|&&n| !surface.text_content(n).contains('\n'))
            .map(|&n| surface.text_len(n))
            .sum();
        (line, column)
    }
}

/// True when the character just before or just after the caret is a space.
pub fn would_create_consecutive_space(surface: &Surface) -> bool {
    let Some(selection) = surface.selection() else {
        return false;
    };
    let Caret { node, offset } = selection.anchor;

    if let Some(text) = surface.text(node) {
        let chars: Vec<char> = text.chars().collect();
        let before = offset.checked_sub(1).and_then(|i| chars.get(i));
        let after = chars.get(offset);
        return before == Some(&' ') || after == Some(&' ');
    }

    // Anchored on a container: look at the neighbouring children.
    let children = surface.children(node);
    let before = offset
        .checked_sub(1)
        .and_then(|i| children.get(i))
        .and_then(|&c| surface.text_content(c).chars().last());
    let after = children
        .get(offset)
        .and_then(|&c| surface.text_content(c).chars().next());
    before == Some(' ') || after == Some(' ')
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordToken<'a> {
    pub text: &'a str,
    /// Position among all tokens, whitespace runs included.
    pub index: usize,
    /// Char offset of the token in the target text.
    pub start: usize,
    pub is_whitespace: bool,
}

/// Splits `text` into alternating word and whitespace-run tokens. Summing the
/// lengths of the tokens before any token gives its start offset.
pub fn segment_words(text: &str) -> Vec<WordToken<'_>> {
    let mut tokens = Vec::new();
    let mut start_byte = 0;
    let mut start_char = 0;
    let mut chars_in_token = 0;
    let mut current_ws: Option<bool> = None;

    for (byte, ch) in text.char_indices() {
        let ws = ch.is_whitespace();
        match current_ws {
            Some(prev) if prev != ws => {
                tokens.push(WordToken {
                    text: &text[start_byte..byte],
                    index: tokens.len(),
                    start: start_char,
                    is_whitespace: prev,
                });
                start_byte = byte;
                start_char += chars_in_token;
                chars_in_token = 0;
            }
            _ => {}
        }
        current_ws = Some(ws);
        chars_in_token += 1;
    }
    if let Some(ws) = current_ws {
        tokens.push(WordToken {
            text: &text[start_byte..],
            index: tokens.len(),
            start: start_char,
            is_whitespace: ws,
        });
    }
    tokens
}

/// Start offset of token `index`, reconstructed from the preceding tokens.
pub fn token_start(tokens: &[WordToken<'_>], index: usize) -> usize {
    tokens
        .iter()
        .take(index)
        .map(|t| t.text.chars().count())
        .sum()
}
