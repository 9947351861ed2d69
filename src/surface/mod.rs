//! In-memory rendered text model.
//!
//! A `Surface` is a small node tree standing in for an editable container:
//! text nodes hold characters, elements hold children and marks. The editor
//! engines only ever talk to this model, so they run the same against the
//! terminal UI and in tests.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark {
    /// A clickable word in the target view; the value is the token index.
    Word(usize),
    /// A highlighted run of mismatched characters.
    ErrorRun,
    /// Clicks on this subtree never move focus.
    NoFocusSteal,
    /// Editor chrome (headers, status lines); clicks are ignored.
    Chrome,
}

#[derive(Clone, Debug)]
enum NodeKind {
    Text(String),
    Element(Vec<Mark>),
}

#[derive(Clone, Debug)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A position inside a node: a char offset for text nodes, a child index for
/// elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Caret {
    pub node: NodeId,
    pub offset: usize,
}

impl Caret {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Caret,
    pub focus: Caret,
}

impl Selection {
    pub fn collapsed(at: Caret) -> Self {
        Self {
            anchor: at,
            focus: at,
        }
    }
}

/// Capability for reading and moving the current selection.
pub trait SelectionProvider {
    fn selection(&self) -> Option<Selection>;
    fn set_selection(&mut self, selection: Option<Selection>);

    fn collapse(&mut self, at: Caret) {
        self.set_selection(Some(Selection::collapsed(at)));
    }
}

pub struct Surface {
    nodes: Vec<Node>,
    root: NodeId,
    selection: Option<Selection>,
    focused: bool,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Element(Vec::new()),
                parent: None,
                children: Vec::new(),
            }],
            root: NodeId(0),
            selection: None,
            focused: false,
        }
    }

    /// A surface whose root carries the given marks.
    pub fn with_root_marks(marks: Vec<Mark>) -> Self {
        let mut surface = Self::new();
        surface.nodes[0].kind = NodeKind::Element(marks);
        surface
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn alloc(&mut self, kind: NodeKind, parent: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        id
    }

    fn attach(&mut self, parent: NodeId, index: usize, kind: NodeKind) -> Option<NodeId> {
        let len = self.node(parent)?.children.len();
        if !self.is_element(parent) {
            return None;
        }
        let id = self.alloc(kind, parent);
        self.nodes[parent.0].children.insert(index.min(len), id);
        Some(id)
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Option<NodeId> {
        let index = self.node(parent)?.children.len();
        self.attach(parent, index, NodeKind::Text(text.to_string()))
    }

    pub fn append_element(&mut self, parent: NodeId, marks: Vec<Mark>) -> Option<NodeId> {
        let index = self.node(parent)?.children.len();
        self.attach(parent, index, NodeKind::Element(marks))
    }

    pub fn insert_text(&mut self, parent: NodeId, index: usize, text: &str) -> Option<NodeId> {
        self.attach(parent, index, NodeKind::Text(text.to_string()))
    }

    /// Drops every node but the root. Previously handed out ids become invalid.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[0].children.clear();
        self.selection = None;
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.node(id).map(|n| &n.kind), Some(NodeKind::Text(_)))
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.node(id).map(|n| &n.kind), Some(NodeKind::Element(_)))
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.kind {
            NodeKind::Text(s) => Some(s),
            NodeKind::Element(_) => None,
        }
    }

    pub fn set_text(&mut self, id: NodeId, text: String) {
        if let Some(Node {
            kind: NodeKind::Text(s),
            ..
        }) = self.nodes.get_mut(id.0)
        {
            *s = text;
        }
    }

    pub fn marks(&self, id: NodeId) -> &[Mark] {
        match self.node(id).map(|n| &n.kind) {
            Some(NodeKind::Element(marks)) => marks,
            _ => &[],
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Rendered text of a subtree in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.node(id).map(|n| &n.kind) {
            Some(NodeKind::Text(s)) => out.push_str(s),
            Some(NodeKind::Element(_)) => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
            None => {}
        }
    }

    /// Char count of a subtree's rendered text.
    pub fn text_len(&self, id: NodeId) -> usize {
        match self.node(id).map(|n| &n.kind) {
            Some(NodeKind::Text(s)) => s.chars().count(),
            Some(NodeKind::Element(_)) => self
                .children(id)
                .iter()
                .map(|&c| self.text_len(c))
                .sum(),
            None => 0,
        }
    }

    /// Every node below `id` (inclusive) in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    pub fn text_nodes(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&n| self.is_text(n))
            .collect()
    }

    /// Walks from `id` up to the root, returning the first node carrying a
    /// mark accepted by `pred`.
    pub fn closest(&self, id: NodeId, pred: impl Fn(&Mark) -> bool) -> Option<(NodeId, Mark)> {
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(mark) = self.marks(node).iter().find(|m| pred(m)) {
                return Some((node, *mark));
            }
            current = self.parent(node);
        }
        None
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }
}

impl SelectionProvider for Surface {
    fn selection(&self) -> Option<Selection> {
        self.selection
    }

    fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }
}

/// True for the dedicated newline text nodes of the input layout.
pub fn is_line_break(surface: &Surface, id: NodeId) -> bool {
    surface.text(id) == Some("\n")
}

/// Rebuilds `root`'s children in the canonical input layout: one text node per
/// run of characters within a line, one `"\n"` node per newline.
pub fn set_content(surface: &mut Surface, text: &str) {
    let root = surface.root();
    surface.clear();
    let mut run = String::new();
    for ch in text.chars() {
        if ch == '\n' {
            if !run.is_empty() {
                surface.append_text(root, &run);
                run.clear();
            }
            surface.append_text(root, "\n");
        } else {
            run.push(ch);
        }
    }
    if !run.is_empty() {
        surface.append_text(root, &run);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_content_walks_document_order() {
        let mut s = Surface::new();
        let root = s.root();
        s.append_text(root, "ab");
        let el = s.append_element(root, vec![Mark::ErrorRun]).unwrap();
        s.append_text(el, "cd");
        s.append_text(root, "e");
        assert_eq!(s.text_content(root), "abcde");
        assert_eq!(s.text_len(root), 5);
        assert_eq!(s.text_nodes(root).len(), 3);
    }

    #[test]
    fn closest_finds_marked_ancestor() {
        let mut s = Surface::new();
        let root = s.root();
        let word = s.append_element(root, vec![Mark::Word(4)]).unwrap();
        let text = s.append_text(word, "three").unwrap();
        assert_eq!(
            s.closest(text, |m| matches!(m, Mark::Word(_))),
            Some((word, Mark::Word(4)))
        );
        assert_eq!(s.closest(text, |m| *m == Mark::Chrome), None);
    }

    #[test]
    fn set_content_splits_newlines_into_own_nodes() {
        let mut s = Surface::new();
        set_content(&mut s, "ab\n\ncd");
        let root = s.root();
        let kids: Vec<&str> = s
            .children(root)
            .iter()
            .filter_map(|&c| s.text(c))
            .collect();
        assert_eq!(kids, vec!["ab", "\n", "\n", "cd"]);
    }

    #[test]
    fn clear_drops_selection_and_children() {
        let mut s = Surface::new();
        let root = s.root();
        let t = s.append_text(root, "x").unwrap();
        s.collapse(Caret::new(t, 1));
        s.clear();
        assert!(s.children(root).is_empty());
        assert!(s.selection().is_none());
    }
}
