use tracing::{debug, trace};

use crate::session::settings::Settings;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Paste,
    Click,
    KeyDown,
    KeyUp,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Paste,
        EventKind::Click,
        EventKind::KeyDown,
        EventKind::KeyUp,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// What a binding was made for. A change in any field means the handlers
/// must be rebound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dependencies {
    pub target_generation: u64,
    pub settings: Settings,
}

/// Registry of the editor's live event bindings.
#[derive(Debug, Default)]
pub struct Listeners {
    next_id: u64,
    bound: Vec<(ListenerId, EventKind)>,
    deps: Option<Dependencies>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the current bindings, then binds one listener per event kind.
    pub fn bind(&mut self, deps: Dependencies) {
        self.unbind();
        for kind in EventKind::ALL {
            let id = ListenerId(self.next_id);
            self.next_id += 1;
            self.bound.push((id, kind));
        }
        self.deps = Some(deps);
        debug!(generation = deps.target_generation, settings = ?deps.settings, "listeners bound");
    }

    pub fn unbind(&mut self) {
        for (id, kind) in self.bound.drain(..) {
            trace!(?id, ?kind, "listener unbound");
        }
        self.deps = None;
    }

    /// Rebinds only when `deps` differ from the ones currently bound.
    /// Returns whether a rebind happened.
    pub fn sync(&mut self, deps: Dependencies) -> bool {
        if self.deps == Some(deps) {
            return false;
        }
        self.bind(deps);
        true
    }

    pub fn is_listening(&self, kind: EventKind) -> bool {
        self.bound.iter().any(|&(_, k)| k == kind)
    }

    pub fn ids(&self) -> Vec<ListenerId> {
        self.bound.iter().map(|&(id, _)| id).collect()
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    pub fn dependencies(&self) -> Option<Dependencies> {
        self.deps
    }
}
