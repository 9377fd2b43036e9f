//! Widget identity and the attached-widget arena.
//!
//! The focus engine never owns controls; it owns *handles*. A [`WidgetId`]
//! is a stable opaque identity for one logical control, valid for the
//! lifetime of the dialog regardless of how often the host re-renders it.
//!
//! [`WidgetArena`] is the dialog's declared widget tree: which handles
//! exist, how they nest, and which of them can take focus. Containers
//! rebuild their member lists from [`WidgetArena::focusable_descendants`]
//! when the host signals a structural change, instead of re-querying a
//! live UI tree on every keystroke.
//!
//! # Example
//!
//! ```
//! use faderdeck::widget::{WidgetArena, WidgetDecl};
//!
//! let mut arena = WidgetArena::new();
//! let toolbar = arena.attach(None, WidgetDecl::container("toolbar"));
//! let save = arena.attach(Some(toolbar), WidgetDecl::control("save"));
//! let close = arena.attach(Some(toolbar), WidgetDecl::control("close").disabled(true));
//!
//! // Disabled widgets are excluded from focus traversal.
//! assert_eq!(arena.focusable_descendants(toolbar), vec![save]);
//! # let _ = close;
//! ```

use indexmap::IndexMap;
use smallvec::SmallVec;

/// Stable opaque handle to a focus-capable element.
///
/// Identity is stable across re-renders of the same logical control; ids
/// are allocated per-arena, so separate dialogs never share handles by
/// accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

impl WidgetId {
    /// Raw id value, for host-side bookkeeping.
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Declaration of a widget at attach time.
#[derive(Debug, Clone)]
pub struct WidgetDecl {
    label: String,
    can_focus: bool,
    disabled: bool,
}

impl WidgetDecl {
    /// A focusable leaf control (button, dropdown, slider).
    pub fn control(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            can_focus: true,
            disabled: false,
        }
    }

    /// A grouping container that is not itself a tab stop.
    pub fn container(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            can_focus: false,
            disabled: false,
        }
    }

    /// A leaf that can never take focus (window chrome, static labels).
    /// Pointer-only targets live in the tree for bookkeeping but are
    /// invisible to every traversal.
    pub fn inert(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            can_focus: false,
            disabled: false,
        }
    }

    /// A container that is itself focusable (a group handle).
    pub fn focusable_container(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            can_focus: true,
            disabled: false,
        }
    }

    /// Set the disabled flag.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

#[derive(Debug)]
struct WidgetEntry {
    label: String,
    parent: Option<WidgetId>,
    children: SmallVec<[WidgetId; 4]>,
    can_focus: bool,
    disabled: bool,
}

/// The dialog's attached widget tree.
///
/// Insertion order of siblings is the declared navigation order; it is
/// stable for the dialog's lifetime unless the host explicitly detaches
/// or attaches widgets.
#[derive(Debug, Default)]
pub struct WidgetArena {
    entries: IndexMap<WidgetId, WidgetEntry>,
    next_id: u64,
}

impl WidgetArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            next_id: 1,
        }
    }

    /// Attach a widget under `parent` (or as a root when `None`).
    ///
    /// Returns the new widget's stable handle. Siblings keep attach order.
    pub fn attach(&mut self, parent: Option<WidgetId>, decl: WidgetDecl) -> WidgetId {
        let id = WidgetId(self.next_id);
        self.next_id += 1;

        self.entries.insert(
            id,
            WidgetEntry {
                label: decl.label,
                parent,
                children: SmallVec::new(),
                can_focus: decl.can_focus,
                disabled: decl.disabled,
            },
        );

        if let Some(parent_id) = parent {
            if let Some(parent_entry) = self.entries.get_mut(&parent_id) {
                parent_entry.children.push(id);
            }
        }

        id
    }

    /// Detach a widget and its whole subtree.
    ///
    /// Detached handles stay allocated (they will never be reused) but no
    /// longer resolve, so any focus or jump request naming them becomes a
    /// silent no-op.
    pub fn detach(&mut self, id: WidgetId) {
        let children: Vec<WidgetId> = match self.entries.get(&id) {
            Some(entry) => entry.children.iter().copied().collect(),
            None => return,
        };
        for child in children {
            self.detach(child);
        }

        if let Some(entry) = self.entries.shift_remove(&id) {
            if let Some(parent_id) = entry.parent {
                if let Some(parent_entry) = self.entries.get_mut(&parent_id) {
                    parent_entry.children.retain(|c| *c != id);
                }
            }
        }
    }

    /// Remove every widget. Used at dialog teardown.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// True while the widget is part of the tree.
    pub fn is_attached(&self, id: WidgetId) -> bool {
        self.entries.contains_key(&id)
    }

    /// True when the widget can currently take focus.
    pub fn is_focusable(&self, id: WidgetId) -> bool {
        self.entries
            .get(&id)
            .map(|e| e.can_focus && !e.disabled)
            .unwrap_or(false)
    }

    /// Enable or disable a widget.
    pub fn set_disabled(&mut self, id: WidgetId, disabled: bool) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.disabled = disabled;
        }
    }

    /// The widget's declared label (informational only; never used for
    /// navigation lookups).
    pub fn label(&self, id: WidgetId) -> Option<&str> {
        self.entries.get(&id).map(|e| e.label.as_str())
    }

    /// The widget's parent, if any.
    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.entries.get(&id).and_then(|e| e.parent)
    }

    /// Direct children in declared order.
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.entries
            .get(&id)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    /// Live ordered list of focus-capable widgets under `container`,
    /// depth-first in declared order. The container itself is excluded.
    pub fn focusable_descendants(&self, container: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        self.collect_focusable(container, &mut out);
        out
    }

    fn collect_focusable(&self, id: WidgetId, out: &mut Vec<WidgetId>) {
        for child in self.children(id).to_vec() {
            if self.is_focusable(child) {
                out.push(child);
            }
            self.collect_focusable(child, out);
        }
    }

    /// True when `id` is `container` or lies anywhere inside its subtree.
    pub fn is_within(&self, container: WidgetId, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == container {
                return true;
            }
            current = self.parent(c);
        }
        false
    }

    /// Number of attached widgets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no widgets are attached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
