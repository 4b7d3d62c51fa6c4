// Drag-and-drop onto the upload region.
//
// A drag carrying files that enters the drop region "arms" it (front ends
// highlight it). Drag-leave events fire on every internal element boundary,
// so a leave only disarms the zone when the pointer is heading somewhere
// outside the region. Containment is answered by an explicit element tree
// instead of a live DOM.

use std::collections::HashMap;

use crate::media::SelectedFile;

/// Identifier of an element in the front end's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u32);

/// Parent links for the elements around the drop region.
#[derive(Debug, Clone, Default)]
pub struct ElementTree {
    parents: HashMap<ElementId, ElementId>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `child` as a direct child of `parent`.
    pub fn add_child(&mut self, parent: ElementId, child: ElementId) -> &mut Self {
        self.parents.insert(child, parent);
        self
    }

    pub fn parent_of(&self, node: ElementId) -> Option<ElementId> {
        self.parents.get(&node).copied()
    }

    /// True when `node` is `ancestor` itself or sits anywhere below it.
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut current = node;
        // A malformed tree with a cycle must not hang the UI thread.
        for _ in 0..=self.parents.len() {
            if current == ancestor {
                return true;
            }
            match self.parent_of(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
        false
    }
}

/// Drag events as delivered by the front end.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    /// The drag entered `target`. `carries_files` is false for text or link drags.
    Enter { target: ElementId, carries_files: bool },
    /// The drag left an element. `related_target` is the element being
    /// entered, or None when the pointer left the window.
    Leave { related_target: Option<ElementId> },
    /// Files were dropped. Only the first file is used.
    Drop { file: Option<SelectedFile> },
}

/// The designated drop region and its armed flag.
#[derive(Debug, Clone)]
pub struct DropZone {
    region: ElementId,
    tree: ElementTree,
    armed: bool,
}

impl DropZone {
    pub fn new(region: ElementId, tree: ElementTree) -> Self {
        Self {
            region,
            tree,
            armed: false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Apply one event. Returns the dropped file, if this was a drop
    /// carrying one; the caller assigns it exactly like a picker selection.
    pub fn handle(&mut self, event: DragEvent) -> Option<SelectedFile> {
        match event {
            DragEvent::Enter {
                target,
                carries_files,
            } => {
                if carries_files && self.tree.contains(self.region, target) {
                    self.armed = true;
                }
                None
            }
            DragEvent::Leave { related_target } => {
                let still_inside =
                    related_target.is_some_and(|t| self.tree.contains(self.region, t));
                if !still_inside {
                    self.armed = false;
                }
                None
            }
            DragEvent::Drop { file } => {
                self.armed = false;
                file
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_survives_cycles() {
        let mut tree = ElementTree::new();
        tree.add_child(ElementId(1), ElementId(2))
            .add_child(ElementId(2), ElementId(1));
        assert!(!tree.contains(ElementId(9), ElementId(1)));
    }

    #[test]
    fn non_file_drag_does_not_arm() {
        let mut zone = DropZone::new(ElementId(1), ElementTree::new());
        zone.handle(DragEvent::Enter {
            target: ElementId(1),
            carries_files: false,
        });
        assert!(!zone.is_armed());
    }
}
