use std::collections::BTreeSet;

use super::content::{ModalBody, ModalContent};

/// Opaque handle to an element in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u64);

/// The document the presenter drives. Implementations own the actual
/// elements; the presenter only sees handles.
pub trait ModalHost {
    /// Whether the reserved overlay region exists in the document.
    fn has_overlay(&self) -> bool;

    fn active_element(&self) -> Option<ElementId>;

    /// Whether `element` is still attached to the document.
    fn is_connected(&self, element: ElementId) -> bool;

    fn focus(&mut self, element: ElementId);

    /// Replaces the overlay's children with `content` and returns the
    /// visible focusable descendants in tab order.
    fn mount(&mut self, content: &ModalContent) -> Vec<ElementId>;

    /// Clears the source of any streaming frame inside the overlay.
    fn release_frame(&mut self);

    fn unmount(&mut self);

    /// Toggles the overlay's visibility, including `aria-hidden`.
    fn set_overlay_visible(&mut self, visible: bool);

    /// Installs or removes the document-level keydown listener.
    fn set_key_listener(&mut self, installed: bool);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Mounted(String),
    FrameReleased(String),
    Unmounted,
    Shown,
    Hidden,
    Focused(ElementId),
    KeyListener(bool),
}

#[derive(Debug)]
struct Mounted {
    content: ModalContent,
    frame_src: Option<String>,
    elements: Vec<ElementId>,
}

/// In-memory document used by tooling and tests.
///
/// Page elements are registered with [`HeadlessHost::add_element`]; mounting
/// content allocates a focusable close button plus any configured extra
/// focusables (links inside the content). Every mutation is appended to an
/// event log.
#[derive(Debug)]
pub struct HeadlessHost {
    overlay: bool,
    extra_focusables: usize,
    next_id: u64,
    attached: BTreeSet<ElementId>,
    active: Option<ElementId>,
    mounted: Option<Mounted>,
    visible: bool,
    key_listener: bool,
    events: Vec<HostEvent>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self {
            overlay: true,
            extra_focusables: 0,
            next_id: 1,
            attached: BTreeSet::new(),
            active: None,
            mounted: None,
            visible: false,
            key_listener: false,
            events: Vec::new(),
        }
    }

    /// A document without an overlay region.
    pub fn without_overlay() -> Self {
        Self {
            overlay: false,
            ..Self::new()
        }
    }

    pub fn with_extra_focusables(mut self, count: usize) -> Self {
        self.extra_focusables = count;
        self
    }

    pub fn add_element(&mut self) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.attached.insert(id);
        id
    }

    pub fn remove_element(&mut self, element: ElementId) {
        self.attached.remove(&element);
        if self.active == Some(element) {
            self.active = None;
        }
    }

    pub fn content(&self) -> Option<&ModalContent> {
        self.mounted.as_ref().map(|m| &m.content)
    }

    pub fn frame_src(&self) -> Option<&str> {
        self.mounted.as_ref().and_then(|m| m.frame_src.as_deref())
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn aria_hidden(&self) -> bool {
        !self.visible
    }

    pub fn key_listener_installed(&self) -> bool {
        self.key_listener
    }

    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl ModalHost for HeadlessHost {
    fn has_overlay(&self) -> bool {
        self.overlay
    }

    fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    fn is_connected(&self, element: ElementId) -> bool {
        self.attached.contains(&element)
    }

    fn focus(&mut self, element: ElementId) {
        if self.attached.contains(&element) {
            self.active = Some(element);
            self.events.push(HostEvent::Focused(element));
        }
    }

    fn mount(&mut self, content: &ModalContent) -> Vec<ElementId> {
        self.unmount_quietly();

        let focusables: Vec<ElementId> = (0..=self.extra_focusables)
            .map(|_| self.add_element())
            .collect();
        let frame_src = match &content.body {
            ModalBody::Frame { src } => Some(src.clone()),
            _ => None,
        };

        self.mounted = Some(Mounted {
            content: content.clone(),
            frame_src,
            elements: focusables.clone(),
        });
        self.events.push(HostEvent::Mounted(content.label.clone()));

        focusables
    }

    fn release_frame(&mut self) {
        if let Some(mounted) = self.mounted.as_mut() {
            if let Some(src) = mounted.frame_src.take() {
                self.events.push(HostEvent::FrameReleased(src));
            }
        }
    }

    fn unmount(&mut self) {
        if self.unmount_quietly() {
            self.events.push(HostEvent::Unmounted);
        }
    }

    fn set_overlay_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.events.push(if visible {
            HostEvent::Shown
        } else {
            HostEvent::Hidden
        });
    }

    fn set_key_listener(&mut self, installed: bool) {
        self.key_listener = installed;
        self.events.push(HostEvent::KeyListener(installed));
    }
}

impl HeadlessHost {
    fn unmount_quietly(&mut self) -> bool {
        match self.mounted.take() {
            Some(mounted) => {
                for element in mounted.elements {
                    self.remove_element(element);
                }
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modal::content::build_image_content;

    #[test]
    fn test_focus_ignores_detached_elements() {
        let mut host = HeadlessHost::new();
        let a = host.add_element();
        host.remove_element(a);
        host.focus(a);
        assert_eq!(host.active_element(), None);
        assert!(host.events().is_empty());
    }

    #[test]
    fn test_unmount_detaches_mounted_elements() {
        let mut host = HeadlessHost::new();
        let focusables = host.mount(&build_image_content("a.jpg", "A"));
        assert_eq!(focusables.len(), 1);
        host.focus(focusables[0]);
        host.unmount();
        assert!(!host.is_connected(focusables[0]));
        assert_eq!(host.active_element(), None);
        assert!(host.content().is_none());
    }
}
