use tracing::{debug, warn};

use super::{
    content::ModalContent,
    host::{ElementId, ModalHost},
};

/// Session lifecycle. `Opening` and `Closing` are only held for the duration
/// of [`ModalPresenter::open`] and [`ModalPresenter::close`]; callers always
/// observe `Closed` or `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Opening,
    Open,
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Escape,
    Tab,
    ShiftTab,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The overlay region itself, outside the dialog.
    Backdrop,
    Content,
}

#[derive(Debug)]
struct Session {
    content: ModalContent,
    previously_focused: Option<ElementId>,
    focusables: Vec<ElementId>,
}

/// Owns the single overlay region of a document.
///
/// At most one session is active. Opening while open tears the current
/// session down first, so a playing frame is released before the next
/// content mounts. No operation fails: a missing overlay root, content
/// without focusables, or a previously focused element that left the
/// document are skipped.
pub struct ModalPresenter<H: ModalHost> {
    host: H,
    state: ModalState,
    session: Option<Session>,
}

impl<H: ModalHost> ModalPresenter<H> {
    pub fn new(host: H) -> Self {
        if !host.has_overlay() {
            warn!("Modal overlay root not found in document");
        }

        Self {
            host,
            state: ModalState::Closed,
            session: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn content(&self) -> Option<&ModalContent> {
        self.session.as_ref().map(|s| &s.content)
    }

    pub fn open(&mut self, content: ModalContent) {
        if !self.host.has_overlay() {
            debug!("Skipping modal open for {}: no overlay root", content.label);
            return;
        }

        if self.is_open() {
            self.close();
        }

        self.state = ModalState::Opening;
        let previously_focused = self.host.active_element();

        self.host.unmount();
        let focusables = self.host.mount(&content);
        self.host.set_overlay_visible(true);

        if let Some(first) = focusables.first() {
            self.host.focus(*first);
        }

        self.host.set_key_listener(true);

        debug!("Opened modal: {}", content.label);
        self.session = Some(Session {
            content,
            previously_focused,
            focusables,
        });
        self.state = ModalState::Open;
    }

    pub fn close(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        self.state = ModalState::Closing;

        if session.content.has_frame() {
            self.host.release_frame();
        }

        self.host.set_overlay_visible(false);
        self.host.unmount();
        self.host.set_key_listener(false);

        if let Some(previous) = session.previously_focused {
            if self.host.is_connected(previous) {
                self.host.focus(previous);
            }
        }

        debug!("Closed modal: {}", session.content.label);
        self.state = ModalState::Closed;
    }

    /// Handles a keydown. Returns true when the default action should be
    /// suppressed.
    pub fn handle_key(&mut self, key: KeyPress) -> bool {
        match key {
            KeyPress::Escape if self.is_open() => {
                self.close();
                true
            }
            KeyPress::Tab | KeyPress::ShiftTab => self.trap_focus(key == KeyPress::ShiftTab),
            _ => false,
        }
    }

    pub fn handle_overlay_click(&mut self, target: ClickTarget) {
        if target == ClickTarget::Backdrop {
            self.close();
        }
    }

    pub fn handle_close_button(&mut self) {
        self.close();
    }

    fn trap_focus(&mut self, backwards: bool) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        let (Some(&first), Some(&last)) = (session.focusables.first(), session.focusables.last())
        else {
            return false;
        };

        let active = self.host.active_element();
        if backwards && active == Some(first) {
            self.host.focus(last);
            true
        } else if !backwards && active == Some(last) {
            self.host.focus(first);
            true
        } else {
            false
        }
    }
}
