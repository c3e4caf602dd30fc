mod content;
mod host;
mod presenter;

pub use content::{build_image_content, build_media_content, ModalBody, ModalContent};
pub use host::{ElementId, HeadlessHost, HostEvent, ModalHost};
pub use presenter::{ClickTarget, KeyPress, ModalPresenter, ModalState};
