use serde::Serialize;

use crate::{
    media::Normalizer,
    utils::escape_html,
};

const FRAME_HINT: &str = "If the video doesn\u{2019}t play, click the pop-out icon below.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModalBody {
    /// Native player for direct files.
    Video { src: String },
    /// Embedded frame; `src` already carries the autoplay flag.
    Frame { src: String },
    Image { src: String, alt: String },
}

/// The fragment mounted into the overlay region for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalContent {
    pub label: String,
    pub body: ModalBody,
}

impl ModalContent {
    /// Whether the content holds a streaming frame whose source must be
    /// released before teardown.
    pub fn has_frame(&self) -> bool {
        matches!(self.body, ModalBody::Frame { .. })
    }

    pub fn close_label(&self) -> &'static str {
        match self.body {
            ModalBody::Image { .. } => "Close image preview",
            _ => "Close media",
        }
    }

    pub fn to_html(&self) -> String {
        let class = match self.body {
            ModalBody::Image { .. } => "modal image-modal",
            _ => "modal",
        };

        let inner = match &self.body {
            ModalBody::Video { src } => format!(
                concat!(
                    "<div class=\"modal-media\">",
                    "<video controls autoplay playsinline>",
                    "<source src=\"{}\" type=\"video/mp4\">",
                    "Your browser does not support the video tag.",
                    "</video></div>"
                ),
                escape_html(src)
            ),
            ModalBody::Frame { src } => format!(
                concat!(
                    "<p class=\"modal-hint\">{}</p>",
                    "<div class=\"video-wrap\">",
                    "<iframe src=\"{}\" frameborder=\"0\" ",
                    "allow=\"autoplay; fullscreen\" allowfullscreen></iframe>",
                    "</div>"
                ),
                FRAME_HINT,
                escape_html(src)
            ),
            ModalBody::Image { src, alt } => format!(
                "<div class=\"modal-media\"><img src=\"{}\" alt=\"{}\" /></div>",
                escape_html(src),
                escape_html(alt)
            ),
        };

        format!(
            concat!(
                "<div class=\"{}\" role=\"dialog\" aria-label=\"{}\" aria-modal=\"true\">",
                "<div class=\"modal-body\">",
                "<button class=\"close\" aria-label=\"{}\">&times;</button>",
                "{}",
                "</div></div>"
            ),
            class,
            escape_html(&self.label),
            self.close_label(),
            inner
        )
    }
}

/// Builds the player for a media reference: a native video for direct files,
/// an autoplaying frame for everything else.
pub fn build_media_content(normalizer: &Normalizer, reference: &str, title: &str) -> ModalContent {
    let target = normalizer.resolve(reference);
    let url = if target.url.is_empty() {
        reference.to_string()
    } else {
        target.url
    };

    let body = if target.kind.is_native() {
        ModalBody::Video { src: url }
    } else {
        ModalBody::Frame {
            src: with_autoplay(&url),
        }
    };

    ModalContent {
        label: title.to_string(),
        body,
    }
}

pub fn build_image_content(src: &str, alt: &str) -> ModalContent {
    ModalContent {
        label: "Image".to_string(),
        body: ModalBody::Image {
            src: src.to_string(),
            alt: alt.to_string(),
        },
    }
}

fn with_autoplay(url: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}autoplay=1")
}
