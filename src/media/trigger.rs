use tracing::{debug, warn};

use super::normalize::Normalizer;
use crate::{
    modal::{build_image_content, build_media_content, ModalContent},
    utils::non_empty,
};

pub const SHOWREEL_FALLBACK: &str = "assets/show_reel.mp4";

/// Attribute values already read off an interactive element.
#[derive(Debug, Clone)]
pub enum MediaTrigger {
    /// The showreel button: `data-video`, `data-title`.
    Showreel {
        video: Option<String>,
        title: Option<String>,
    },
    /// A `[data-video]` button in the projects grid, plus its card.
    ProjectButton {
        video: Option<String>,
        card_video: Option<String>,
        card_title: Option<String>,
    },
    /// The play overlay on a project thumbnail; only the card carries data.
    ThumbnailPlay {
        card_video: Option<String>,
        card_title: Option<String>,
    },
    GalleryImage {
        src: Option<String>,
        data_src: Option<String>,
        alt: Option<String>,
    },
}

/// Turns triggers into modal content.
#[derive(Debug, Clone, Default)]
pub struct TriggerResolver {
    normalizer: Normalizer,
}

impl TriggerResolver {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Returns `None` when the trigger carries nothing to show.
    pub fn resolve(&self, trigger: &MediaTrigger) -> Option<ModalContent> {
        match trigger {
            MediaTrigger::Showreel { video, title } => {
                let video = non_empty(video.as_deref()).unwrap_or(SHOWREEL_FALLBACK);
                let title = non_empty(title.as_deref()).unwrap_or("Showreel");
                Some(self.media(video, title))
            }
            MediaTrigger::ProjectButton {
                video,
                card_video,
                card_title,
            } => {
                let Some(video) =
                    non_empty(video.as_deref()).or_else(|| non_empty(card_video.as_deref()))
                else {
                    warn!("No video URL found for project button");
                    return None;
                };
                let title = non_empty(card_title.as_deref()).unwrap_or("Project video");
                Some(self.media(video, title))
            }
            MediaTrigger::ThumbnailPlay {
                card_video,
                card_title,
            } => {
                let video = non_empty(card_video.as_deref())?;
                let title = non_empty(card_title.as_deref()).unwrap_or("Project");
                Some(self.media(video, title))
            }
            MediaTrigger::GalleryImage { src, data_src, alt } => {
                let src = non_empty(src.as_deref()).or_else(|| non_empty(data_src.as_deref()))?;
                let alt = non_empty(alt.as_deref()).unwrap_or("Gallery image");
                Some(build_image_content(src, alt))
            }
        }
    }

    fn media(&self, reference: &str, title: &str) -> ModalContent {
        debug!("Resolving media trigger {} -> {}", title, reference);
        build_media_content(&self.normalizer, reference, title)
    }
}
