mod classify;
mod normalize;
mod trigger;
mod types;

pub use classify::classify;
pub use normalize::{normalize, Normalizer, DEFAULT_BASE_URL};
pub use trigger::{MediaTrigger, TriggerResolver, SHOWREEL_FALLBACK};
pub use types::{EmbedTarget, MediaKind};
