use once_cell::sync::Lazy;
use regex::Regex;

use super::types::MediaKind;

// `.mp4` at the very end, or `.mp4?` followed by a query string.
static MP4_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.mp4(\?.*)?$").unwrap());

/// Classifies a raw media reference by provider.
///
/// Matching is case-insensitive and ordered, so a YouTube link to an `.mp4`
/// still counts as YouTube. Anything unrecognised (including the empty
/// string) is `Unknown`.
pub fn classify(raw: &str) -> MediaKind {
    if raw.is_empty() {
        return MediaKind::Unknown;
    }

    let lower = raw.to_lowercase();

    if lower.contains("youtube.com") || lower.contains("youtu.be") {
        MediaKind::YouTube
    } else if lower.contains("vimeo.com") {
        MediaKind::Vimeo
    } else if MP4_RE.is_match(&lower) {
        MediaKind::DirectFile
    } else if lower.contains("drive.google.com") {
        MediaKind::CloudDrive
    } else {
        MediaKind::Unknown
    }
}
